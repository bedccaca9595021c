use time::OffsetDateTime;
use tracing::{info, warn};

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::outcome::CartRejection;
use kernel::interface::query::{
    BookQuery, DependOnBookQuery, DependOnWishlistQuery, WishlistQuery,
};
use kernel::interface::update::{DependOnWishlistModifier, WishlistModifier};
use kernel::prelude::entity::{BookId, CreatedAt, UserId, WishlistItem};
use kernel::KernelError;

use crate::transfer::{
    AddWishlistItemDto, GetWishlistDto, IsWishlistedDto, RemoveWishlistItemDto, WishlistDto,
    WishlistItemDto, WishlistStatusDto,
};

#[async_trait::async_trait]
pub trait WishlistService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnBookQuery
    + DependOnWishlistQuery
    + DependOnWishlistModifier
{
    async fn add_to_wishlist(
        &self,
        dto: AddWishlistItemDto,
    ) -> error_stack::Result<Result<WishlistDto, CartRejection>, KernelError> {
        let user_id = UserId::new(dto.user_id);
        let book_id = BookId::new(dto.book_id);
        let mut connection = self.database_connection().transact().await?;

        let book = self
            .book_query()
            .find_by_id(&mut connection, &book_id)
            .await?;
        if book.is_none() {
            connection.roll_back().await?;
            warn!("Refused wishlist add: book {} not found", dto.book_id);
            return Ok(Err(CartRejection::BookNotFound));
        }

        let item = WishlistItem::new(user_id, book_id, CreatedAt::new(OffsetDateTime::now_utc()));
        self.wishlist_modifier().add(&mut connection, &item).await?;
        connection.commit().await?;
        info!("Wishlisted book {} for user {}", dto.book_id, dto.user_id);

        let wishlist = self
            .get_wishlist(GetWishlistDto {
                user_id: dto.user_id,
            })
            .await?;
        Ok(Ok(wishlist))
    }

    async fn remove_from_wishlist(
        &self,
        dto: RemoveWishlistItemDto,
    ) -> error_stack::Result<WishlistDto, KernelError> {
        let user_id = UserId::new(dto.user_id);
        let book_id = BookId::new(dto.book_id);
        let mut connection = self.database_connection().transact().await?;
        self.wishlist_modifier()
            .remove(&mut connection, &user_id, &book_id)
            .await?;
        connection.commit().await?;
        self.get_wishlist(GetWishlistDto {
            user_id: dto.user_id,
        })
        .await
    }

    /// Lightweight membership probe for toggling the heart icon.
    async fn is_wishlisted(
        &self,
        dto: IsWishlistedDto,
    ) -> error_stack::Result<WishlistStatusDto, KernelError> {
        let user_id = UserId::new(dto.user_id);
        let book_id = BookId::new(dto.book_id);
        let mut connection = self.database_connection().transact().await?;
        let in_wishlist = self
            .wishlist_query()
            .contains(&mut connection, &user_id, &book_id)
            .await?;
        connection.commit().await?;
        Ok(WishlistStatusDto { in_wishlist })
    }

    async fn get_wishlist(
        &self,
        dto: GetWishlistDto,
    ) -> error_stack::Result<WishlistDto, KernelError> {
        let user_id = UserId::new(dto.user_id);
        let mut connection = self.database_connection().transact().await?;
        let items = self
            .wishlist_query()
            .find_by_user(&mut connection, &user_id)
            .await?;

        let mut dtos = Vec::with_capacity(items.len());
        for item in &items {
            let book = self
                .book_query()
                .find_by_id(&mut connection, item.book_id())
                .await?;
            match book {
                Some(book) => dtos.push(WishlistItemDto::from_parts(item, &book)),
                None => warn!(
                    "Dropping wishlist line of user {}: book {} no longer exists",
                    dto.user_id,
                    item.book_id().as_ref()
                ),
            }
        }
        connection.commit().await?;
        Ok(WishlistDto { items: dtos })
    }
}

impl<T> WishlistService for T where
    T: DependOnDatabaseConnection
        + DependOnBookQuery
        + DependOnWishlistQuery
        + DependOnWishlistModifier
{
}

#[cfg(test)]
mod test {
    use rust_decimal::Decimal;

    use kernel::interface::outcome::CartRejection;

    use crate::mock::MockApp;
    use crate::service::WishlistService;
    use crate::transfer::{
        AddWishlistItemDto, GetWishlistDto, IsWishlistedDto, RemoveWishlistItemDto,
    };

    #[tokio::test]
    async fn wishlist_membership_is_idempotent() {
        let app = MockApp::new();
        let book = app.seed_book(4, Decimal::new(100_000, 0), None, true);
        let user = MockApp::user();

        let wishlist = app
            .add_to_wishlist(AddWishlistItemDto {
                user_id: user,
                book_id: book,
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(wishlist.items.len(), 1);

        // Adding again changes nothing.
        let wishlist = app
            .add_to_wishlist(AddWishlistItemDto {
                user_id: user,
                book_id: book,
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(wishlist.items.len(), 1);

        let status = app
            .is_wishlisted(IsWishlistedDto {
                user_id: user,
                book_id: book,
            })
            .await
            .unwrap();
        assert!(status.in_wishlist);

        let wishlist = app
            .remove_from_wishlist(RemoveWishlistItemDto {
                user_id: user,
                book_id: book,
            })
            .await
            .unwrap();
        assert!(wishlist.items.is_empty());

        let status = app
            .is_wishlisted(IsWishlistedDto {
                user_id: user,
                book_id: book,
            })
            .await
            .unwrap();
        assert!(!status.in_wishlist);

        // Removing a missing entry stays quiet.
        let wishlist = app
            .remove_from_wishlist(RemoveWishlistItemDto {
                user_id: user,
                book_id: book,
            })
            .await
            .unwrap();
        assert!(wishlist.items.is_empty());
    }

    #[tokio::test]
    async fn unknown_books_cannot_be_wishlisted() {
        let app = MockApp::new();
        let user = MockApp::user();

        let rejection = app
            .add_to_wishlist(AddWishlistItemDto {
                user_id: user,
                book_id: uuid::Uuid::new_v4(),
            })
            .await
            .unwrap()
            .unwrap_err();
        assert_eq!(rejection, CartRejection::BookNotFound);

        let wishlist = app
            .get_wishlist(GetWishlistDto { user_id: user })
            .await
            .unwrap();
        assert!(wishlist.items.is_empty());
    }
}
