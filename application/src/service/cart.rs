use time::OffsetDateTime;
use tracing::{info, warn};

use kernel::interface::database::{
    DatabaseConnection, DependOnDatabaseConnection, DependOnSessionDatabaseConnection, Transaction,
};
use kernel::interface::outcome::CartRejection;
use kernel::interface::policy;
use kernel::interface::query::{
    BookQuery, CartQuery, DependOnBookQuery, DependOnCartQuery, DependOnSessionCartQuery,
    SessionCartQuery,
};
use kernel::interface::update::{
    CartModifier, DependOnCartModifier, DependOnSessionCartModifier, SessionCartModifier,
};
use kernel::prelude::entity::{Book, BookId, Quantity, SessionId, UserId};
use kernel::KernelError;

use crate::transfer::{
    AddCartItemDto, CartBadgeDto, CartDto, GetCartDto, MigrateCartDto, MigratedCartDto,
    RemoveCartItemDto, UpdateCartItemDto,
};

/// Cart engine for authenticated users, backed by relational rows. Stock is
/// checked but never reserved here; reservation happens at order creation.
#[async_trait::async_trait]
pub trait CartService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnBookQuery
    + DependOnCartQuery
    + DependOnCartModifier
{
    async fn add_item(
        &self,
        dto: AddCartItemDto,
    ) -> error_stack::Result<Result<CartBadgeDto, CartRejection>, KernelError> {
        let user_id = UserId::new(dto.user_id);
        let book_id = BookId::new(dto.book_id);
        let mut connection = self.database_connection().transact().await?;

        let book = self
            .book_query()
            .find_by_id(&mut connection, &book_id)
            .await?;
        let book = match policy::purchasable(book.as_ref()) {
            Ok(book) => book,
            Err(rejection) => {
                connection.roll_back().await?;
                warn!("Refused add to cart for book {}: {rejection}", dto.book_id);
                return Ok(Err(rejection));
            }
        };

        // The increment is applied store-side first; an inadmissible total is
        // rolled back, so concurrent adds against the same pair cannot lose
        // an update and cannot commit past the limits either.
        let total = self
            .cart_modifier()
            .add_quantity(
                &mut connection,
                &user_id,
                &book_id,
                &Quantity::new(dto.quantity),
                OffsetDateTime::now_utc(),
            )
            .await?;
        let total = *total.as_ref();
        if let Err(rejection) = policy::admissible_total(book, total - dto.quantity, total) {
            connection.roll_back().await?;
            warn!("Refused add to cart for book {}: {rejection}", dto.book_id);
            return Ok(Err(rejection));
        }

        let item_count = self.cart_query().count(&mut connection, &user_id).await?;
        connection.commit().await?;
        info!(
            "Added {} of book {} to cart of user {}",
            dto.quantity, dto.book_id, dto.user_id
        );
        Ok(Ok(CartBadgeDto { item_count }))
    }

    async fn update_item(
        &self,
        dto: UpdateCartItemDto,
    ) -> error_stack::Result<Result<CartDto, CartRejection>, KernelError> {
        if dto.quantity <= 0 {
            let cart = self
                .remove_item(RemoveCartItemDto {
                    user_id: dto.user_id,
                    book_id: dto.book_id,
                })
                .await?;
            return Ok(Ok(cart));
        }

        let user_id = UserId::new(dto.user_id);
        let book_id = BookId::new(dto.book_id);
        let mut connection = self.database_connection().transact().await?;

        let item = self
            .cart_query()
            .find_item(&mut connection, &user_id, &book_id)
            .await?;
        let Some(item) = item else {
            connection.roll_back().await?;
            return Ok(Err(CartRejection::ItemNotFound));
        };

        let book = self
            .book_query()
            .find_by_id(&mut connection, &book_id)
            .await?;
        let in_cart = *item.quantity().as_ref();
        let rejection = match policy::purchasable(book.as_ref()) {
            Err(rejection) => Some(rejection),
            Ok(book) => policy::admissible_total(book, in_cart, dto.quantity).err(),
        };
        if let Some(rejection) = rejection {
            connection.roll_back().await?;
            warn!(
                "Refused cart update for book {}: {rejection}",
                dto.book_id
            );
            return Ok(Err(rejection));
        }

        let updated = self
            .cart_modifier()
            .set_quantity(
                &mut connection,
                &user_id,
                &book_id,
                &Quantity::new(dto.quantity),
                OffsetDateTime::now_utc(),
            )
            .await?;
        if updated.is_none() {
            connection.roll_back().await?;
            return Ok(Err(CartRejection::ItemNotFound));
        }
        connection.commit().await?;

        let cart = self.get_cart(GetCartDto { user_id: dto.user_id }).await?;
        Ok(Ok(cart))
    }

    async fn remove_item(
        &self,
        dto: RemoveCartItemDto,
    ) -> error_stack::Result<CartDto, KernelError> {
        let user_id = UserId::new(dto.user_id);
        let book_id = BookId::new(dto.book_id);
        let mut connection = self.database_connection().transact().await?;
        self.cart_modifier()
            .delete(&mut connection, &user_id, &book_id)
            .await?;
        connection.commit().await?;
        self.get_cart(GetCartDto { user_id: dto.user_id }).await
    }

    async fn clear_cart(&self, dto: GetCartDto) -> error_stack::Result<(), KernelError> {
        let user_id = UserId::new(dto.user_id);
        let mut connection = self.database_connection().transact().await?;
        self.cart_modifier().clear(&mut connection, &user_id).await?;
        connection.commit().await?;
        info!("Cleared cart of user {}", dto.user_id);
        Ok(())
    }

    /// Recomputes the aggregate from live rows; prices and stock flags are
    /// current, not what they were when the items were added.
    async fn get_cart(&self, dto: GetCartDto) -> error_stack::Result<CartDto, KernelError> {
        let user_id = UserId::new(dto.user_id);
        let mut connection = self.database_connection().transact().await?;
        let items = self
            .cart_query()
            .find_by_user(&mut connection, &user_id)
            .await?;

        let mut lines: Vec<(Book, i32)> = Vec::with_capacity(items.len());
        for item in items {
            let book = self
                .book_query()
                .find_by_id(&mut connection, item.book_id())
                .await?;
            match book {
                Some(book) => lines.push((book, *item.quantity().as_ref())),
                None => warn!(
                    "Dropping cart line of user {}: book {} no longer exists",
                    dto.user_id,
                    item.book_id().as_ref()
                ),
            }
        }
        connection.commit().await?;
        Ok(CartDto::assemble(lines))
    }

    async fn get_item_count(
        &self,
        dto: GetCartDto,
    ) -> error_stack::Result<CartBadgeDto, KernelError> {
        let user_id = UserId::new(dto.user_id);
        let mut connection = self.database_connection().transact().await?;
        let item_count = self.cart_query().count(&mut connection, &user_id).await?;
        connection.commit().await?;
        Ok(CartBadgeDto { item_count })
    }
}

impl<T> CartService for T where
    T: DependOnDatabaseConnection + DependOnBookQuery + DependOnCartQuery + DependOnCartModifier
{
}

/// Login-time hand-over of a session cart to the account cart. Items are
/// re-validated one by one; a failed line is logged and skipped, never fatal.
/// The session cart is discarded afterwards regardless.
#[async_trait::async_trait]
pub trait MigrateCartService:
    CartService
    + DependOnSessionDatabaseConnection
    + DependOnSessionCartQuery
    + DependOnSessionCartModifier
{
    async fn migrate_to_user(
        &self,
        dto: MigrateCartDto,
    ) -> error_stack::Result<MigratedCartDto, KernelError> {
        let session_id = SessionId::new(dto.session_id);
        let mut session = self.session_database_connection().transact().await?;
        let cart = self
            .session_cart_query()
            .find(&mut session, &session_id)
            .await?
            .unwrap_or_default();

        let mut migrated = 0;
        for item in cart.into_items() {
            let book_id = *item.book_id().as_ref();
            let result = self
                .add_item(AddCartItemDto {
                    user_id: dto.user_id,
                    book_id,
                    quantity: *item.quantity().as_ref(),
                })
                .await;
            match result {
                Ok(Ok(_)) => migrated += 1,
                Ok(Err(rejection)) => {
                    warn!("Skipped book {book_id} during cart migration: {rejection}")
                }
                Err(report) => {
                    warn!("Skipped book {book_id} during cart migration: {report:?}")
                }
            }
        }

        self.session_cart_modifier()
            .clear(&mut session, &session_id)
            .await?;
        session.commit().await?;

        let badge = self
            .get_item_count(GetCartDto {
                user_id: dto.user_id,
            })
            .await?;
        info!(
            "Migrated {migrated} session cart items of session {} to user {}",
            dto.session_id, dto.user_id
        );
        Ok(MigratedCartDto {
            migrated,
            item_count: badge.item_count,
        })
    }
}

impl<T> MigrateCartService for T where
    T: CartService
        + DependOnSessionDatabaseConnection
        + DependOnSessionCartQuery
        + DependOnSessionCartModifier
{
}

#[cfg(test)]
mod test {
    use rust_decimal::Decimal;

    use kernel::interface::outcome::CartRejection;

    use crate::mock::MockApp;
    use crate::service::{CartService, MigrateCartService, SessionCartService};
    use crate::transfer::{
        AddCartItemDto, AddSessionItemDto, GetCartDto, MigrateCartDto, RemoveCartItemDto,
        UpdateCartItemDto,
    };

    #[tokio::test]
    async fn adding_twice_accumulates_quantity() {
        let app = MockApp::new();
        let book = app.seed_book(5, Decimal::new(100_000, 0), None, true);
        let user = MockApp::user();

        let badge = app
            .add_item(AddCartItemDto {
                user_id: user,
                book_id: book,
                quantity: 1,
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(badge.item_count, 1);

        let badge = app
            .add_item(AddCartItemDto {
                user_id: user,
                book_id: book,
                quantity: 1,
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(badge.item_count, 2);

        let cart = app.get_cart(GetCartDto { user_id: user }).await.unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 2);
    }

    #[tokio::test]
    async fn add_beyond_stock_reports_exact_availability() {
        let app = MockApp::new();
        let book = app.seed_book(3, Decimal::new(100_000, 0), None, true);
        let user = MockApp::user();

        app.add_item(AddCartItemDto {
            user_id: user,
            book_id: book,
            quantity: 2,
        })
        .await
        .unwrap()
        .unwrap();

        let rejection = app
            .add_item(AddCartItemDto {
                user_id: user,
                book_id: book,
                quantity: 2,
            })
            .await
            .unwrap()
            .unwrap_err();
        assert_eq!(
            rejection,
            CartRejection::InsufficientStock {
                available: 3,
                in_cart: 2
            }
        );

        // The refused increment must not leak into the stored quantity.
        let cart = app.get_cart(GetCartDto { user_id: user }).await.unwrap();
        assert_eq!(cart.items[0].quantity, 2);
    }

    #[tokio::test]
    async fn add_beyond_the_cap_is_refused_with_ample_stock() {
        let app = MockApp::new();
        let book = app.seed_book(50, Decimal::new(100_000, 0), None, true);
        let user = MockApp::user();

        app.add_item(AddCartItemDto {
            user_id: user,
            book_id: book,
            quantity: 8,
        })
        .await
        .unwrap()
        .unwrap();

        let rejection = app
            .add_item(AddCartItemDto {
                user_id: user,
                book_id: book,
                quantity: 3,
            })
            .await
            .unwrap()
            .unwrap_err();
        assert_eq!(
            rejection,
            CartRejection::QuantityLimitExceeded {
                limit: 10,
                in_cart: 8
            }
        );
    }

    #[tokio::test]
    async fn inactive_and_unknown_books_cannot_be_added() {
        let app = MockApp::new();
        let inactive = app.seed_book(5, Decimal::new(100_000, 0), None, false);
        let user = MockApp::user();

        let rejection = app
            .add_item(AddCartItemDto {
                user_id: user,
                book_id: inactive,
                quantity: 1,
            })
            .await
            .unwrap()
            .unwrap_err();
        assert_eq!(rejection, CartRejection::BookInactive);

        let rejection = app
            .add_item(AddCartItemDto {
                user_id: user,
                book_id: uuid::Uuid::new_v4(),
                quantity: 1,
            })
            .await
            .unwrap()
            .unwrap_err();
        assert_eq!(rejection, CartRejection::BookNotFound);
    }

    #[tokio::test]
    async fn update_sets_the_absolute_quantity() {
        let app = MockApp::new();
        let book = app.seed_book(10, Decimal::new(100_000, 0), None, true);
        let user = MockApp::user();

        app.add_item(AddCartItemDto {
            user_id: user,
            book_id: book,
            quantity: 2,
        })
        .await
        .unwrap()
        .unwrap();

        let cart = app
            .update_item(UpdateCartItemDto {
                user_id: user,
                book_id: book,
                quantity: 5,
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cart.items[0].quantity, 5);
        assert_eq!(cart.item_count, 5);
    }

    #[tokio::test]
    async fn update_to_zero_removes_the_item() {
        let app = MockApp::new();
        let book = app.seed_book(10, Decimal::new(100_000, 0), None, true);
        let user = MockApp::user();

        app.add_item(AddCartItemDto {
            user_id: user,
            book_id: book,
            quantity: 2,
        })
        .await
        .unwrap()
        .unwrap();

        let cart = app
            .update_item(UpdateCartItemDto {
                user_id: user,
                book_id: book,
                quantity: 0,
            })
            .await
            .unwrap()
            .unwrap();
        assert!(cart.is_empty);
        assert!(cart.items.is_empty());
    }

    #[tokio::test]
    async fn update_of_a_missing_item_is_item_not_found() {
        let app = MockApp::new();
        let book = app.seed_book(10, Decimal::new(100_000, 0), None, true);
        let user = MockApp::user();

        let rejection = app
            .update_item(UpdateCartItemDto {
                user_id: user,
                book_id: book,
                quantity: 3,
            })
            .await
            .unwrap()
            .unwrap_err();
        assert_eq!(rejection, CartRejection::ItemNotFound);
    }

    #[tokio::test]
    async fn removing_a_missing_item_is_a_no_op() {
        let app = MockApp::new();
        let book = app.seed_book(10, Decimal::new(100_000, 0), None, true);
        let user = MockApp::user();

        let cart = app
            .remove_item(RemoveCartItemDto {
                user_id: user,
                book_id: book,
            })
            .await
            .unwrap();
        assert!(cart.is_empty);
    }

    #[tokio::test]
    async fn cart_totals_follow_the_live_discount_price() {
        let app = MockApp::new();
        let book = app.seed_book(
            10,
            Decimal::new(100_000, 0),
            Some(Decimal::new(80_000, 0)),
            true,
        );
        let user = MockApp::user();

        app.add_item(AddCartItemDto {
            user_id: user,
            book_id: book,
            quantity: 2,
        })
        .await
        .unwrap()
        .unwrap();

        let cart = app.get_cart(GetCartDto { user_id: user }).await.unwrap();
        assert_eq!(cart.subtotal, Decimal::new(160_000, 0));
        assert_eq!(cart.tax, Decimal::new(16_000, 0));
        assert_eq!(cart.shipping, Decimal::new(30_000, 0));
        assert_eq!(cart.total, Decimal::new(206_000, 0));
        assert_eq!(cart.items[0].unit_price, Decimal::new(80_000, 0));
    }

    #[tokio::test]
    async fn migration_moves_items_skips_failures_and_clears_the_session() {
        let app = MockApp::new();
        let fine = app.seed_book(5, Decimal::new(100_000, 0), None, true);
        let drained = app.seed_book(2, Decimal::new(50_000, 0), None, true);
        let user = MockApp::user();
        let session = MockApp::session();

        app.add_session_item(AddSessionItemDto {
            session_id: session,
            book_id: fine,
            quantity: 2,
        })
        .await
        .unwrap()
        .unwrap();
        app.add_session_item(AddSessionItemDto {
            session_id: session,
            book_id: drained,
            quantity: 2,
        })
        .await
        .unwrap()
        .unwrap();

        // Stock of the second book vanishes between browsing and login.
        app.set_stock(drained, 1);

        let result = app
            .migrate_to_user(MigrateCartDto {
                session_id: session,
                user_id: user,
            })
            .await
            .unwrap();
        assert_eq!(result.migrated, 1);
        assert_eq!(result.item_count, 2);

        // Cleared unconditionally, including the line that failed.
        assert!(app.session_cart(session).is_none());

        let cart = app.get_cart(GetCartDto { user_id: user }).await.unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].book_id, fine);
    }
}
