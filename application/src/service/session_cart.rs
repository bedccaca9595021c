use time::OffsetDateTime;
use tracing::{info, warn};

use kernel::interface::database::{
    DatabaseConnection, DependOnDatabaseConnection, DependOnSessionDatabaseConnection, Transaction,
};
use kernel::interface::outcome::CartRejection;
use kernel::interface::policy;
use kernel::interface::query::{
    BookQuery, DependOnBookQuery, DependOnSessionCartQuery, SessionCartQuery,
};
use kernel::interface::update::{DependOnSessionCartModifier, SessionCartModifier};
use kernel::prelude::entity::{Book, BookId, CreatedAt, Quantity, SessionCart, SessionId};
use kernel::KernelError;

use crate::transfer::{
    AddSessionItemDto, CartBadgeDto, CartDto, GetSessionCartDto, RemoveSessionItemDto,
    UpdateSessionItemDto,
};

/// Cart engine for anonymous sessions. The same purchase policy as the
/// persistent variant, applied against a session-store document; every check
/// runs against the live catalog, never the stored copy.
#[async_trait::async_trait]
pub trait SessionCartService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnBookQuery
    + DependOnSessionDatabaseConnection
    + DependOnSessionCartQuery
    + DependOnSessionCartModifier
{
    async fn add_session_item(
        &self,
        dto: AddSessionItemDto,
    ) -> error_stack::Result<Result<CartBadgeDto, CartRejection>, KernelError> {
        let session_id = SessionId::new(dto.session_id);
        let book_id = BookId::new(dto.book_id);

        let mut connection = self.database_connection().transact().await?;
        let book = self
            .book_query()
            .find_by_id(&mut connection, &book_id)
            .await?;
        connection.commit().await?;
        let book = match policy::purchasable(book.as_ref()) {
            Ok(book) => book,
            Err(rejection) => {
                warn!(
                    "Refused add to session cart for book {}: {rejection}",
                    dto.book_id
                );
                return Ok(Err(rejection));
            }
        };

        let mut session = self.session_database_connection().transact().await?;
        let mut cart = self
            .session_cart_query()
            .find(&mut session, &session_id)
            .await?
            .unwrap_or_default();
        let in_cart = cart.quantity_of(&book_id);
        let total = in_cart + dto.quantity;
        if let Err(rejection) = policy::admissible_total(book, in_cart, total) {
            warn!(
                "Refused add to session cart for book {}: {rejection}",
                dto.book_id
            );
            return Ok(Err(rejection));
        }

        cart.put(
            book_id,
            Quantity::new(total),
            CreatedAt::new(OffsetDateTime::now_utc()),
        );
        self.session_cart_modifier()
            .save(&mut session, &session_id, &cart)
            .await?;
        session.commit().await?;
        info!(
            "Added {} of book {} to cart of session {}",
            dto.quantity, dto.book_id, dto.session_id
        );
        Ok(Ok(CartBadgeDto {
            item_count: cart.item_count(),
        }))
    }

    async fn update_session_item(
        &self,
        dto: UpdateSessionItemDto,
    ) -> error_stack::Result<Result<CartDto, CartRejection>, KernelError> {
        if dto.quantity <= 0 {
            let cart = self
                .remove_session_item(RemoveSessionItemDto {
                    session_id: dto.session_id,
                    book_id: dto.book_id,
                })
                .await?;
            return Ok(Ok(cart));
        }

        let session_id = SessionId::new(dto.session_id);
        let book_id = BookId::new(dto.book_id);

        let mut session = self.session_database_connection().transact().await?;
        let mut cart = self
            .session_cart_query()
            .find(&mut session, &session_id)
            .await?
            .unwrap_or_default();
        let in_cart = cart.quantity_of(&book_id);
        if in_cart == 0 {
            return Ok(Err(CartRejection::ItemNotFound));
        }

        let mut connection = self.database_connection().transact().await?;
        let book = self
            .book_query()
            .find_by_id(&mut connection, &book_id)
            .await?;
        connection.commit().await?;
        let rejection = match policy::purchasable(book.as_ref()) {
            Err(rejection) => Some(rejection),
            Ok(book) => policy::admissible_total(book, in_cart, dto.quantity).err(),
        };
        if let Some(rejection) = rejection {
            warn!(
                "Refused session cart update for book {}: {rejection}",
                dto.book_id
            );
            return Ok(Err(rejection));
        }

        cart.put(
            book_id,
            Quantity::new(dto.quantity),
            CreatedAt::new(OffsetDateTime::now_utc()),
        );
        self.session_cart_modifier()
            .save(&mut session, &session_id, &cart)
            .await?;
        session.commit().await?;

        let cart = self
            .get_session_cart(GetSessionCartDto {
                session_id: dto.session_id,
            })
            .await?;
        Ok(Ok(cart))
    }

    async fn remove_session_item(
        &self,
        dto: RemoveSessionItemDto,
    ) -> error_stack::Result<CartDto, KernelError> {
        let session_id = SessionId::new(dto.session_id);
        let book_id = BookId::new(dto.book_id);

        let mut session = self.session_database_connection().transact().await?;
        let cart = self
            .session_cart_query()
            .find(&mut session, &session_id)
            .await?;
        if let Some(mut cart) = cart {
            cart.remove(&book_id);
            self.session_cart_modifier()
                .save(&mut session, &session_id, &cart)
                .await?;
        }
        session.commit().await?;

        self.get_session_cart(GetSessionCartDto {
            session_id: dto.session_id,
        })
        .await
    }

    async fn clear_session_cart(
        &self,
        dto: GetSessionCartDto,
    ) -> error_stack::Result<(), KernelError> {
        let session_id = SessionId::new(dto.session_id);
        let mut session = self.session_database_connection().transact().await?;
        self.session_cart_modifier()
            .clear(&mut session, &session_id)
            .await?;
        session.commit().await?;
        info!("Cleared cart of session {}", dto.session_id);
        Ok(())
    }

    async fn get_session_cart(
        &self,
        dto: GetSessionCartDto,
    ) -> error_stack::Result<CartDto, KernelError> {
        let session_id = SessionId::new(dto.session_id);
        let mut session = self.session_database_connection().transact().await?;
        let cart = self
            .session_cart_query()
            .find(&mut session, &session_id)
            .await?
            .unwrap_or_default();
        session.commit().await?;

        let mut connection = self.database_connection().transact().await?;
        let mut lines: Vec<(Book, i32)> = Vec::with_capacity(cart.items().len());
        for item in cart.items() {
            let book = self
                .book_query()
                .find_by_id(&mut connection, item.book_id())
                .await?;
            match book {
                Some(book) => lines.push((book, *item.quantity().as_ref())),
                None => warn!(
                    "Dropping session cart line of session {}: book {} no longer exists",
                    dto.session_id,
                    item.book_id().as_ref()
                ),
            }
        }
        connection.commit().await?;
        Ok(CartDto::assemble(lines))
    }

    async fn get_session_item_count(
        &self,
        dto: GetSessionCartDto,
    ) -> error_stack::Result<CartBadgeDto, KernelError> {
        let session_id = SessionId::new(dto.session_id);
        let mut session = self.session_database_connection().transact().await?;
        let cart = self
            .session_cart_query()
            .find(&mut session, &session_id)
            .await?;
        session.commit().await?;
        Ok(CartBadgeDto {
            item_count: cart.as_ref().map(SessionCart::item_count).unwrap_or(0),
        })
    }
}

impl<T> SessionCartService for T where
    T: DependOnDatabaseConnection
        + DependOnBookQuery
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
    use crate::service::SessionCartService;
    use crate::transfer::{
        AddSessionItemDto, GetSessionCartDto, RemoveSessionItemDto, UpdateSessionItemDto,
    };

    #[tokio::test]
    async fn session_cart_mirrors_the_persistent_contract() {
        let app = MockApp::new();
        let book = app.seed_book(3, Decimal::new(100_000, 0), None, true);
        let session = MockApp::session();

        let badge = app
            .add_session_item(AddSessionItemDto {
                session_id: session,
                book_id: book,
                quantity: 2,
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(badge.item_count, 2);

        let rejection = app
            .add_session_item(AddSessionItemDto {
                session_id: session,
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

        let cart = app
            .update_session_item(UpdateSessionItemDto {
                session_id: session,
                book_id: book,
                quantity: 3,
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cart.items[0].quantity, 3);

        let cart = app
            .update_session_item(UpdateSessionItemDto {
                session_id: session,
                book_id: book,
                quantity: 0,
            })
            .await
            .unwrap()
            .unwrap();
        assert!(cart.is_empty);
    }

    #[tokio::test]
    async fn session_prices_track_the_live_catalog() {
        let app = MockApp::new();
        let book = app.seed_book(10, Decimal::new(100_000, 0), None, true);
        let session = MockApp::session();

        app.add_session_item(AddSessionItemDto {
            session_id: session,
            book_id: book,
            quantity: 1,
        })
        .await
        .unwrap()
        .unwrap();

        // A price cut after the item went into the session cart shows up in
        // the aggregate immediately.
        app.set_discount_price(book, Some(Decimal::new(70_000, 0)));

        let cart = app
            .get_session_cart(GetSessionCartDto {
                session_id: session,
            })
            .await
            .unwrap();
        assert_eq!(cart.items[0].unit_price, Decimal::new(70_000, 0));
        assert_eq!(cart.subtotal, Decimal::new(70_000, 0));
    }

    #[tokio::test]
    async fn removing_from_an_absent_session_cart_is_a_no_op() {
        let app = MockApp::new();
        let book = app.seed_book(10, Decimal::new(100_000, 0), None, true);
        let session = MockApp::session();

        let cart = app
            .remove_session_item(RemoveSessionItemDto {
                session_id: session,
                book_id: book,
            })
            .await
            .unwrap();
        assert!(cart.is_empty);

        let badge = app
            .get_session_item_count(GetSessionCartDto {
                session_id: session,
            })
            .await
            .unwrap();
        assert_eq!(badge.item_count, 0);
    }
}
