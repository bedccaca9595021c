use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::{CartQuery, DependOnCartQuery};
use kernel::interface::update::{CartModifier, DependOnCartModifier};
use kernel::prelude::entity::{BookId, CartItem, CreatedAt, Quantity, UpdatedAt, UserId};
use kernel::KernelError;

use crate::database::postgres::{PgTransaction, PostgresDatabase};
use crate::error::ConvertError;

pub struct PostgresCartRepository;

#[async_trait::async_trait]
impl CartQuery for PostgresCartRepository {
    type Transaction = PgTransaction;

    async fn find_by_user(
        &self,
        con: &mut PgTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<CartItem>, KernelError> {
        PgCartInternal::find_by_user(con, user_id).await
    }

    async fn find_item(
        &self,
        con: &mut PgTransaction,
        user_id: &UserId,
        book_id: &BookId,
    ) -> error_stack::Result<Option<CartItem>, KernelError> {
        PgCartInternal::find_item(con, user_id, book_id).await
    }

    async fn count(
        &self,
        con: &mut PgTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<i32, KernelError> {
        PgCartInternal::count(con, user_id).await
    }
}

#[async_trait::async_trait]
impl CartModifier for PostgresCartRepository {
    type Transaction = PgTransaction;

    async fn add_quantity(
        &self,
        con: &mut PgTransaction,
        user_id: &UserId,
        book_id: &BookId,
        quantity: &Quantity,
        at: OffsetDateTime,
    ) -> error_stack::Result<Quantity, KernelError> {
        PgCartInternal::add_quantity(con, user_id, book_id, quantity, at).await
    }

    async fn set_quantity(
        &self,
        con: &mut PgTransaction,
        user_id: &UserId,
        book_id: &BookId,
        quantity: &Quantity,
        at: OffsetDateTime,
    ) -> error_stack::Result<Option<Quantity>, KernelError> {
        PgCartInternal::set_quantity(con, user_id, book_id, quantity, at).await
    }

    async fn delete(
        &self,
        con: &mut PgTransaction,
        user_id: &UserId,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        PgCartInternal::delete(con, user_id, book_id).await
    }

    async fn clear(
        &self,
        con: &mut PgTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<(), KernelError> {
        PgCartInternal::clear(con, user_id).await
    }
}

impl DependOnCartQuery for PostgresDatabase {
    type CartQuery = PostgresCartRepository;
    fn cart_query(&self) -> &Self::CartQuery {
        &PostgresCartRepository
    }
}

impl DependOnCartModifier for PostgresDatabase {
    type CartModifier = PostgresCartRepository;
    fn cart_modifier(&self) -> &Self::CartModifier {
        &PostgresCartRepository
    }
}

#[derive(sqlx::FromRow)]
struct CartItemRow {
    user_id: Uuid,
    book_id: Uuid,
    quantity: i32,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<CartItemRow> for CartItem {
    fn from(value: CartItemRow) -> Self {
        CartItem::new(
            UserId::new(value.user_id),
            BookId::new(value.book_id),
            Quantity::new(value.quantity),
            CreatedAt::new(value.created_at),
            UpdatedAt::new(value.updated_at),
        )
    }
}

pub(in crate::database) struct PgCartInternal;

impl PgCartInternal {
    async fn find_by_user(
        con: &mut PgConnection,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<CartItem>, KernelError> {
        let rows = sqlx::query_as::<_, CartItemRow>(
            // language=postgresql
            r#"
            SELECT user_id, book_id, quantity, created_at, updated_at
            FROM cart_items
            WHERE user_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(user_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(CartItem::from).collect())
    }

    async fn find_item(
        con: &mut PgConnection,
        user_id: &UserId,
        book_id: &BookId,
    ) -> error_stack::Result<Option<CartItem>, KernelError> {
        let row = sqlx::query_as::<_, CartItemRow>(
            // language=postgresql
            r#"
            SELECT user_id, book_id, quantity, created_at, updated_at
            FROM cart_items
            WHERE user_id = $1 AND book_id = $2
            "#,
        )
        .bind(user_id.as_ref())
        .bind(book_id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(CartItem::from))
    }

    async fn count(
        con: &mut PgConnection,
        user_id: &UserId,
    ) -> error_stack::Result<i32, KernelError> {
        let count = sqlx::query_scalar::<_, i32>(
            // language=postgresql
            r#"
            SELECT COALESCE(SUM(quantity), 0)::int
            FROM cart_items
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_ref())
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(count)
    }

    async fn add_quantity(
        con: &mut PgConnection,
        user_id: &UserId,
        book_id: &BookId,
        quantity: &Quantity,
        at: OffsetDateTime,
    ) -> error_stack::Result<Quantity, KernelError> {
        // Store-side increment: two concurrent adds against the same pair
        // serialize on the row and both land.
        let total = sqlx::query_scalar::<_, i32>(
            // language=postgresql
            r#"
            INSERT INTO cart_items (user_id, book_id, quantity, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            ON CONFLICT (user_id, book_id)
            DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity, updated_at = EXCLUDED.updated_at
            RETURNING quantity
            "#,
        )
        .bind(user_id.as_ref())
        .bind(book_id.as_ref())
        .bind(quantity.as_ref())
        .bind(at)
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(Quantity::new(total))
    }

    async fn set_quantity(
        con: &mut PgConnection,
        user_id: &UserId,
        book_id: &BookId,
        quantity: &Quantity,
        at: OffsetDateTime,
    ) -> error_stack::Result<Option<Quantity>, KernelError> {
        let total = sqlx::query_scalar::<_, i32>(
            // language=postgresql
            r#"
            UPDATE cart_items
            SET quantity = $3, updated_at = $4
            WHERE user_id = $1 AND book_id = $2
            RETURNING quantity
            "#,
        )
        .bind(user_id.as_ref())
        .bind(book_id.as_ref())
        .bind(quantity.as_ref())
        .bind(at)
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(total.map(Quantity::new))
    }

    async fn delete(
        con: &mut PgConnection,
        user_id: &UserId,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            DELETE FROM cart_items
            WHERE user_id = $1 AND book_id = $2
            "#,
        )
        .bind(user_id.as_ref())
        .bind(book_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn clear(
        con: &mut PgConnection,
        user_id: &UserId,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            DELETE FROM cart_items
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use rust_decimal::Decimal;
    use time::OffsetDateTime;
    use uuid::Uuid;

    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::CartQuery;
    use kernel::interface::update::{BookModifier, CartModifier};
    use kernel::prelude::entity::{
        Book, BookAuthor, BookId, BookPrice, BookStock, BookTitle, CreatedAt, IsActive, Quantity,
        UpdatedAt, UserId,
    };
    use kernel::KernelError;

    use crate::database::postgres::{
        PostgresBookRepository, PostgresCartRepository, PostgresDatabase,
    };

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn test() -> Result<(), error_stack::Report<KernelError>> {
        let db = PostgresDatabase::new().await?;
        db.migrate().await?;
        let mut con = db.transact().await?;

        let now = OffsetDateTime::now_utc();
        let book_id = BookId::new(Uuid::new_v4());
        let book = Book::new(
            book_id.clone(),
            BookTitle::new("test"),
            BookAuthor::new("tester"),
            BookPrice::new(Decimal::new(50_000, 0)),
            None,
            BookStock::new(10),
            IsActive::new(true),
            None,
            CreatedAt::new(now),
            UpdatedAt::new(now),
        );
        PostgresBookRepository.create(&mut con, &book).await?;

        let user_id = UserId::new(Uuid::new_v4());
        let total = PostgresCartRepository
            .add_quantity(&mut con, &user_id, &book_id, &Quantity::new(2), now)
            .await?;
        assert_eq!(total, Quantity::new(2));
        let total = PostgresCartRepository
            .add_quantity(&mut con, &user_id, &book_id, &Quantity::new(1), now)
            .await?;
        assert_eq!(total, Quantity::new(3));

        let count = PostgresCartRepository.count(&mut con, &user_id).await?;
        assert_eq!(count, 3);

        let set = PostgresCartRepository
            .set_quantity(&mut con, &user_id, &book_id, &Quantity::new(5), now)
            .await?;
        assert_eq!(set, Some(Quantity::new(5)));
        let missing = PostgresCartRepository
            .set_quantity(
                &mut con,
                &user_id,
                &BookId::new(Uuid::new_v4()),
                &Quantity::new(5),
                now,
            )
            .await?;
        assert_eq!(missing, None);

        let items = PostgresCartRepository.find_by_user(&mut con, &user_id).await?;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity(), &Quantity::new(5));

        PostgresCartRepository
            .delete(&mut con, &user_id, &book_id)
            .await?;
        let item = PostgresCartRepository
            .find_item(&mut con, &user_id, &book_id)
            .await?;
        assert!(item.is_none());

        let count = PostgresCartRepository.count(&mut con, &user_id).await?;
        assert_eq!(count, 0);

        con.roll_back().await?;
        Ok(())
    }
}
