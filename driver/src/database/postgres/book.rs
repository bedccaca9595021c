use rust_decimal::Decimal;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::{BookListing, BookQuery, DependOnBookQuery};
use kernel::interface::update::{BookModifier, DependOnBookModifier};
use kernel::prelude::entity::{
    Book, BookAuthor, BookId, BookPrice, BookStock, BookTitle, CategoryId, CreatedAt, IsActive,
    Quantity, UpdatedAt,
};
use kernel::KernelError;

use crate::database::postgres::{PgTransaction, PostgresDatabase};
use crate::error::ConvertError;

pub struct PostgresBookRepository;

#[async_trait::async_trait]
impl BookQuery for PostgresBookRepository {
    type Transaction = PgTransaction;
    async fn find_by_id(
        &self,
        con: &mut PgTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find_by_id(con, id).await
    }

    async fn find_active(
        &self,
        con: &mut PgTransaction,
        listing: &BookListing,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        PgBookInternal::find_active(con, listing).await
    }
}

#[async_trait::async_trait]
impl BookModifier for PostgresBookRepository {
    type Transaction = PgTransaction;

    async fn create(
        &self,
        con: &mut PgTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::create(con, book).await
    }

    async fn update(
        &self,
        con: &mut PgTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::update(con, book).await
    }

    async fn delete(
        &self,
        con: &mut PgTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::delete(con, book_id).await
    }

    async fn reserve_stock(
        &self,
        con: &mut PgTransaction,
        book_id: &BookId,
        quantity: &Quantity,
    ) -> error_stack::Result<bool, KernelError> {
        PgBookInternal::reserve_stock(con, book_id, quantity).await
    }

    async fn restore_stock(
        &self,
        con: &mut PgTransaction,
        book_id: &BookId,
        quantity: &Quantity,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::restore_stock(con, book_id, quantity).await
    }
}

impl DependOnBookQuery for PostgresDatabase {
    type BookQuery = PostgresBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &PostgresBookRepository
    }
}

impl DependOnBookModifier for PostgresDatabase {
    type BookModifier = PostgresBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &PostgresBookRepository
    }
}

#[derive(sqlx::FromRow)]
struct BookRow {
    id: Uuid,
    title: String,
    author: String,
    price: Decimal,
    discount_price: Option<Decimal>,
    stock: i32,
    is_active: bool,
    category_id: Option<Uuid>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<BookRow> for Book {
    fn from(value: BookRow) -> Self {
        Book::new(
            BookId::new(value.id),
            BookTitle::new(value.title),
            BookAuthor::new(value.author),
            BookPrice::new(value.price),
            value.discount_price.map(BookPrice::new),
            BookStock::new(value.stock),
            IsActive::new(value.is_active),
            value.category_id.map(CategoryId::new),
            CreatedAt::new(value.created_at),
            UpdatedAt::new(value.updated_at),
        )
    }
}

pub(in crate::database) struct PgBookInternal;

impl PgBookInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT id, title, author, price, discount_price, stock, is_active, category_id, created_at, updated_at
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Book::from))
    }

    async fn find_active(
        con: &mut PgConnection,
        listing: &BookListing,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        let rows = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT id, title, author, price, discount_price, stock, is_active, category_id, created_at, updated_at
            FROM books
            WHERE is_active = TRUE
              AND ($1::text IS NULL OR title ILIKE '%' || $1 || '%' OR author ILIKE '%' || $1 || '%')
              AND ($2::uuid IS NULL OR category_id = $2)
            ORDER BY created_at DESC, id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(listing.keyword.as_deref())
        .bind(listing.category_id.as_ref().map(|id| id.as_ref()))
        .bind(listing.limit.as_ref())
        .bind(listing.offset.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn create(con: &mut PgConnection, book: &Book) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO books (id, title, author, price, discount_price, stock, is_active, category_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(book.id().as_ref())
        .bind(book.title().as_ref())
        .bind(book.author().as_ref())
        .bind(book.price().as_ref())
        .bind(book.discount_price().as_ref().map(|price| price.as_ref()))
        .bind(book.stock().as_ref())
        .bind(book.is_active().as_ref())
        .bind(book.category_id().as_ref().map(|id| id.as_ref()))
        .bind(book.created_at().as_ref())
        .bind(book.updated_at().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update(con: &mut PgConnection, book: &Book) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            UPDATE books
            SET title = $2, author = $3, price = $4, discount_price = $5, stock = $6, is_active = $7, category_id = $8, updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(book.id().as_ref())
        .bind(book.title().as_ref())
        .bind(book.author().as_ref())
        .bind(book.price().as_ref())
        .bind(book.discount_price().as_ref().map(|price| price.as_ref()))
        .bind(book.stock().as_ref())
        .bind(book.is_active().as_ref())
        .bind(book.category_id().as_ref().map(|id| id.as_ref()))
        .bind(book.updated_at().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn delete(
        con: &mut PgConnection,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            DELETE FROM books
            WHERE id = $1
            "#,
        )
        .bind(book_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn reserve_stock(
        con: &mut PgConnection,
        book_id: &BookId,
        quantity: &Quantity,
    ) -> error_stack::Result<bool, KernelError> {
        let result = sqlx::query(
            // language=postgresql
            r#"
            UPDATE books
            SET stock = stock - $2, updated_at = now()
            WHERE id = $1 AND stock >= $2
            "#,
        )
        .bind(book_id.as_ref())
        .bind(quantity.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(result.rows_affected() == 1)
    }

    async fn restore_stock(
        con: &mut PgConnection,
        book_id: &BookId,
        quantity: &Quantity,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            UPDATE books
            SET stock = stock + $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(book_id.as_ref())
        .bind(quantity.as_ref())
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

    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::BookQuery;
    use kernel::interface::update::BookModifier;
    use kernel::prelude::entity::{
        Book, BookAuthor, BookId, BookPrice, BookStock, BookTitle, CreatedAt, IsActive, Quantity,
        UpdatedAt,
    };
    use kernel::KernelError;

    use crate::database::postgres::{PostgresBookRepository, PostgresDatabase};

    fn new_book(stock: i32) -> Book {
        let now = OffsetDateTime::now_utc();
        Book::new(
            BookId::new(uuid::Uuid::new_v4()),
            BookTitle::new("test"),
            BookAuthor::new("tester"),
            BookPrice::new(Decimal::new(100_000, 0)),
            None,
            BookStock::new(stock),
            IsActive::new(true),
            None,
            CreatedAt::new(now),
            UpdatedAt::new(now),
        )
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn test() -> Result<(), error_stack::Report<KernelError>> {
        let db = PostgresDatabase::new().await?;
        db.migrate().await?;
        let mut con = db.transact().await?;

        let book = new_book(3);
        let id = book.id().clone();
        PostgresBookRepository.create(&mut con, &book).await?;

        let found = PostgresBookRepository.find_by_id(&mut con, &id).await?;
        assert_eq!(found, Some(book.clone()));

        let reserved = PostgresBookRepository
            .reserve_stock(&mut con, &id, &Quantity::new(2))
            .await?;
        assert!(reserved);
        let refused = PostgresBookRepository
            .reserve_stock(&mut con, &id, &Quantity::new(2))
            .await?;
        assert!(!refused);

        let found = PostgresBookRepository
            .find_by_id(&mut con, &id)
            .await?
            .unwrap();
        assert_eq!(found.stock().as_ref(), &1);

        PostgresBookRepository
            .restore_stock(&mut con, &id, &Quantity::new(2))
            .await?;
        let found = PostgresBookRepository
            .find_by_id(&mut con, &id)
            .await?
            .unwrap();
        assert_eq!(found.stock().as_ref(), &3);

        PostgresBookRepository.delete(&mut con, &id).await?;
        let found = PostgresBookRepository.find_by_id(&mut con, &id).await?;
        assert!(found.is_none());

        con.roll_back().await?;
        Ok(())
    }
}
