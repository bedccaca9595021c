use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{
    BookListing, BookQuery, CategoryQuery, DependOnBookQuery, DependOnCategoryQuery,
};
use kernel::interface::update::{BookModifier, DependOnBookModifier};
use kernel::prelude::entity::{
    Book, BookAuthor, BookId, BookPrice, BookStock, BookTitle, CategoryId, CreatedAt, IsActive,
    UpdatedAt,
};
use kernel::KernelError;

use crate::transfer::{
    BookDto, CategoryDto, CreateBookDto, DeleteBookDto, GetBookDto, ListBooksDto, UpdateBookDto,
};

#[async_trait::async_trait]
pub trait GetBookService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnBookQuery + DependOnCategoryQuery
{
    async fn get_book(&self, dto: GetBookDto) -> error_stack::Result<Option<BookDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let book = self
            .book_query()
            .find_by_id(&mut connection, &BookId::new(dto.id))
            .await?;
        connection.commit().await?;
        Ok(book.map(BookDto::from))
    }

    async fn list_books(
        &self,
        dto: ListBooksDto,
    ) -> error_stack::Result<Vec<BookDto>, KernelError> {
        let listing = BookListing {
            keyword: dto.keyword,
            category_id: dto.category_id.map(CategoryId::new),
            limit: dto.limit,
            offset: dto.offset,
        };
        let mut connection = self.database_connection().transact().await?;
        let books = self
            .book_query()
            .find_active(&mut connection, &listing)
            .await?;
        connection.commit().await?;
        Ok(books.into_iter().map(BookDto::from).collect())
    }

    async fn list_categories(&self) -> error_stack::Result<Vec<CategoryDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let categories = self.category_query().find_all(&mut connection).await?;
        connection.commit().await?;
        Ok(categories.into_iter().map(CategoryDto::from).collect())
    }
}

impl<T> GetBookService for T where
    T: DependOnDatabaseConnection + DependOnBookQuery + DependOnCategoryQuery
{
}

/// Back-office catalog management.
#[async_trait::async_trait]
pub trait ManageBookService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnBookQuery + DependOnBookModifier
{
    async fn create_book(&self, dto: CreateBookDto) -> error_stack::Result<BookDto, KernelError> {
        let now = OffsetDateTime::now_utc();
        let book = Book::new(
            BookId::new(Uuid::new_v4()),
            BookTitle::new(dto.title),
            BookAuthor::new(dto.author),
            BookPrice::new(dto.price),
            dto.discount_price.map(BookPrice::new),
            BookStock::new(dto.stock),
            IsActive::new(true),
            dto.category_id.map(CategoryId::new),
            CreatedAt::new(now),
            UpdatedAt::new(now),
        );
        let mut connection = self.database_connection().transact().await?;
        self.book_modifier().create(&mut connection, &book).await?;
        connection.commit().await?;
        info!("Created book {}", book.id().as_ref());
        Ok(BookDto::from(book))
    }

    /// Partial update; absent fields keep their stored values. `None` when
    /// the book does not exist.
    async fn update_book(
        &self,
        dto: UpdateBookDto,
    ) -> error_stack::Result<Option<BookDto>, KernelError> {
        let id = BookId::new(dto.id);
        let mut connection = self.database_connection().transact().await?;
        let book = self.book_query().find_by_id(&mut connection, &id).await?;
        let Some(book) = book else {
            connection.roll_back().await?;
            return Ok(None);
        };

        let book = book.reconstruct(|b| {
            if let Some(title) = dto.title {
                b.title = BookTitle::new(title);
            }
            if let Some(author) = dto.author {
                b.author = BookAuthor::new(author);
            }
            if let Some(price) = dto.price {
                b.price = BookPrice::new(price);
            }
            if let Some(discount_price) = dto.discount_price {
                b.discount_price = Some(BookPrice::new(discount_price));
            }
            if let Some(stock) = dto.stock {
                b.stock = BookStock::new(stock);
            }
            if let Some(is_active) = dto.is_active {
                b.is_active = IsActive::new(is_active);
            }
            if let Some(category_id) = dto.category_id {
                b.category_id = Some(CategoryId::new(category_id));
            }
            b.updated_at = UpdatedAt::new(OffsetDateTime::now_utc());
        });
        self.book_modifier().update(&mut connection, &book).await?;
        connection.commit().await?;
        info!("Updated book {}", dto.id);
        Ok(Some(BookDto::from(book)))
    }

    async fn delete_book(
        &self,
        dto: DeleteBookDto,
    ) -> error_stack::Result<Option<()>, KernelError> {
        let id = BookId::new(dto.id);
        let mut connection = self.database_connection().transact().await?;
        let book = self.book_query().find_by_id(&mut connection, &id).await?;
        if book.is_none() {
            connection.roll_back().await?;
            return Ok(None);
        }
        self.book_modifier().delete(&mut connection, &id).await?;
        connection.commit().await?;
        info!("Deleted book {}", dto.id);
        Ok(Some(()))
    }
}

impl<T> ManageBookService for T where
    T: DependOnDatabaseConnection + DependOnBookQuery + DependOnBookModifier
{
}

#[cfg(test)]
mod test {
    use rust_decimal::Decimal;

    use crate::mock::MockApp;
    use crate::service::{GetBookService, ManageBookService};
    use crate::transfer::{CreateBookDto, DeleteBookDto, GetBookDto, ListBooksDto, UpdateBookDto};

    #[tokio::test]
    async fn created_books_are_listed_and_updatable() {
        let app = MockApp::new();
        let created = app
            .create_book(CreateBookDto {
                title: "The Pragmatic Shopkeeper".into(),
                author: "A. Vendor".into(),
                price: Decimal::new(120_000, 0),
                discount_price: None,
                stock: 4,
                category_id: None,
            })
            .await
            .unwrap();
        assert!(created.is_active);
        assert_eq!(created.display_price, Decimal::new(120_000, 0));

        let listed = app.list_books(ListBooksDto::default()).await.unwrap();
        assert_eq!(listed.len(), 1);

        let updated = app
            .update_book(UpdateBookDto {
                id: created.id,
                discount_price: Some(Decimal::new(90_000, 0)),
                ..UpdateBookDto::default()
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.display_price, Decimal::new(90_000, 0));
        assert_eq!(updated.price, Decimal::new(120_000, 0));

        app.delete_book(DeleteBookDto { id: created.id })
            .await
            .unwrap()
            .unwrap();
        let gone = app.get_book(GetBookDto { id: created.id }).await.unwrap();
        assert!(gone.is_none());
    }

    #[tokio::test]
    async fn deactivated_books_vanish_from_the_listing() {
        let app = MockApp::new();
        let book = app.seed_book(4, Decimal::new(100_000, 0), None, true);

        app.update_book(UpdateBookDto {
            id: book,
            is_active: Some(false),
            ..UpdateBookDto::default()
        })
        .await
        .unwrap()
        .unwrap();

        let listed = app.list_books(ListBooksDto::default()).await.unwrap();
        assert!(listed.is_empty());
    }
}
