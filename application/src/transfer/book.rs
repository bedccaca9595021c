use rust_decimal::Decimal;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::prelude::entity::{
    Book, Category, DestructBook, DestructCategory, SelectLimit, SelectOffset,
};

#[derive(Debug, Clone)]
pub struct BookDto {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub display_price: Decimal,
    pub stock: i32,
    pub is_active: bool,
    pub category_id: Option<Uuid>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<Book> for BookDto {
    fn from(value: Book) -> Self {
        let display_price = *value.display_price().as_ref();
        let DestructBook {
            id,
            title,
            author,
            price,
            discount_price,
            stock,
            is_active,
            category_id,
            created_at,
            updated_at,
        } = value.into_destruct();
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            price: price.into(),
            discount_price: discount_price.map(Into::into),
            display_price,
            stock: stock.into(),
            is_active: *is_active.as_ref(),
            category_id: category_id.map(Into::into),
            created_at: *created_at.as_ref(),
            updated_at: *updated_at.as_ref(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CategoryDto {
    pub id: Uuid,
    pub name: String,
}

impl From<Category> for CategoryDto {
    fn from(value: Category) -> Self {
        let DestructCategory { id, name } = value.into_destruct();
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug)]
pub struct GetBookDto {
    pub id: Uuid,
}

#[derive(Debug, Default)]
pub struct ListBooksDto {
    pub keyword: Option<String>,
    pub category_id: Option<Uuid>,
    pub limit: SelectLimit,
    pub offset: SelectOffset,
}

#[derive(Debug)]
pub struct CreateBookDto {
    pub title: String,
    pub author: String,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub stock: i32,
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Default)]
pub struct UpdateBookDto {
    pub id: Uuid,
    pub title: Option<String>,
    pub author: Option<String>,
    pub price: Option<Decimal>,
    pub discount_price: Option<Decimal>,
    pub stock: Option<i32>,
    pub is_active: Option<bool>,
    pub category_id: Option<Uuid>,
}

#[derive(Debug)]
pub struct DeleteBookDto {
    pub id: Uuid,
}
