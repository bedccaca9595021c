mod author;
mod id;
mod price;
mod stock;
mod title;

pub use self::{author::*, id::*, price::*, stock::*, title::*};
use crate::entity::common::{CreatedAt, IsActive, UpdatedAt};
use crate::entity::CategoryId;
use destructure::{Destructure, Mutation};
use vodca::References;

#[derive(Debug, Clone, PartialEq, References, Destructure, Mutation)]
pub struct Book {
    id: BookId,
    title: BookTitle,
    author: BookAuthor,
    price: BookPrice,
    discount_price: Option<BookPrice>,
    stock: BookStock,
    is_active: IsActive<Book>,
    category_id: Option<CategoryId>,
    created_at: CreatedAt<Book>,
    updated_at: UpdatedAt<Book>,
}

impl Book {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: BookId,
        title: BookTitle,
        author: BookAuthor,
        price: BookPrice,
        discount_price: Option<BookPrice>,
        stock: BookStock,
        is_active: IsActive<Book>,
        category_id: Option<CategoryId>,
        created_at: CreatedAt<Book>,
        updated_at: UpdatedAt<Book>,
    ) -> Self {
        Self {
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
        }
    }

    /// Price a buyer pays right now: the discount price when one is set,
    /// the list price otherwise.
    pub fn display_price(&self) -> &BookPrice {
        self.discount_price.as_ref().unwrap_or(&self.price)
    }

    pub fn is_purchasable(&self) -> bool {
        *self.is_active.as_ref() && *self.stock.as_ref() > 0
    }
}
