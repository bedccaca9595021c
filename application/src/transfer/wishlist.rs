use rust_decimal::Decimal;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::prelude::entity::{Book, WishlistItem};

#[derive(Debug, Clone)]
pub struct WishlistDto {
    pub items: Vec<WishlistItemDto>,
}

#[derive(Debug, Clone)]
pub struct WishlistItemDto {
    pub book_id: Uuid,
    pub title: String,
    pub author: String,
    pub display_price: Decimal,
    pub in_stock: bool,
    pub added_at: OffsetDateTime,
}

impl WishlistItemDto {
    pub(crate) fn from_parts(item: &WishlistItem, book: &Book) -> Self {
        Self {
            book_id: *book.id().as_ref(),
            title: book.title().as_ref().clone(),
            author: book.author().as_ref().clone(),
            display_price: *book.display_price().as_ref(),
            in_stock: book.is_purchasable(),
            added_at: *item.added_at().as_ref(),
        }
    }
}

#[derive(Debug)]
pub struct AddWishlistItemDto {
    pub user_id: Uuid,
    pub book_id: Uuid,
}

#[derive(Debug)]
pub struct RemoveWishlistItemDto {
    pub user_id: Uuid,
    pub book_id: Uuid,
}

#[derive(Debug)]
pub struct IsWishlistedDto {
    pub user_id: Uuid,
    pub book_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct WishlistStatusDto {
    pub in_wishlist: bool,
}

#[derive(Debug)]
pub struct GetWishlistDto {
    pub user_id: Uuid,
}
