use rust_decimal::Decimal;
use uuid::Uuid;

use kernel::interface::policy::MAX_QUANTITY_PER_ITEM;
use kernel::prelude::entity::{Book, CartTotals};

/// The computed cart aggregate handed to the presentation layer. Prices are
/// whatever the catalog says at assembly time.
#[derive(Debug, Clone)]
pub struct CartDto {
    pub items: Vec<CartItemDto>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub item_count: i32,
    pub is_empty: bool,
    pub qualifies_for_free_shipping: bool,
    pub amount_for_free_shipping: Decimal,
}

impl CartDto {
    /// `lines` pairs each live book row with the quantity held in the cart.
    pub fn assemble(lines: Vec<(Book, i32)>) -> Self {
        let totals = CartTotals::from_lines(
            lines
                .iter()
                .map(|(book, quantity)| (*book.display_price().as_ref(), *quantity)),
        );
        let items = lines
            .into_iter()
            .map(|(book, quantity)| CartItemDto::from_line(book, quantity))
            .collect();
        Self {
            items,
            subtotal: *totals.subtotal(),
            tax: *totals.tax(),
            shipping: *totals.shipping(),
            total: *totals.total(),
            item_count: *totals.item_count(),
            is_empty: totals.is_empty(),
            qualifies_for_free_shipping: totals.qualifies_for_free_shipping(),
            amount_for_free_shipping: totals.amount_for_free_shipping(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CartItemDto {
    pub book_id: Uuid,
    pub title: String,
    pub author: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub line_total: Decimal,
    pub in_stock: bool,
    pub max_quantity: i32,
}

impl CartItemDto {
    fn from_line(book: Book, quantity: i32) -> Self {
        let unit_price = *book.display_price().as_ref();
        let stock = *book.stock().as_ref();
        Self {
            book_id: *book.id().as_ref(),
            title: book.title().as_ref().clone(),
            author: book.author().as_ref().clone(),
            unit_price,
            quantity,
            line_total: unit_price * Decimal::from(quantity),
            in_stock: book.is_purchasable(),
            max_quantity: stock.min(MAX_QUANTITY_PER_ITEM),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CartBadgeDto {
    pub item_count: i32,
}

#[derive(Debug)]
pub struct AddCartItemDto {
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug)]
pub struct UpdateCartItemDto {
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug)]
pub struct RemoveCartItemDto {
    pub user_id: Uuid,
    pub book_id: Uuid,
}

#[derive(Debug)]
pub struct GetCartDto {
    pub user_id: Uuid,
}

#[derive(Debug)]
pub struct AddSessionItemDto {
    pub session_id: Uuid,
    pub book_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug)]
pub struct UpdateSessionItemDto {
    pub session_id: Uuid,
    pub book_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug)]
pub struct RemoveSessionItemDto {
    pub session_id: Uuid,
    pub book_id: Uuid,
}

#[derive(Debug)]
pub struct GetSessionCartDto {
    pub session_id: Uuid,
}

#[derive(Debug)]
pub struct MigrateCartDto {
    pub session_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct MigratedCartDto {
    pub migrated: i32,
    pub item_count: i32,
}
