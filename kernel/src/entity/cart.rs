mod owner;
mod quantity;
mod totals;

pub use self::{owner::*, quantity::*, totals::*};
use crate::entity::common::{CreatedAt, UpdatedAt};
use crate::entity::{BookId, UserId};
use destructure::Destructure;
use vodca::References;

/// One persistent cart line. `(user_id, book_id)` is unique per cart; the
/// row survives across sessions and is mutated only while authenticated.
#[derive(Debug, Clone, PartialEq, References, Destructure)]
pub struct CartItem {
    user_id: UserId,
    book_id: BookId,
    quantity: Quantity,
    created_at: CreatedAt<CartItem>,
    updated_at: UpdatedAt<CartItem>,
}

impl CartItem {
    pub fn new(
        user_id: UserId,
        book_id: BookId,
        quantity: Quantity,
        created_at: CreatedAt<CartItem>,
        updated_at: UpdatedAt<CartItem>,
    ) -> Self {
        Self {
            user_id,
            book_id,
            quantity,
            created_at,
            updated_at,
        }
    }
}
