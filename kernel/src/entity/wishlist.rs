use crate::entity::common::CreatedAt;
use crate::entity::{BookId, UserId};
use destructure::Destructure;
use vodca::References;

/// Membership of a book in a user's wishlist. `(user_id, book_id)` is
/// unique; plays no part in pricing.
#[derive(Debug, Clone, PartialEq, References, Destructure)]
pub struct WishlistItem {
    user_id: UserId,
    book_id: BookId,
    added_at: CreatedAt<WishlistItem>,
}

impl WishlistItem {
    pub fn new(user_id: UserId, book_id: BookId, added_at: CreatedAt<WishlistItem>) -> Self {
        Self {
            user_id,
            book_id,
            added_at,
        }
    }
}
