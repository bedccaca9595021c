mod id;

pub use self::id::*;
use crate::entity::{BookId, CreatedAt, Quantity};
use serde::{Deserialize, Serialize};
use vodca::References;

/// Cart of an anonymous browsing session, held as one serializable document
/// in the session store. Only identities and quantities are stored; prices
/// always come from the live catalog at read time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionCart {
    items: Vec<SessionCartItem>,
}

impl SessionCart {
    pub fn items(&self) -> &[SessionCartItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<SessionCartItem> {
        self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item_count(&self) -> i32 {
        self.items.iter().map(|item| *item.quantity().as_ref()).sum()
    }

    pub fn quantity_of(&self, book_id: &BookId) -> i32 {
        self.items
            .iter()
            .find(|item| item.book_id() == book_id)
            .map(|item| *item.quantity().as_ref())
            .unwrap_or(0)
    }

    /// Insert or overwrite the line for `book_id` with an absolute quantity.
    pub fn put(&mut self, book_id: BookId, quantity: Quantity, added_at: CreatedAt<SessionCartItem>) {
        match self.items.iter_mut().find(|item| item.book_id == book_id) {
            Some(item) => item.quantity = quantity,
            None => self.items.push(SessionCartItem {
                book_id,
                quantity,
                added_at,
            }),
        }
    }

    pub fn remove(&mut self, book_id: &BookId) {
        self.items.retain(|item| &item.book_id != book_id);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, References)]
pub struct SessionCartItem {
    book_id: BookId,
    quantity: Quantity,
    added_at: CreatedAt<SessionCartItem>,
}

impl SessionCartItem {
    pub fn new(
        book_id: BookId,
        quantity: Quantity,
        added_at: CreatedAt<SessionCartItem>,
    ) -> Self {
        Self {
            book_id,
            quantity,
            added_at,
        }
    }
}
