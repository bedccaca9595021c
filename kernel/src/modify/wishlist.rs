use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{BookId, UserId, WishlistItem};
use crate::KernelError;

#[async_trait::async_trait]
pub trait WishlistModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    /// Idempotent membership insert.
    async fn add(
        &self,
        con: &mut Self::Transaction,
        item: &WishlistItem,
    ) -> error_stack::Result<(), KernelError>;
    /// Idempotent.
    async fn remove(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnWishlistModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type WishlistModifier: WishlistModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn wishlist_modifier(&self) -> &Self::WishlistModifier;
}
