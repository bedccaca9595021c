use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{BookId, UserId, WishlistItem};
use crate::KernelError;

#[async_trait::async_trait]
pub trait WishlistQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_user(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<WishlistItem>, KernelError>;
    async fn contains(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
        book_id: &BookId,
    ) -> error_stack::Result<bool, KernelError>;
}

pub trait DependOnWishlistQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type WishlistQuery: WishlistQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn wishlist_query(&self) -> &Self::WishlistQuery;
}
