use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{BookId, CartItem, UserId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait CartQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_user(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<CartItem>, KernelError>;
    async fn find_item(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
        book_id: &BookId,
    ) -> error_stack::Result<Option<CartItem>, KernelError>;
    /// Sum of quantities across the user's cart; the cheap badge query.
    async fn count(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
    ) -> error_stack::Result<i32, KernelError>;
}

pub trait DependOnCartQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type CartQuery: CartQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn cart_query(&self) -> &Self::CartQuery;
}
