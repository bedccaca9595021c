use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Book, BookId, Quantity};
use crate::KernelError;

#[async_trait::async_trait]
pub trait BookModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError>;
    async fn update(
        &self,
        con: &mut Self::Transaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError>;
    async fn delete(
        &self,
        con: &mut Self::Transaction,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError>;
    /// Conditionally takes `quantity` units of stock. Returns `false` and
    /// changes nothing when fewer units remain; the check and the decrement
    /// are one statement, so concurrent checkouts cannot oversell.
    async fn reserve_stock(
        &self,
        con: &mut Self::Transaction,
        book_id: &BookId,
        quantity: &Quantity,
    ) -> error_stack::Result<bool, KernelError>;
    /// Gives units back, e.g. on cancellation.
    async fn restore_stock(
        &self,
        con: &mut Self::Transaction,
        book_id: &BookId,
        quantity: &Quantity,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnBookModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type BookModifier: BookModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn book_modifier(&self) -> &Self::BookModifier;
}
