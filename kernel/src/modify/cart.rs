use time::OffsetDateTime;

use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{BookId, Quantity, UserId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait CartModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    /// Atomically increments the `(user, book)` line by `quantity`, creating
    /// it when absent, and returns the resulting total. The increment must be
    /// a single compare-free store-side operation so that two concurrent adds
    /// both land; callers validate the returned total and roll the
    /// transaction back when it breaks policy.
    async fn add_quantity(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
        book_id: &BookId,
        quantity: &Quantity,
        at: OffsetDateTime,
    ) -> error_stack::Result<Quantity, KernelError>;
    /// Sets the absolute quantity of an existing line. `None` when the line
    /// does not exist.
    async fn set_quantity(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
        book_id: &BookId,
        quantity: &Quantity,
        at: OffsetDateTime,
    ) -> error_stack::Result<Option<Quantity>, KernelError>;
    /// Idempotent.
    async fn delete(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError>;
    /// Idempotent.
    async fn clear(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnCartModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type CartModifier: CartModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn cart_modifier(&self) -> &Self::CartModifier;
}
