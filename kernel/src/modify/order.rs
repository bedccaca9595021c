use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Order, OrderId, OrderItem, OrderStatus};
use crate::KernelError;

#[async_trait::async_trait]
pub trait OrderModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    /// Persists the order header and all of its lines. Runs inside the
    /// checkout transaction; items are never written without their header.
    async fn create(
        &self,
        con: &mut Self::Transaction,
        order: &Order,
        items: &[OrderItem],
    ) -> error_stack::Result<(), KernelError>;
    async fn update_status(
        &self,
        con: &mut Self::Transaction,
        id: &OrderId,
        status: OrderStatus,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnOrderModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type OrderModifier: OrderModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn order_modifier(&self) -> &Self::OrderModifier;
}
