use crate::database::{DatabaseConnection, DependOnSessionDatabaseConnection, Transaction};
use crate::entity::{SessionCart, SessionId};
use crate::KernelError;

/// Write side of the session-scoped cart store. Every save re-arms the idle
/// expiry timer.
#[async_trait::async_trait]
pub trait SessionCartModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn save(
        &self,
        con: &mut Self::Transaction,
        session_id: &SessionId,
        cart: &SessionCart,
    ) -> error_stack::Result<(), KernelError>;
    /// Idempotent.
    async fn clear(
        &self,
        con: &mut Self::Transaction,
        session_id: &SessionId,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnSessionCartModifier:
    'static + Sync + Send + DependOnSessionDatabaseConnection
{
    type SessionCartModifier: SessionCartModifier<
        Transaction = <Self::SessionDatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn session_cart_modifier(&self) -> &Self::SessionCartModifier;
}
