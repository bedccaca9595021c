use crate::database::{DatabaseConnection, DependOnSessionDatabaseConnection, Transaction};
use crate::entity::{SessionCart, SessionId};
use crate::KernelError;

/// Read side of the session-scoped cart store. Reads refresh the idle
/// expiry, so a browsing session keeps its cart alive.
#[async_trait::async_trait]
pub trait SessionCartQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find(
        &self,
        con: &mut Self::Transaction,
        session_id: &SessionId,
    ) -> error_stack::Result<Option<SessionCart>, KernelError>;
}

pub trait DependOnSessionCartQuery:
    'static + Sync + Send + DependOnSessionDatabaseConnection
{
    type SessionCartQuery: SessionCartQuery<
        Transaction = <Self::SessionDatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn session_cart_query(&self) -> &Self::SessionCartQuery;
}
