use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Book, BookId, CategoryId, SelectLimit, SelectOffset};
use crate::KernelError;

/// Catalog listing filter. `keyword` matches title or author substrings.
#[derive(Debug, Clone, Default)]
pub struct BookListing {
    pub keyword: Option<String>,
    pub category_id: Option<CategoryId>,
    pub limit: SelectLimit,
    pub offset: SelectOffset,
}

#[async_trait::async_trait]
pub trait BookQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError>;
    async fn find_active(
        &self,
        con: &mut Self::Transaction,
        listing: &BookListing,
    ) -> error_stack::Result<Vec<Book>, KernelError>;
}

pub trait DependOnBookQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type BookQuery: BookQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn book_query(&self) -> &Self::BookQuery;
}
