use sqlx::PgConnection;
use uuid::Uuid;

use kernel::interface::query::{CategoryQuery, DependOnCategoryQuery};
use kernel::prelude::entity::{Category, CategoryId, CategoryName};
use kernel::KernelError;

use crate::database::postgres::{PgTransaction, PostgresDatabase};
use crate::error::ConvertError;

pub struct PostgresCategoryRepository;

#[async_trait::async_trait]
impl CategoryQuery for PostgresCategoryRepository {
    type Transaction = PgTransaction;

    async fn find_all(
        &self,
        con: &mut PgTransaction,
    ) -> error_stack::Result<Vec<Category>, KernelError> {
        PgCategoryInternal::find_all(con).await
    }
}

impl DependOnCategoryQuery for PostgresDatabase {
    type CategoryQuery = PostgresCategoryRepository;
    fn category_query(&self) -> &Self::CategoryQuery {
        &PostgresCategoryRepository
    }
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: Uuid,
    name: String,
}

impl From<CategoryRow> for Category {
    fn from(value: CategoryRow) -> Self {
        Category::new(CategoryId::new(value.id), CategoryName::new(value.name))
    }
}

pub(in crate::database) struct PgCategoryInternal;

impl PgCategoryInternal {
    async fn find_all(con: &mut PgConnection) -> error_stack::Result<Vec<Category>, KernelError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            // language=postgresql
            r#"
            SELECT id, name
            FROM categories
            ORDER BY name
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Category::from).collect())
    }
}
