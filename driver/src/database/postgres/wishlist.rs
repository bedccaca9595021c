use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::{DependOnWishlistQuery, WishlistQuery};
use kernel::interface::update::{DependOnWishlistModifier, WishlistModifier};
use kernel::prelude::entity::{BookId, CreatedAt, UserId, WishlistItem};
use kernel::KernelError;

use crate::database::postgres::{PgTransaction, PostgresDatabase};
use crate::error::ConvertError;

pub struct PostgresWishlistRepository;

#[async_trait::async_trait]
impl WishlistQuery for PostgresWishlistRepository {
    type Transaction = PgTransaction;

    async fn find_by_user(
        &self,
        con: &mut PgTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<WishlistItem>, KernelError> {
        PgWishlistInternal::find_by_user(con, user_id).await
    }

    async fn contains(
        &self,
        con: &mut PgTransaction,
        user_id: &UserId,
        book_id: &BookId,
    ) -> error_stack::Result<bool, KernelError> {
        PgWishlistInternal::contains(con, user_id, book_id).await
    }
}

#[async_trait::async_trait]
impl WishlistModifier for PostgresWishlistRepository {
    type Transaction = PgTransaction;

    async fn add(
        &self,
        con: &mut PgTransaction,
        item: &WishlistItem,
    ) -> error_stack::Result<(), KernelError> {
        PgWishlistInternal::add(con, item).await
    }

    async fn remove(
        &self,
        con: &mut PgTransaction,
        user_id: &UserId,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        PgWishlistInternal::remove(con, user_id, book_id).await
    }
}

impl DependOnWishlistQuery for PostgresDatabase {
    type WishlistQuery = PostgresWishlistRepository;
    fn wishlist_query(&self) -> &Self::WishlistQuery {
        &PostgresWishlistRepository
    }
}

impl DependOnWishlistModifier for PostgresDatabase {
    type WishlistModifier = PostgresWishlistRepository;
    fn wishlist_modifier(&self) -> &Self::WishlistModifier {
        &PostgresWishlistRepository
    }
}

#[derive(sqlx::FromRow)]
struct WishlistItemRow {
    user_id: Uuid,
    book_id: Uuid,
    added_at: OffsetDateTime,
}

impl From<WishlistItemRow> for WishlistItem {
    fn from(value: WishlistItemRow) -> Self {
        WishlistItem::new(
            UserId::new(value.user_id),
            BookId::new(value.book_id),
            CreatedAt::new(value.added_at),
        )
    }
}

pub(in crate::database) struct PgWishlistInternal;

impl PgWishlistInternal {
    async fn find_by_user(
        con: &mut PgConnection,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<WishlistItem>, KernelError> {
        let rows = sqlx::query_as::<_, WishlistItemRow>(
            // language=postgresql
            r#"
            SELECT user_id, book_id, added_at
            FROM wishlist_items
            WHERE user_id = $1
            ORDER BY added_at DESC
            "#,
        )
        .bind(user_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(WishlistItem::from).collect())
    }

    async fn contains(
        con: &mut PgConnection,
        user_id: &UserId,
        book_id: &BookId,
    ) -> error_stack::Result<bool, KernelError> {
        let found = sqlx::query_scalar::<_, bool>(
            // language=postgresql
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM wishlist_items
                WHERE user_id = $1 AND book_id = $2
            )
            "#,
        )
        .bind(user_id.as_ref())
        .bind(book_id.as_ref())
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(found)
    }

    async fn add(
        con: &mut PgConnection,
        item: &WishlistItem,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO wishlist_items (user_id, book_id, added_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, book_id) DO NOTHING
            "#,
        )
        .bind(item.user_id().as_ref())
        .bind(item.book_id().as_ref())
        .bind(item.added_at().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn remove(
        con: &mut PgConnection,
        user_id: &UserId,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            DELETE FROM wishlist_items
            WHERE user_id = $1 AND book_id = $2
            "#,
        )
        .bind(user_id.as_ref())
        .bind(book_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}
