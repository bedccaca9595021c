use deadpool_redis::redis::AsyncCommands;
use deadpool_redis::Connection;
use error_stack::Report;

use kernel::interface::query::SessionCartQuery;
use kernel::interface::update::SessionCartModifier;
use kernel::prelude::entity::{SessionCart, SessionId};
use kernel::KernelError;

use crate::database::redis::RedisTransaction;
use crate::error::ConvertError;

/// Seven days, matching the browsing-session idle timeout.
pub const DEFAULT_SESSION_CART_TTL_SECONDS: usize = 7 * 24 * 60 * 60;

/// Stores each session's cart as one JSON document under a TTL key. Reads
/// and writes both re-arm the TTL, so the expiry is an idle timeout rather
/// than an absolute one.
pub struct RedisSessionCartRepository {
    ttl_seconds: usize,
}

impl RedisSessionCartRepository {
    pub fn new(ttl_seconds: usize) -> Self {
        Self { ttl_seconds }
    }
}

impl Default for RedisSessionCartRepository {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_CART_TTL_SECONDS)
    }
}

fn cart_key(session_id: &SessionId) -> String {
    format!("session_cart:{}", session_id.as_ref())
}

#[async_trait::async_trait]
impl SessionCartQuery for RedisSessionCartRepository {
    type Transaction = RedisTransaction;

    async fn find(
        &self,
        con: &mut RedisTransaction,
        session_id: &SessionId,
    ) -> error_stack::Result<Option<SessionCart>, KernelError> {
        RedisSessionCartInternal::find(con, session_id, self.ttl_seconds).await
    }
}

#[async_trait::async_trait]
impl SessionCartModifier for RedisSessionCartRepository {
    type Transaction = RedisTransaction;

    async fn save(
        &self,
        con: &mut RedisTransaction,
        session_id: &SessionId,
        cart: &SessionCart,
    ) -> error_stack::Result<(), KernelError> {
        RedisSessionCartInternal::save(con, session_id, cart, self.ttl_seconds).await
    }

    async fn clear(
        &self,
        con: &mut RedisTransaction,
        session_id: &SessionId,
    ) -> error_stack::Result<(), KernelError> {
        RedisSessionCartInternal::clear(con, session_id).await
    }
}

struct RedisSessionCartInternal;

impl RedisSessionCartInternal {
    async fn find(
        con: &mut Connection,
        session_id: &SessionId,
        ttl_seconds: usize,
    ) -> error_stack::Result<Option<SessionCart>, KernelError> {
        let key = cart_key(session_id);
        let raw: Option<String> = con.get(&key).await.convert_error()?;
        match raw {
            None => Ok(None),
            Some(raw) => {
                let cart = serde_json::from_str::<SessionCart>(&raw)
                    .map_err(|error| Report::new(error).change_context(KernelError::Internal))?;
                let _: i32 = con.expire(&key, ttl_seconds as i64).await.convert_error()?;
                Ok(Some(cart))
            }
        }
    }

    async fn save(
        con: &mut Connection,
        session_id: &SessionId,
        cart: &SessionCart,
        ttl_seconds: usize,
    ) -> error_stack::Result<(), KernelError> {
        let raw = serde_json::to_string(cart)
            .map_err(|error| Report::new(error).change_context(KernelError::Internal))?;
        let _: () = con
            .set_ex(cart_key(session_id), raw, ttl_seconds as u64)
            .await
            .convert_error()?;
        Ok(())
    }

    async fn clear(
        con: &mut Connection,
        session_id: &SessionId,
    ) -> error_stack::Result<(), KernelError> {
        let _: i32 = con.del(cart_key(session_id)).await.convert_error()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use time::OffsetDateTime;
    use uuid::Uuid;

    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::SessionCartQuery;
    use kernel::interface::update::SessionCartModifier;
    use kernel::prelude::entity::{BookId, CreatedAt, Quantity, SessionCart, SessionId};
    use kernel::KernelError;

    use crate::database::redis::RedisDatabase;

    use super::RedisSessionCartRepository;

    #[test_with::env(REDIS_TEST)]
    #[tokio::test]
    async fn test() -> Result<(), error_stack::Report<KernelError>> {
        let db = RedisDatabase::new()?;
        let mut con = db.transact().await?;
        let repository = RedisSessionCartRepository::default();

        let session_id = SessionId::new(Uuid::new_v4());
        let found = repository.find(&mut con, &session_id).await?;
        assert!(found.is_none());

        let mut cart = SessionCart::default();
        cart.put(
            BookId::new(Uuid::new_v4()),
            Quantity::new(2),
            CreatedAt::new(OffsetDateTime::now_utc()),
        );
        repository.save(&mut con, &session_id, &cart).await?;

        let found = repository.find(&mut con, &session_id).await?;
        assert_eq!(found, Some(cart));

        repository.clear(&mut con, &session_id).await?;
        let found = repository.find(&mut con, &session_id).await?;
        assert!(found.is_none());

        Ok(())
    }
}
