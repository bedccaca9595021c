use std::ops::Deref;
use std::sync::Arc;

use driver::database::{
    PostgresBookRepository, PostgresCartRepository, PostgresCategoryRepository, PostgresDatabase,
    PostgresOrderRepository, PostgresWishlistRepository, RedisDatabase,
    RedisSessionCartRepository, DEFAULT_SESSION_CART_TTL_SECONDS,
};
use kernel::interface::database::{DependOnDatabaseConnection, DependOnSessionDatabaseConnection};
use kernel::interface::query::{
    DependOnBookQuery, DependOnCartQuery, DependOnCategoryQuery, DependOnOrderQuery,
    DependOnSessionCartQuery, DependOnWishlistQuery,
};
use kernel::interface::update::{
    DependOnBookModifier, DependOnCartModifier, DependOnOrderModifier,
    DependOnSessionCartModifier, DependOnWishlistModifier,
};
use kernel::KernelError;
use vodca::References;

static SESSION_CART_TTL_SECONDS: &str = "SESSION_CART_TTL_SECONDS";

#[derive(Clone)]
pub struct AppModule(Arc<Handler>);

impl AppModule {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        Ok(Self(Arc::new(Handler::init().await?)))
    }
}

impl Deref for AppModule {
    type Target = Handler;
    fn deref(&self) -> &Self::Target {
        Deref::deref(&self.0)
    }
}

#[derive(References)]
pub struct Handler {
    postgres: PostgresDatabase,
    redis: RedisDatabase,
    session_carts: RedisSessionCartRepository,
}

impl Handler {
    pub async fn init() -> error_stack::Result<Self, KernelError> {
        let postgres = PostgresDatabase::new().await?;
        postgres.migrate().await?;
        let redis = RedisDatabase::new()?;
        let ttl_seconds = dotenvy::var(SESSION_CART_TTL_SECONDS)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_SESSION_CART_TTL_SECONDS);

        Ok(Self {
            postgres,
            redis,
            session_carts: RedisSessionCartRepository::new(ttl_seconds),
        })
    }
}

impl DependOnDatabaseConnection for Handler {
    type DatabaseConnection = PostgresDatabase;
    fn database_connection(&self) -> &Self::DatabaseConnection {
        &self.postgres
    }
}

impl DependOnSessionDatabaseConnection for Handler {
    type SessionDatabaseConnection = RedisDatabase;
    fn session_database_connection(&self) -> &Self::SessionDatabaseConnection {
        &self.redis
    }
}

impl DependOnBookQuery for Handler {
    type BookQuery = PostgresBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &PostgresBookRepository
    }
}

impl DependOnBookModifier for Handler {
    type BookModifier = PostgresBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &PostgresBookRepository
    }
}

impl DependOnCategoryQuery for Handler {
    type CategoryQuery = PostgresCategoryRepository;
    fn category_query(&self) -> &Self::CategoryQuery {
        &PostgresCategoryRepository
    }
}

impl DependOnCartQuery for Handler {
    type CartQuery = PostgresCartRepository;
    fn cart_query(&self) -> &Self::CartQuery {
        &PostgresCartRepository
    }
}

impl DependOnCartModifier for Handler {
    type CartModifier = PostgresCartRepository;
    fn cart_modifier(&self) -> &Self::CartModifier {
        &PostgresCartRepository
    }
}

impl DependOnOrderQuery for Handler {
    type OrderQuery = PostgresOrderRepository;
    fn order_query(&self) -> &Self::OrderQuery {
        &PostgresOrderRepository
    }
}

impl DependOnOrderModifier for Handler {
    type OrderModifier = PostgresOrderRepository;
    fn order_modifier(&self) -> &Self::OrderModifier {
        &PostgresOrderRepository
    }
}

impl DependOnWishlistQuery for Handler {
    type WishlistQuery = PostgresWishlistRepository;
    fn wishlist_query(&self) -> &Self::WishlistQuery {
        &PostgresWishlistRepository
    }
}

impl DependOnWishlistModifier for Handler {
    type WishlistModifier = PostgresWishlistRepository;
    fn wishlist_modifier(&self) -> &Self::WishlistModifier {
        &PostgresWishlistRepository
    }
}

impl DependOnSessionCartQuery for Handler {
    type SessionCartQuery = RedisSessionCartRepository;
    fn session_cart_query(&self) -> &Self::SessionCartQuery {
        &self.session_carts
    }
}

impl DependOnSessionCartModifier for Handler {
    type SessionCartModifier = RedisSessionCartRepository;
    fn session_cart_modifier(&self) -> &Self::SessionCartModifier {
        &self.session_carts
    }
}
