pub mod graph;
pub mod memory;
pub mod postgres;
pub mod redis;

pub use graph::GraphStore;
pub use memory::InMemoryGraph;
pub use postgres::{create_pool, run_migrations, PgGraphStore};
pub use self::redis::create_redis_client;
pub use self::redis::Cache;
pub use self::redis::CacheKey;
