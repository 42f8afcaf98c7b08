pub mod memberships;
pub mod memory;
pub mod postgres;
pub mod redis;

pub use memberships::{MembershipStore, PgMembershipStore};
pub use memory::InMemoryMembershipStore;
pub use postgres::{create_pool, run_migrations};
pub use redis::create_redis_client;
pub use redis::Cache;
pub use redis::CacheKey;
