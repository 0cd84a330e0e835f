pub mod hashmap_code_store;
pub mod hashmap_user_store;
pub mod redis_code_store;

pub use hashmap_code_store::HashMapCodeStore;
pub use hashmap_user_store::HashMapUserStore;
pub use redis_code_store::{RedisCodeStore, get_redis_client};
