// Cache module for local filesystem caching.
// Durable per-key JSON store plus the in-memory session memo above it.

pub mod memo;
pub mod paths;
pub mod store;

pub use memo::{MemoScope, SessionMemo};
pub use paths::{CacheKey, default_cache_dir, log_dir};
pub use store::{CacheEntry, CacheLookup, CacheStore, DEFAULT_TTL, LOGIN_TTL};
