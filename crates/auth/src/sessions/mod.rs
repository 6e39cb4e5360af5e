//! Session storage implementations.
//!
//! Provides `SessionRepository` implementations for:
//! - In-memory (always available; development and tests)
//! - Redis (with the `redis` feature, via `fred`)

mod inmemory;
#[cfg(feature = "redis")]
mod redis_impl;

pub use inmemory::InMemorySessionStore;
#[cfg(feature = "redis")]
pub use redis_impl::RedisSessionStore;
