//! Rate limiter adapters - implementation of the RateLimiter port.

mod in_memory;

pub use in_memory::{InMemoryRateLimiter, RateLimitConfig};
