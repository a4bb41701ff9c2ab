//! Adapters - implementations of the ports against real infrastructure.

pub mod ai;
pub mod extraction;
pub mod http;
pub mod pdf;
pub mod rate_limiter;
pub mod sqlite;
