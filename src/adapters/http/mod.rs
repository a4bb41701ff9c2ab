//! HTTP adapters - the axum REST surface.
//!
//! Each resource keeps the dto/handlers/routes split; `router` assembles
//! them into the full API with the tower-http middleware stack.

pub mod coach;
pub mod error;
pub mod health;
pub mod upload;

mod router;
mod state;

pub use error::ErrorResponse;
pub use router::api_router;
pub use state::AppState;
