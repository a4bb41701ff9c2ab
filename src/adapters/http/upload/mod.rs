//! Report upload endpoint.

mod dto;
mod handlers;
mod routes;

pub use dto::UploadResponse;
pub use routes::routes;
