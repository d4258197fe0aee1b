//! Error handling for the Vigil API server.

pub mod response;
pub mod types;

pub use types::{ApiError, ApiResult};
