//! Data model shared between the mibscope pipeline and its consumers.

pub mod error;
pub mod models;

pub use error::{ApiError, ApiResult};
pub use models::*;
