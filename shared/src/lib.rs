//! Shared types for the Depot record manager
//!
//! Home of the unified error system used by the server and any future
//! client crates, plus a couple of small cross-cutting utilities.

pub mod error;
pub mod util;

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
