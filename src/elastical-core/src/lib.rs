//! Elastical Core Library
//!
//! This crate provides the I/O-free half of the elastical client:
//! - Connection configuration
//! - Per-operation option types
//! - The request builder and the request mapping of every server operation
//! - Response models

pub mod config;
pub mod error;
pub mod models;
pub mod operations;
pub mod options;
pub mod request;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::RequestError;
pub use models::*;
pub use options::*;
pub use request::{Method, Names, Request, RequestBuilder};
