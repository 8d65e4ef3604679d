//! Elastical Client Library
//!
//! Async HTTP client for a search server's REST API: index management,
//! document indexing, retrieval, deletion and search.
//!
//! ```rust,no_run
//! use elastical_rs::{Client, SearchOptions};
//!
//! #[tokio::main]
//! async fn main() -> elastical_rs::Result<()> {
//!     let client = Client::new();
//!     let blog = client.get_index("blog");
//!     let results = blog.search(&SearchOptions::query("hello")).await?;
//!     println!("{} hits", results.result.total);
//!     Ok(())
//! }
//! ```

mod client;
mod index;
mod transport;

pub use client::Client;
pub use index::Index;
pub use transport::{ApiResponse, HttpTransport, RawResponse, Transport};

pub use elastical_core::{
    Acknowledged, ClientConfig, CountOptions, CountResult, CreateIndexOptions, DeleteOptions,
    DeleteResult, GetMappingOptions, GetOptions, GetResult, Hit, IndexOptions, IndexResult, Names,
    PutMappingOptions, Query, RequestError, SearchOptions, SearchResults,
};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Server error: {status} - {body}")]
    Server { status: u16, body: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] RequestError),

    #[error("Index handle outlived its client")]
    Detached,
}

pub type Result<T> = std::result::Result<T, ClientError>;
