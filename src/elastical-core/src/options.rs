//! Per-operation options
//!
//! Each struct lists the keys one call accepts. Unset fields are left out of
//! the request; which fields land in the path, the query string or the body is
//! decided in [`crate::operations`].

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::request::Names;

/// Search query: free text or a full query DSL object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Query {
    /// Wrapped into a `query_string` query
    Text(String),
    Dsl(Value),
}

impl Query {
    pub fn to_value(&self) -> Value {
        match self {
            Query::Text(text) => json!({ "query_string": { "query": text } }),
            Query::Dsl(dsl) => dsl.clone(),
        }
    }
}

impl From<&str> for Query {
    fn from(text: &str) -> Self {
        Query::Text(text.to_string())
    }
}

impl From<String> for Query {
    fn from(text: String) -> Self {
        Query::Text(text)
    }
}

impl From<Value> for Query {
    fn from(dsl: Value) -> Self {
        match dsl {
            Value::String(text) => Query::Text(text),
            other => Query::Dsl(other),
        }
    }
}

/// Options for creating an index; both go in the body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateIndexOptions {
    pub settings: Option<Value>,
    pub mappings: Option<Value>,
}

/// Options for deleting a document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteOptions {
    pub consistency: Option<String>,
    /// Treat a 404 as a successful delete of nothing
    #[serde(default)]
    pub ignore_missing: bool,
    pub parent: Option<String>,
    pub refresh: Option<bool>,
    pub replication: Option<String>,
    pub routing: Option<String>,
    pub version: Option<u64>,
}

/// Options for fetching a document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetOptions {
    /// Document type; `_all` when unset
    #[serde(rename = "type")]
    pub doc_type: Option<String>,
    pub fields: Option<Names>,
    pub preference: Option<String>,
    pub realtime: Option<bool>,
    pub refresh: Option<bool>,
    pub routing: Option<String>,
}

/// Options for indexing a document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexOptions {
    /// Document id; switches the call from POST to PUT
    pub id: Option<String>,
    pub consistency: Option<String>,
    /// Fail if the document already exists (`op_type=create`)
    #[serde(default)]
    pub create: bool,
    pub parent: Option<String>,
    pub percolate: Option<String>,
    pub refresh: Option<bool>,
    pub replication: Option<String>,
    pub routing: Option<String>,
    pub timeout: Option<String>,
    pub version: Option<u64>,
    /// Defaults to `external` when `version` is set
    pub version_type: Option<String>,
}

/// Options for a search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    pub index: Option<Names>,
    #[serde(rename = "type")]
    pub doc_type: Option<Names>,

    // query string
    pub preference: Option<String>,
    pub routing: Option<String>,
    pub scroll: Option<String>,
    pub scroll_id: Option<String>,
    pub search_type: Option<String>,
    pub timeout: Option<String>,

    // body
    pub query: Option<Query>,
    pub explain: Option<bool>,
    pub facets: Option<Value>,
    pub fields: Option<Names>,
    pub filter: Option<Value>,
    pub from: Option<u64>,
    pub highlight: Option<Value>,
    pub indices_boost: Option<Value>,
    pub min_score: Option<f64>,
    pub script_fields: Option<Value>,
    pub size: Option<u64>,
    pub sort: Option<Value>,
    pub track_scores: Option<bool>,
    pub version: Option<bool>,
}

impl SearchOptions {
    pub fn query(query: impl Into<Query>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }
}

/// Options for counting matching documents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountOptions {
    pub index: Option<Names>,
    #[serde(rename = "type")]
    pub doc_type: Option<Names>,
    pub query: Option<Query>,
    pub routing: Option<String>,
    pub min_score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PutMappingOptions {
    pub ignore_conflicts: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetMappingOptions {
    pub index: Option<Names>,
    #[serde(rename = "type")]
    pub doc_type: Option<Names>,
}
