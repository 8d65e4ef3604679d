use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Hit represents one matching document in a search response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_type", default)]
    pub doc_type: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    #[serde(rename = "_version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    #[serde(rename = "_source", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<Value>>,
}

/// The `hits` section of a search response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hits {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub max_score: Option<f64>,
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// SearchResponse mirrors the server's search reply
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub took: u64,
    #[serde(default)]
    pub timed_out: bool,
    #[serde(rename = "_scroll_id", default, skip_serializing_if = "Option::is_none")]
    pub scroll_id: Option<String>,
    #[serde(default)]
    pub hits: Hits,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facets: Option<Value>,
}

/// SearchResults is what a search hands back to callers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub total: u64,
    pub max_score: Option<f64>,
    pub hits: Vec<Hit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facets: Option<Value>,
}

impl From<SearchResponse> for SearchResults {
    fn from(response: SearchResponse) -> Self {
        Self {
            total: response.hits.total,
            max_score: response.hits.max_score,
            hits: response.hits.hits,
            scroll_id: response.scroll_id,
            facets: response.facets,
        }
    }
}

/// GetResult represents a fetched document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetResult {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_type", default)]
    pub doc_type: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_version", default)]
    pub version: Option<u64>,
    /// `exists` on older servers, `found` on newer ones
    #[serde(alias = "found", default = "default_true")]
    pub exists: bool,
    #[serde(rename = "_source", default)]
    pub source: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Value>,
}

fn default_true() -> bool {
    true
}

/// IndexResult is the reply to indexing a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexResult {
    #[serde(default)]
    pub ok: bool,
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_type", default)]
    pub doc_type: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_version", default)]
    pub version: Option<u64>,
}

/// DeleteResult is the reply to deleting a document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteResult {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub found: bool,
    #[serde(rename = "_index", default)]
    pub index: String,
    #[serde(rename = "_type", default)]
    pub doc_type: String,
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(rename = "_version", default)]
    pub version: Option<u64>,
}

/// Reply to index-level calls (create, delete, refresh, mapping)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Acknowledged {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub acknowledged: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountResult {
    #[serde(default)]
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_response_into_results() {
        let response: SearchResponse = serde_json::from_value(json!({
            "took": 3,
            "timed_out": false,
            "_shards": { "total": 5, "successful": 5, "failed": 0 },
            "hits": {
                "total": 1,
                "max_score": 0.30685282,
                "hits": [{
                    "_index": "blog",
                    "_type": "post",
                    "_id": "1",
                    "_score": 0.30685282,
                    "_source": { "title": "Hello" }
                }]
            }
        }))
        .unwrap();

        let results = SearchResults::from(response);
        assert_eq!(results.total, 1);
        assert_eq!(results.hits.len(), 1);
        assert_eq!(results.hits[0].id, "1");
        assert_eq!(results.hits[0].doc_type, "post");
        assert_eq!(results.hits[0].source, Some(json!({ "title": "Hello" })));
        assert_eq!(results.scroll_id, None);
    }

    #[test]
    fn test_get_result_accepts_found() {
        let result: GetResult = serde_json::from_value(json!({
            "_index": "blog",
            "_type": "post",
            "_id": "1",
            "_version": 2,
            "found": false
        }))
        .unwrap();
        assert!(!result.exists);
        assert_eq!(result.version, Some(2));
        assert_eq!(result.source, None);
    }
}
