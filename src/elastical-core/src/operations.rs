//! Request mappings for every server operation.
//!
//! Each function validates its required arguments and returns the fully
//! built [`Request`]. No I/O happens here.

use serde_json::Value;

use crate::error::Result;
use crate::options::{
    CountOptions, CreateIndexOptions, DeleteOptions, GetMappingOptions, GetOptions, IndexOptions,
    PutMappingOptions, Query, SearchOptions,
};
use crate::request::{Method, Names, Request, RequestBuilder};

/// Index placeholder used when only a type is given
pub const ALL: &str = "_all";

fn names_value(names: &Names) -> Value {
    names
        .as_slice()
        .iter()
        .filter(|name| !name.is_empty())
        .map(|name| Value::from(name.as_str()))
        .collect()
}

fn non_empty(names: Option<&Names>) -> Option<&Names> {
    names.filter(|names| !names.is_empty())
}

/// `/{index}/{type}` prefix shared by search, count and mapping lookups
fn scoped(builder: RequestBuilder, index: Option<&Names>, doc_type: Option<&Names>) -> RequestBuilder {
    match (non_empty(index), non_empty(doc_type)) {
        (Some(index), Some(doc_type)) => builder.segment(index.clone()).segment(doc_type.clone()),
        (Some(index), None) => builder.segment(index.clone()),
        (None, Some(doc_type)) => builder.segment(ALL).segment(doc_type.clone()),
        (None, None) => builder,
    }
}

/// PUT /{index}
pub fn create_index(base_url: &str, index: &str, options: &CreateIndexOptions) -> Result<Request> {
    RequestBuilder::new(Method::Put)
        .required_segment("index", index)?
        .maybe_body_field("settings", options.settings.clone())
        .maybe_body_field("mappings", options.mappings.clone())
        .build(base_url)
}

/// DELETE /{indices}
pub fn delete_index(base_url: &str, indices: impl Into<Names>) -> Result<Request> {
    RequestBuilder::new(Method::Delete)
        .required_segment("index", indices)?
        .build(base_url)
}

/// HEAD /{indices}
pub fn index_exists(base_url: &str, indices: impl Into<Names>) -> Result<Request> {
    RequestBuilder::new(Method::Head)
        .required_segment("index", indices)?
        .build(base_url)
}

/// POST /{index}/{type}, or PUT /{index}/{type}/{id} when an id is given
pub fn index(
    base_url: &str,
    index: &str,
    doc_type: &str,
    document: Value,
    options: &IndexOptions,
) -> Result<Request> {
    let mut builder = RequestBuilder::new(Method::Post)
        .required_segment("index", index)?
        .required_segment("type", doc_type)?;

    if let Some(id) = options.id.as_deref().filter(|id| !id.is_empty()) {
        builder = builder.method(Method::Put).segment(id);
    }

    let version_type = options
        .version_type
        .as_deref()
        .or(options.version.map(|_| "external"));

    builder
        .maybe_param("consistency", options.consistency.as_deref())
        .maybe_param("op_type", options.create.then_some("create"))
        .maybe_param("parent", options.parent.as_deref())
        .maybe_param("percolate", options.percolate.as_deref())
        .maybe_param("refresh", options.refresh)
        .maybe_param("replication", options.replication.as_deref())
        .maybe_param("routing", options.routing.as_deref())
        .maybe_param("timeout", options.timeout.as_deref())
        .maybe_param("version", options.version)
        .maybe_param("version_type", version_type)
        .document(document)
        .build(base_url)
}

/// GET /{index}/{type or _all}/{id}
pub fn get(base_url: &str, index: &str, id: &str, options: &GetOptions) -> Result<Request> {
    let doc_type = options
        .doc_type
        .as_deref()
        .filter(|doc_type| !doc_type.is_empty())
        .unwrap_or(ALL);

    RequestBuilder::new(Method::Get)
        .required_segment("index", index)?
        .segment(doc_type)
        .required_segment("id", id)?
        .maybe_param("fields", options.fields.as_ref())
        .maybe_param("preference", options.preference.as_deref())
        .maybe_param("realtime", options.realtime)
        .maybe_param("refresh", options.refresh)
        .maybe_param("routing", options.routing.as_deref())
        .build(base_url)
}

/// DELETE /{index}/{type}/{id}
pub fn delete(
    base_url: &str,
    index: &str,
    doc_type: &str,
    id: &str,
    options: &DeleteOptions,
) -> Result<Request> {
    RequestBuilder::new(Method::Delete)
        .required_segment("index", index)?
        .required_segment("type", doc_type)?
        .required_segment("id", id)?
        .maybe_param("consistency", options.consistency.as_deref())
        .maybe_param("parent", options.parent.as_deref())
        .maybe_param("refresh", options.refresh)
        .maybe_param("replication", options.replication.as_deref())
        .maybe_param("routing", options.routing.as_deref())
        .maybe_param("version", options.version)
        .build(base_url)
}

/// GET (no body) or POST (with body) to `/{index}/{type}/_search`
pub fn search(base_url: &str, options: &SearchOptions) -> Result<Request> {
    scoped(
        RequestBuilder::new(Method::Get),
        options.index.as_ref(),
        options.doc_type.as_ref(),
    )
    .segment("_search")
    .maybe_param("preference", options.preference.as_deref())
    .maybe_param("routing", options.routing.as_deref())
    .maybe_param("scroll", options.scroll.as_deref())
    .maybe_param("scroll_id", options.scroll_id.as_deref())
    .maybe_param("search_type", options.search_type.as_deref())
    .maybe_param("timeout", options.timeout.as_deref())
    .maybe_body_field("query", options.query.as_ref().map(Query::to_value))
    .maybe_body_field("explain", options.explain.map(Value::from))
    .maybe_body_field("facets", options.facets.clone())
    .maybe_body_field("fields", options.fields.as_ref().map(names_value))
    .maybe_body_field("filter", options.filter.clone())
    .maybe_body_field("from", options.from.map(Value::from))
    .maybe_body_field("highlight", options.highlight.clone())
    .maybe_body_field("indices_boost", options.indices_boost.clone())
    .maybe_body_field("min_score", options.min_score.map(Value::from))
    .maybe_body_field("script_fields", options.script_fields.clone())
    .maybe_body_field("size", options.size.map(Value::from))
    .maybe_body_field("sort", options.sort.clone())
    .maybe_body_field("track_scores", options.track_scores.map(Value::from))
    .maybe_body_field("version", options.version.map(Value::from))
    .method_by_body(Method::Get, Method::Post)
    .build(base_url)
}

/// Same path rules as search, ending in `_count`; the body is the bare query
pub fn count(base_url: &str, options: &CountOptions) -> Result<Request> {
    let mut builder = scoped(
        RequestBuilder::new(Method::Get),
        options.index.as_ref(),
        options.doc_type.as_ref(),
    )
    .segment("_count")
    .maybe_param("routing", options.routing.as_deref())
    .maybe_param("min_score", options.min_score);

    if let Some(query) = &options.query {
        builder = builder.document(query.to_value());
    }

    builder.method_by_body(Method::Get, Method::Post).build(base_url)
}

/// POST /_refresh or /{indices}/_refresh
pub fn refresh(base_url: &str, indices: Option<Names>) -> Result<Request> {
    let builder = match indices.filter(|indices| !indices.is_empty()) {
        Some(indices) => RequestBuilder::new(Method::Post).segment(indices),
        None => RequestBuilder::new(Method::Post),
    };
    builder.segment("_refresh").build(base_url)
}

/// PUT /{index}/{type}/_mapping with `{type: mapping}` as body
pub fn put_mapping(
    base_url: &str,
    index: impl Into<Names>,
    doc_type: &str,
    mapping: Value,
    options: &PutMappingOptions,
) -> Result<Request> {
    RequestBuilder::new(Method::Put)
        .required_segment("index", index)?
        .required_segment("type", doc_type)?
        .segment("_mapping")
        .maybe_param("ignore_conflicts", options.ignore_conflicts)
        .body_field(doc_type, mapping)
        .build(base_url)
}

/// GET /{index}/{type}/_mapping, either part optional
pub fn get_mapping(base_url: &str, options: &GetMappingOptions) -> Result<Request> {
    scoped(
        RequestBuilder::new(Method::Get),
        options.index.as_ref(),
        options.doc_type.as_ref(),
    )
    .segment("_mapping")
    .build(base_url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RequestError;
    use serde_json::json;
    use std::collections::HashMap;

    const BASE: &str = "http://127.0.0.1:9200";

    fn query_map(request: &Request) -> HashMap<String, String> {
        request.query_pairs().into_iter().collect()
    }

    fn expected(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_create_index_without_options() {
        let request = create_index(BASE, "new-index", &CreateIndexOptions::default()).unwrap();
        assert_eq!(request.method, Method::Put);
        assert_eq!(request.path(), "/new-index");
        assert_eq!(request.body, None);
    }

    #[test]
    fn test_create_index_with_settings() {
        let options = CreateIndexOptions {
            settings: Some(json!({ "number_of_shards": 1 })),
            ..Default::default()
        };
        let request = create_index(BASE, "new-index", &options).unwrap();
        assert_eq!(
            request.body,
            Some(json!({ "settings": { "number_of_shards": 1 } }))
        );
    }

    #[test]
    fn test_create_index_requires_name() {
        let err = create_index(BASE, "", &CreateIndexOptions::default()).unwrap_err();
        assert!(matches!(err, RequestError::MissingArgument("index")));
    }

    #[test]
    fn test_delete_without_options() {
        let request = delete(BASE, "posts", "post", "1", &DeleteOptions::default()).unwrap();
        assert_eq!(request.method, Method::Delete);
        assert_eq!(request.path(), "/posts/post/1");
        assert_eq!(request.url.query(), None);
    }

    #[test]
    fn test_delete_with_options() {
        let options = DeleteOptions {
            consistency: Some("all".into()),
            ignore_missing: true,
            parent: Some("42".into()),
            refresh: Some(true),
            replication: Some("async".into()),
            routing: Some("hashyhash".into()),
            version: Some(18),
        };
        let request = delete(BASE, "posts", "post", "1", &options).unwrap();
        assert_eq!(
            query_map(&request),
            expected(&[
                ("consistency", "all"),
                ("parent", "42"),
                ("refresh", "1"),
                ("replication", "async"),
                ("routing", "hashyhash"),
                ("version", "18"),
            ])
        );
    }

    #[test]
    fn test_delete_index_single_and_multiple() {
        let one = delete_index(BASE, "foo").unwrap();
        assert_eq!(one.method, Method::Delete);
        assert_eq!(one.path(), "/foo");

        let many = delete_index(BASE, vec!["foo", "bar"]).unwrap();
        assert_eq!(many.method, Method::Delete);
        assert_eq!(many.path(), "/foo%2Cbar");
    }

    #[test]
    fn test_get_without_options() {
        let request = get(BASE, "blog", "1", &GetOptions::default()).unwrap();
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.path(), "/blog/_all/1");
    }

    #[test]
    fn test_get_with_options() {
        let options = GetOptions {
            fields: Some(vec!["one", "two"].into()),
            preference: Some("_primary".into()),
            realtime: Some(false),
            refresh: Some(true),
            routing: Some("hashyhash".into()),
            doc_type: Some("post".into()),
        };
        let request = get(BASE, "blog", "1", &options).unwrap();
        assert_eq!(request.path(), "/blog/post/1");
        assert_eq!(
            query_map(&request),
            expected(&[
                ("fields", "one,two"),
                ("preference", "_primary"),
                ("realtime", "0"),
                ("refresh", "1"),
                ("routing", "hashyhash"),
            ])
        );
    }

    #[test]
    fn test_get_requires_id() {
        let err = get(BASE, "blog", "", &GetOptions::default()).unwrap_err();
        assert!(matches!(err, RequestError::MissingArgument("id")));
    }

    #[test]
    fn test_index_without_options() {
        let document = json!({ "title": "Hello", "content": "Moo." });
        let request = index(BASE, "blog", "post", document.clone(), &IndexOptions::default()).unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.path(), "/blog/post");
        assert_eq!(request.body, Some(document));
        assert_eq!(request.url.query(), None);
    }

    #[test]
    fn test_index_with_options() {
        let options = IndexOptions {
            consistency: Some("all".into()),
            create: true,
            id: Some("1".into()),
            parent: Some("42".into()),
            percolate: Some("*".into()),
            refresh: Some(true),
            replication: Some("async".into()),
            routing: Some("hashyhash".into()),
            timeout: Some("5m".into()),
            version: Some(42),
            version_type: None,
        };
        let request = index(BASE, "blog", "post", json!({ "title": "Hello" }), &options).unwrap();
        assert_eq!(request.method, Method::Put);
        assert_eq!(request.path(), "/blog/post/1");
        assert_eq!(
            query_map(&request),
            expected(&[
                ("consistency", "all"),
                ("op_type", "create"),
                ("parent", "42"),
                ("percolate", "*"),
                ("refresh", "1"),
                ("replication", "async"),
                ("routing", "hashyhash"),
                ("timeout", "5m"),
                ("version", "42"),
                ("version_type", "external"),
            ])
        );
    }

    #[test]
    fn test_index_explicit_version_type_wins() {
        let options = IndexOptions {
            version: Some(3),
            version_type: Some("internal".into()),
            ..Default::default()
        };
        let request = index(BASE, "blog", "post", json!({}), &options).unwrap();
        assert_eq!(query_map(&request)["version_type"], "internal");
    }

    #[test]
    fn test_index_exists_single_and_multiple() {
        let one = index_exists(BASE, "foo").unwrap();
        assert_eq!(one.method, Method::Head);
        assert_eq!(one.path(), "/foo");

        let many = index_exists(BASE, ["foo", "bar"]).unwrap();
        assert_eq!(many.method, Method::Head);
        assert_eq!(many.path(), "/foo%2Cbar");
        assert_eq!(many.body, None);
    }

    #[test]
    fn test_search_without_options() {
        let request = search(BASE, &SearchOptions::default()).unwrap();
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.path(), "/_search");
        assert_eq!(request.body, None);
    }

    #[test]
    fn test_search_with_options() {
        let options = SearchOptions {
            query: Some(json!({ "query_string": { "query": "foo" } }).into()),
            explain: Some(true),
            facets: Some(json!({})),
            fields: Some(vec!["one", "two"].into()),
            filter: Some(json!({})),
            from: Some(3),
            highlight: Some(json!({})),
            index: Some("blog".into()),
            indices_boost: Some(json!({})),
            min_score: Some(0.5),
            preference: Some("_primary".into()),
            routing: Some("hashyhash".into()),
            script_fields: Some(json!({})),
            scroll: Some("1m".into()),
            scroll_id: Some("foo".into()),
            search_type: Some("query_and_fetch".into()),
            size: Some(42),
            sort: Some(json!({})),
            timeout: Some("15s".into()),
            track_scores: Some(true),
            doc_type: Some("post".into()),
            version: Some(true),
        };
        let request = search(BASE, &options).unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.path(), "/blog/post/_search");
        assert_eq!(
            query_map(&request),
            expected(&[
                ("preference", "_primary"),
                ("routing", "hashyhash"),
                ("scroll", "1m"),
                ("scroll_id", "foo"),
                ("search_type", "query_and_fetch"),
                ("timeout", "15s"),
            ])
        );
        assert_eq!(
            request.body,
            Some(json!({
                "query": { "query_string": { "query": "foo" } },
                "explain": true,
                "facets": {},
                "fields": ["one", "two"],
                "filter": {},
                "from": 3,
                "highlight": {},
                "indices_boost": {},
                "min_score": 0.5,
                "script_fields": {},
                "size": 42,
                "sort": {},
                "track_scores": true,
                "version": true
            }))
        );
    }

    #[test]
    fn test_search_index_without_type() {
        let options = SearchOptions {
            index: Some("blog".into()),
            ..Default::default()
        };
        assert_eq!(search(BASE, &options).unwrap().path(), "/blog/_search");
    }

    #[test]
    fn test_search_type_without_index() {
        let options = SearchOptions {
            doc_type: Some("post".into()),
            ..Default::default()
        };
        assert_eq!(search(BASE, &options).unwrap().path(), "/_all/post/_search");
    }

    #[test]
    fn test_search_multiple_indices_and_types() {
        let options = SearchOptions {
            index: Some(vec!["blog", "twitter"].into()),
            doc_type: Some(vec!["post", "tweet"].into()),
            ..Default::default()
        };
        assert_eq!(
            search(BASE, &options).unwrap().path(),
            "/blog%2Ctwitter/post%2Ctweet/_search"
        );
    }

    #[test]
    fn test_search_string_query_is_wrapped() {
        let request = search(BASE, &SearchOptions::query("foo")).unwrap();
        assert_eq!(
            request.body,
            Some(json!({ "query": { "query_string": { "query": "foo" } } }))
        );
    }

    #[test]
    fn test_search_single_field_becomes_list() {
        let options = SearchOptions {
            fields: Some("title".into()),
            ..Default::default()
        };
        let request = search(BASE, &options).unwrap();
        assert_eq!(request.body, Some(json!({ "fields": ["title"] })));
    }

    #[test]
    fn test_search_fields_drop_empty_names() {
        let options = SearchOptions {
            fields: Some(vec!["", "a"].into()),
            ..Default::default()
        };
        let request = search(BASE, &options).unwrap();
        assert_eq!(request.body, Some(json!({ "fields": ["a"] })));

        let get_options = GetOptions {
            fields: Some(vec!["", "a"].into()),
            ..Default::default()
        };
        let fetched = get(BASE, "blog", "1", &get_options).unwrap();
        assert_eq!(query_map(&fetched), expected(&[("fields", "a")]));
    }

    #[test]
    fn test_count_uses_bare_query_body() {
        let options = CountOptions {
            index: Some("blog".into()),
            query: Some("foo".into()),
            routing: Some("r1".into()),
            ..Default::default()
        };
        let request = count(BASE, &options).unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.path(), "/blog/_count");
        assert_eq!(query_map(&request), expected(&[("routing", "r1")]));
        assert_eq!(
            request.body,
            Some(json!({ "query_string": { "query": "foo" } }))
        );
    }

    #[test]
    fn test_count_without_query() {
        let request = count(BASE, &CountOptions::default()).unwrap();
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.path(), "/_count");
        assert_eq!(request.body, None);
    }

    #[test]
    fn test_refresh_paths() {
        let all = refresh(BASE, None).unwrap();
        assert_eq!(all.method, Method::Post);
        assert_eq!(all.path(), "/_refresh");

        let some = refresh(BASE, Some(vec!["foo", "bar"].into())).unwrap();
        assert_eq!(some.path(), "/foo%2Cbar/_refresh");
    }

    #[test]
    fn test_put_mapping() {
        let mapping = json!({ "properties": { "title": { "type": "string" } } });
        let options = PutMappingOptions {
            ignore_conflicts: Some(true),
        };
        let request = put_mapping(BASE, "blog", "post", mapping.clone(), &options).unwrap();
        assert_eq!(request.method, Method::Put);
        assert_eq!(request.path(), "/blog/post/_mapping");
        assert_eq!(query_map(&request), expected(&[("ignore_conflicts", "1")]));
        assert_eq!(request.body, Some(json!({ "post": mapping })));
    }

    #[test]
    fn test_get_mapping_paths() {
        let all = get_mapping(BASE, &GetMappingOptions::default()).unwrap();
        assert_eq!(all.path(), "/_mapping");

        let typed = get_mapping(
            BASE,
            &GetMappingOptions {
                doc_type: Some("post".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(typed.path(), "/_all/post/_mapping");

        let both = get_mapping(
            BASE,
            &GetMappingOptions {
                index: Some("blog".into()),
                doc_type: Some("post".into()),
            },
        )
        .unwrap();
        assert_eq!(both.path(), "/blog/post/_mapping");
    }

    #[test]
    fn test_base_url_is_honored() {
        let request = search("http://example.com:42", &SearchOptions::default()).unwrap();
        assert_eq!(request.url.as_str(), "http://example.com:42/_search");
    }
}
