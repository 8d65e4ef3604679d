//! Request builder
//!
//! Turns path segments, query parameters and body fields into a [`Request`]
//! ready to be handed to a transport. Multi-name segments are joined with
//! commas and escaped as a single path segment; query values are coerced to
//! the server's string conventions (`true` -> `"1"`, lists -> `"a,b"`).

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::error::{RequestError, Result};

/// HTTP verb of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Head,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
        }
    }

    /// Whether requests with this verb may carry a body
    pub fn allows_body(&self) -> bool {
        !matches!(self, Method::Head)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One or more index, type or field names.
///
/// A single string converts into a one-element list, so every API that takes
/// names accepts `"blog"`, `vec!["blog", "twitter"]` or `["a", "b"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Names(Vec<String>);

impl<'de> Deserialize<'de> for Names {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            One(String),
            Many(Vec<String>),
        }

        Ok(match OneOrMany::deserialize(deserializer)? {
            OneOrMany::One(name) => Self(vec![name]),
            OneOrMany::Many(names) => Self(names),
        })
    }
}

impl Names {
    pub fn new(names: Vec<String>) -> Self {
        Self(names)
    }

    /// True when there is no non-empty name
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|name| name.is_empty())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Names joined with commas, empty entries dropped
    pub fn joined(&self) -> String {
        self.0
            .iter()
            .filter(|name| !name.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl From<&str> for Names {
    fn from(name: &str) -> Self {
        Self(vec![name.to_string()])
    }
}

impl From<String> for Names {
    fn from(name: String) -> Self {
        Self(vec![name])
    }
}

impl From<&String> for Names {
    fn from(name: &String) -> Self {
        Self(vec![name.clone()])
    }
}

impl From<Vec<String>> for Names {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

impl From<Vec<&str>> for Names {
    fn from(names: Vec<&str>) -> Self {
        Self(names.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Names {
    fn from(names: &[&str]) -> Self {
        Self(names.iter().map(|name| name.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Names {
    fn from(names: [&str; N]) -> Self {
        Self(names.iter().map(|name| name.to_string()).collect())
    }
}

/// A value that can be rendered into the query string
pub trait QueryParam {
    fn to_param(&self) -> String;
}

impl QueryParam for str {
    fn to_param(&self) -> String {
        self.to_string()
    }
}

impl QueryParam for String {
    fn to_param(&self) -> String {
        self.clone()
    }
}

impl QueryParam for bool {
    fn to_param(&self) -> String {
        let flag = if *self { "1" } else { "0" };
        flag.to_string()
    }
}

impl QueryParam for Names {
    fn to_param(&self) -> String {
        self.joined()
    }
}

macro_rules! numeric_query_param {
    ($($ty:ty),*) => {
        $(
            impl QueryParam for $ty {
                fn to_param(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

numeric_query_param!(u32, u64, i32, i64, usize, f32, f64);

impl<T: QueryParam + ?Sized> QueryParam for &T {
    fn to_param(&self) -> String {
        (**self).to_param()
    }
}

/// Fully built request: verb, absolute URL, optional JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub body: Option<Value>,
}

impl Request {
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Decoded query pairs in the order they were added
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.url
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect()
    }
}

enum Body {
    Fields(Map<String, Value>),
    Document(Value),
}

/// Accumulates the parts of a request before it is bound to a base URL
pub struct RequestBuilder {
    method: Method,
    segments: Vec<String>,
    params: Vec<(String, String)>,
    body: Body,
}

impl RequestBuilder {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            segments: Vec::new(),
            params: Vec::new(),
            body: Body::Fields(Map::new()),
        }
    }

    /// Append a path segment; multiple names are comma-joined and escaped together
    pub fn segment(mut self, names: impl Into<Names>) -> Self {
        let joined = names.into().joined();
        self.segments.push(urlencoding::encode(&joined).into_owned());
        self
    }

    /// Append a segment that must be present; `what` names it in the error
    pub fn required_segment(self, what: &'static str, names: impl Into<Names>) -> Result<Self> {
        let names = names.into();
        if names.is_empty() {
            return Err(RequestError::MissingArgument(what));
        }
        Ok(self.segment(names))
    }

    pub fn param(mut self, key: &str, value: impl QueryParam) -> Self {
        self.params.push((key.to_string(), value.to_param()));
        self
    }

    pub fn maybe_param(self, key: &str, value: Option<impl QueryParam>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    /// Set one field of the JSON body object
    pub fn body_field(mut self, key: &str, value: Value) -> Self {
        let mut fields = match std::mem::replace(&mut self.body, Body::Fields(Map::new())) {
            Body::Fields(fields) | Body::Document(Value::Object(fields)) => fields,
            Body::Document(_) => Map::new(),
        };
        fields.insert(key.to_string(), value);
        self.body = Body::Fields(fields);
        self
    }

    pub fn maybe_body_field(self, key: &str, value: Option<Value>) -> Self {
        match value {
            Some(value) => self.body_field(key, value),
            None => self,
        }
    }

    /// Use `document` verbatim as the body
    pub fn document(mut self, document: Value) -> Self {
        self.body = Body::Document(document);
        self
    }

    pub fn has_body(&self) -> bool {
        match &self.body {
            Body::Fields(fields) => !fields.is_empty(),
            Body::Document(_) => true,
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// `without` when there is no body, `with` otherwise
    pub fn method_by_body(self, without: Method, with: Method) -> Self {
        let method = if self.has_body() { with } else { without };
        self.method(method)
    }

    pub fn build(self, base_url: &str) -> Result<Request> {
        let path = format!("/{}", self.segments.join("/"));
        let mut url = Url::parse(&format!("{}{}", base_url.trim_end_matches('/'), path))?;

        if !self.params.is_empty() {
            url.query_pairs_mut().extend_pairs(self.params.iter());
        }

        let method = self.method;
        let body = if method.allows_body() && self.has_body() {
            match self.body {
                Body::Fields(fields) => Some(Value::Object(fields)),
                Body::Document(document) => Some(document),
            }
        } else {
            None
        };

        tracing::trace!(method = %method, url = %url, "built request");

        Ok(Request { method, url, body })
    }
}
