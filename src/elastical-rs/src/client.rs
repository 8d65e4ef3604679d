use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, Weak};
use std::time::Duration;

use elastical_core::operations;
use elastical_core::{
    Acknowledged, ClientConfig, CountOptions, CountResult, CreateIndexOptions, DeleteOptions,
    DeleteResult, GetMappingOptions, GetOptions, GetResult, IndexOptions, IndexResult, Names,
    PutMappingOptions, Request, SearchOptions, SearchResponse, SearchResults,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::index::Index;
use crate::transport::{ApiResponse, HttpTransport, RawResponse, Transport};
use crate::{ClientError, Result};

pub(crate) struct ClientInner {
    config: RwLock<ClientConfig>,
    transport: Arc<dyn Transport>,
    indices: Mutex<HashMap<String, Arc<Index>>>,
}

/// Search server REST API Client
///
/// Cheap to clone; clones share configuration, transport and the index
/// handle cache.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

impl Client {
    /// Create a client for `127.0.0.1:9200`
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client for `host` on the default port
    pub fn with_host(host: impl Into<String>) -> Self {
        Self::with_config(ClientConfig::with_host(host))
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self::with_transport(config, Arc::new(HttpTransport::new()))
    }

    /// Create a client that sends requests through a custom transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                config: RwLock::new(config),
                transport,
                indices: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub(crate) fn from_inner(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    pub(crate) fn downgrade(&self) -> Weak<ClientInner> {
        Arc::downgrade(&self.inner)
    }

    /// True when both values refer to the same client
    pub fn ptr_eq(&self, other: &Client) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn read_config(&self) -> RwLockReadGuard<'_, ClientConfig> {
        self.inner
            .config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn update_config(&self, update: impl FnOnce(&mut ClientConfig)) {
        let mut config = self
            .inner
            .config
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        update(&mut config);
    }

    /// Snapshot of the current configuration
    pub fn config(&self) -> ClientConfig {
        self.read_config().clone()
    }

    pub fn host(&self) -> String {
        self.read_config().host.clone()
    }

    pub fn port(&self) -> u16 {
        self.read_config().port
    }

    /// Request timeout in milliseconds
    pub fn timeout(&self) -> u64 {
        self.read_config().timeout
    }

    pub fn set_host(&self, host: impl Into<String>) {
        let host = host.into();
        self.update_config(|config| config.host = host);
    }

    pub fn set_port(&self, port: u16) {
        self.update_config(|config| config.port = port);
    }

    pub fn set_timeout(&self, timeout: u64) {
        self.update_config(|config| config.timeout = timeout);
    }

    /// Base URL reflecting the current host and port
    pub fn base_url(&self) -> String {
        self.read_config().base_url()
    }

    /// Handle for `name`; the same instance is returned for the same name
    pub fn get_index(&self, name: &str) -> Arc<Index> {
        let mut indices = self
            .inner
            .indices
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        indices
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Index::new(name, self)))
            .clone()
    }

    /// Send without looking at the status
    async fn send(&self, request: Request) -> Result<RawResponse> {
        let timeout = Duration::from_millis(self.timeout());
        tracing::debug!(method = %request.method, url = %request.url, "sending request");
        let raw = self.inner.transport.send(request, timeout).await?;
        tracing::debug!(status = raw.status, "received response");
        Ok(raw)
    }

    /// Send and turn any non-2xx status into [`ClientError::Server`]
    async fn execute(&self, request: Request) -> Result<RawResponse> {
        let raw = self.send(request).await?;
        if !raw.is_success() {
            tracing::warn!(status = raw.status, "server returned an error");
            return Err(ClientError::Server {
                status: raw.status,
                body: raw.body,
            });
        }
        Ok(raw)
    }

    async fn execute_json<T: DeserializeOwned>(&self, request: Request) -> Result<ApiResponse<T>> {
        let raw = self.execute(request).await?;
        let result = raw.json()?;
        Ok(ApiResponse { result, raw })
    }

    /// Create an index, optionally with settings and mappings
    #[tracing::instrument(skip(self, options))]
    pub async fn create_index(
        &self,
        index: &str,
        options: &CreateIndexOptions,
    ) -> Result<ApiResponse<Acknowledged>> {
        let request = operations::create_index(&self.base_url(), index, options)?;
        self.execute_json(request).await
    }

    /// Delete one or more indices
    #[tracing::instrument(skip_all)]
    pub async fn delete_index(&self, indices: impl Into<Names>) -> Result<ApiResponse<Acknowledged>> {
        let request = operations::delete_index(&self.base_url(), indices)?;
        self.execute_json(request).await
    }

    /// Whether all of the given indices exist; a 404 answers `false`
    #[tracing::instrument(skip_all)]
    pub async fn index_exists(&self, indices: impl Into<Names>) -> Result<ApiResponse<bool>> {
        let request = operations::index_exists(&self.base_url(), indices)?;
        let raw = self.send(request).await?;
        match raw.status {
            404 => Ok(ApiResponse { result: false, raw }),
            _ if raw.is_success() => Ok(ApiResponse { result: true, raw }),
            status => Err(ClientError::Server {
                status,
                body: raw.body,
            }),
        }
    }

    /// Add or replace a document
    #[tracing::instrument(skip(self, document, options))]
    pub async fn index<D: Serialize + ?Sized>(
        &self,
        index: &str,
        doc_type: &str,
        document: &D,
        options: &IndexOptions,
    ) -> Result<ApiResponse<IndexResult>> {
        let document = serde_json::to_value(document)?;
        let request = operations::index(&self.base_url(), index, doc_type, document, options)?;
        self.execute_json(request).await
    }

    /// Alias for [`Client::index`]
    pub async fn set<D: Serialize + ?Sized>(
        &self,
        index: &str,
        doc_type: &str,
        document: &D,
        options: &IndexOptions,
    ) -> Result<ApiResponse<IndexResult>> {
        self.index(index, doc_type, document, options).await
    }

    /// Fetch a document by id
    #[tracing::instrument(skip(self, options))]
    pub async fn get(
        &self,
        index: &str,
        id: &str,
        options: &GetOptions,
    ) -> Result<ApiResponse<GetResult>> {
        let request = operations::get(&self.base_url(), index, id, options)?;
        self.execute_json(request).await
    }

    /// Delete a document; with `ignore_missing` a 404 is not an error
    #[tracing::instrument(skip(self, options))]
    pub async fn delete(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
        options: &DeleteOptions,
    ) -> Result<ApiResponse<DeleteResult>> {
        let request = operations::delete(&self.base_url(), index, doc_type, id, options)?;

        if !options.ignore_missing {
            return self.execute_json(request).await;
        }

        let raw = self.send(request).await?;
        match raw.status {
            404 => {
                let mut result: DeleteResult = match raw.json() {
                    Ok(result) => result,
                    Err(e) => {
                        tracing::debug!(error = %e, "unparsable 404 body on ignore_missing delete");
                        DeleteResult::default()
                    }
                };
                result.found = false;
                Ok(ApiResponse { result, raw })
            }
            _ if raw.is_success() => {
                let result = raw.json()?;
                Ok(ApiResponse { result, raw })
            }
            status => Err(ClientError::Server {
                status,
                body: raw.body,
            }),
        }
    }

    /// Search across all indices and types unless the options narrow it
    #[tracing::instrument(skip_all)]
    pub async fn search(&self, options: &SearchOptions) -> Result<ApiResponse<SearchResults>> {
        let request = operations::search(&self.base_url(), options)?;
        let response: ApiResponse<SearchResponse> = self.execute_json(request).await?;
        Ok(ApiResponse {
            result: response.result.into(),
            raw: response.raw,
        })
    }

    /// Number of documents matching the query
    #[tracing::instrument(skip_all)]
    pub async fn count(&self, options: &CountOptions) -> Result<ApiResponse<CountResult>> {
        let request = operations::count(&self.base_url(), options)?;
        self.execute_json(request).await
    }

    /// Refresh the given indices, or all of them
    #[tracing::instrument(skip_all)]
    pub async fn refresh(&self, indices: Option<Names>) -> Result<ApiResponse<Acknowledged>> {
        let request = operations::refresh(&self.base_url(), indices)?;
        self.execute_json(request).await
    }

    /// Register a mapping for `doc_type`
    #[tracing::instrument(skip(self, index, mapping, options))]
    pub async fn put_mapping(
        &self,
        index: impl Into<Names>,
        doc_type: &str,
        mapping: serde_json::Value,
        options: &PutMappingOptions,
    ) -> Result<ApiResponse<Acknowledged>> {
        let request = operations::put_mapping(&self.base_url(), index, doc_type, mapping, options)?;
        self.execute_json(request).await
    }

    /// Mappings as returned by the server
    #[tracing::instrument(skip_all)]
    pub async fn get_mapping(
        &self,
        options: &GetMappingOptions,
    ) -> Result<ApiResponse<serde_json::Value>> {
        let request = operations::get_mapping(&self.base_url(), options)?;
        self.execute_json(request).await
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &*self.read_config())
            .finish_non_exhaustive()
    }
}
