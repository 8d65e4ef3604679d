use std::sync::Weak;

use elastical_core::{
    Acknowledged, CountOptions, CountResult, DeleteOptions, DeleteResult, GetMappingOptions,
    GetOptions, GetResult, IndexOptions, IndexResult, Names, PutMappingOptions, RequestError,
    SearchOptions, SearchResults,
};
use serde::Serialize;

use crate::client::{Client, ClientInner};
use crate::transport::ApiResponse;
use crate::{ClientError, Result};

/// A single index on the server, bound to the client that created it.
///
/// Obtained through [`Client::get_index`]. Every method delegates to the
/// client with this index's name filled in.
pub struct Index {
    name: String,
    client: Weak<ClientInner>,
}

impl Index {
    pub(crate) fn new(name: &str, client: &Client) -> Self {
        Self {
            name: name.to_string(),
            client: client.downgrade(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The owning client, or [`ClientError::Detached`] once it has been dropped
    pub fn client(&self) -> Result<Client> {
        self.client
            .upgrade()
            .map(Client::from_inner)
            .ok_or(ClientError::Detached)
    }

    /// The owning client, checked against an empty index name so a handle
    /// never widens to every index
    fn bound(&self) -> Result<Client> {
        if self.name.is_empty() {
            return Err(RequestError::MissingArgument("index").into());
        }
        self.client()
    }

    pub async fn search(&self, options: &SearchOptions) -> Result<ApiResponse<SearchResults>> {
        let options = SearchOptions {
            index: Some(Names::from(&self.name)),
            ..options.clone()
        };
        self.bound()?.search(&options).await
    }

    pub async fn count(&self, options: &CountOptions) -> Result<ApiResponse<CountResult>> {
        let options = CountOptions {
            index: Some(Names::from(&self.name)),
            ..options.clone()
        };
        self.bound()?.count(&options).await
    }

    pub async fn get(&self, id: &str, options: &GetOptions) -> Result<ApiResponse<GetResult>> {
        self.bound()?.get(&self.name, id, options).await
    }

    pub async fn delete(
        &self,
        doc_type: &str,
        id: &str,
        options: &DeleteOptions,
    ) -> Result<ApiResponse<DeleteResult>> {
        self.bound()?
            .delete(&self.name, doc_type, id, options)
            .await
    }

    pub async fn index<D: Serialize + ?Sized>(
        &self,
        doc_type: &str,
        document: &D,
        options: &IndexOptions,
    ) -> Result<ApiResponse<IndexResult>> {
        self.bound()?
            .index(&self.name, doc_type, document, options)
            .await
    }

    /// Alias for [`Index::index`]
    pub async fn set<D: Serialize + ?Sized>(
        &self,
        doc_type: &str,
        document: &D,
        options: &IndexOptions,
    ) -> Result<ApiResponse<IndexResult>> {
        self.index(doc_type, document, options).await
    }

    pub async fn exists(&self) -> Result<ApiResponse<bool>> {
        self.bound()?.index_exists(self.name.as_str()).await
    }

    pub async fn refresh(&self) -> Result<ApiResponse<Acknowledged>> {
        self.bound()?
            .refresh(Some(Names::from(&self.name)))
            .await
    }

    pub async fn put_mapping(
        &self,
        doc_type: &str,
        mapping: serde_json::Value,
        options: &PutMappingOptions,
    ) -> Result<ApiResponse<Acknowledged>> {
        self.bound()?
            .put_mapping(self.name.as_str(), doc_type, mapping, options)
            .await
    }

    /// Mapping of one type, or of the whole index when `doc_type` is `None`
    pub async fn get_mapping(&self, doc_type: Option<&str>) -> Result<ApiResponse<serde_json::Value>> {
        let options = GetMappingOptions {
            index: Some(Names::from(&self.name)),
            doc_type: doc_type.map(Names::from),
        };
        self.bound()?.get_mapping(&options).await
    }
}

impl std::fmt::Debug for Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Index").field("name", &self.name).finish()
    }
}
