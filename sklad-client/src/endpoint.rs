//! Reusable building blocks bound to one entity collection.
//!
//! Each block owns a clone of an [`Endpoint`] and exposes one group of
//! operations. Services combine the blocks their entity kind supports.

use crate::async_op::AsyncOperation;
use crate::client::Client;
use crate::error::Result;
use crate::request::RequestBuilder;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sklad_core::{
    Attribute, BulkResult, File, List, Meta, MetaOwner, MetaWrapper, NamedFilter, Params,
    Publication, State, TrackingCode,
};
use std::marker::PhantomData;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// A client bound to a collection path such as `entity/product`.
#[derive(Debug, Clone)]
pub struct Endpoint {
    client: Client,
    uri: String,
}

impl Endpoint {
    /// Bind `client` to `uri`.
    pub fn new(client: Client, uri: impl Into<String>) -> Self {
        Self {
            client,
            uri: uri.into().trim_matches('/').to_string(),
        }
    }

    /// The client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Collection path relative to the API root.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Join path segments onto the collection path.
    pub fn path(&self, segments: &[&str]) -> String {
        segments.iter().fold(self.uri.clone(), |mut path, segment| {
            path.push('/');
            path.push_str(segment.trim_matches('/'));
            path
        })
    }

    /// Start a request against `segments` under the collection path.
    pub fn request(&self, segments: &[&str]) -> RequestBuilder {
        self.client.request(self.path(segments))
    }

    fn request_with(&self, segments: &[&str], params: &Params) -> RequestBuilder {
        self.request(segments).with_params(params.clone())
    }
}

macro_rules! block {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name {
            endpoint: Endpoint,
        }

        impl $name {
            /// Create the block over `endpoint`.
            pub fn new(endpoint: Endpoint) -> Self {
                Self { endpoint }
            }
        }
    };
    ($(#[$doc:meta])* $name:ident<$param:ident>) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name<$param> {
            endpoint: Endpoint,
            _marker: PhantomData<fn() -> $param>,
        }

        impl<$param> $name<$param> {
            /// Create the block over `endpoint`.
            pub fn new(endpoint: Endpoint) -> Self {
                Self {
                    endpoint,
                    _marker: PhantomData,
                }
            }
        }
    };
}

block! {
    /// List, read, create, update and delete entities of one kind.
    Crud<T>
}

impl<T> Crud<T>
where
    T: Serialize + DeserializeOwned,
{
    /// `GET {uri}`
    pub async fn list(&self, params: &Params, cancel: &CancellationToken) -> Result<List<T>> {
        self.endpoint.request_with(&[], params).get(cancel).await
    }

    /// `GET {uri}?async=true`
    pub async fn list_async(
        &self,
        params: &Params,
        cancel: &CancellationToken,
    ) -> Result<AsyncOperation<List<T>>> {
        self.endpoint.request_with(&[], params).get_async(cancel).await
    }

    /// `GET {uri}/{id}`
    pub async fn get_by_id(
        &self,
        id: Uuid,
        params: &Params,
        cancel: &CancellationToken,
    ) -> Result<T> {
        self.endpoint
            .request_with(&[id.to_string().as_str()], params)
            .get(cancel)
            .await
    }

    /// `POST {uri}`
    pub async fn create(
        &self,
        entity: &T,
        params: &Params,
        cancel: &CancellationToken,
    ) -> Result<T> {
        self.endpoint.request_with(&[], params).post(entity, cancel).await
    }

    /// `PUT {uri}/{id}`
    pub async fn update(
        &self,
        id: Uuid,
        entity: &T,
        params: &Params,
        cancel: &CancellationToken,
    ) -> Result<T> {
        self.endpoint
            .request_with(&[id.to_string().as_str()], params)
            .put(entity, cancel)
            .await
    }

    /// `DELETE {uri}/{id}`
    pub async fn delete(&self, id: Uuid, cancel: &CancellationToken) -> Result<bool> {
        self.endpoint.request(&[id.to_string().as_str()]).delete(cancel).await
    }

    /// `POST {uri}` with an array.
    pub async fn create_update_many(
        &self,
        entities: &[T],
        params: &Params,
        cancel: &CancellationToken,
    ) -> Result<BulkResult<T>> {
        self.endpoint
            .request_with(&[], params)
            .create_update_many(entities, cancel)
            .await
    }

    /// `POST {uri}/delete`
    pub async fn delete_many<R: MetaOwner>(
        &self,
        references: &[R],
        cancel: &CancellationToken,
    ) -> Result<BulkResult<Meta>> {
        self.endpoint
            .request(&["delete"])
            .delete_many(references, cancel)
            .await
    }
}

block! {
    /// Metadata of the entity kind.
    Metadata<M>
}

impl<M: DeserializeOwned> Metadata<M> {
    /// `GET {uri}/metadata`
    pub async fn get(&self, cancel: &CancellationToken) -> Result<M> {
        self.endpoint.request(&["metadata"]).get(cancel).await
    }
}

block! {
    /// Additional field definitions: `{uri}/metadata/attributes`.
    Attributes
}

impl Attributes {
    const PATH: [&'static str; 2] = ["metadata", "attributes"];

    /// `GET {uri}/metadata/attributes`
    pub async fn list(&self, cancel: &CancellationToken) -> Result<List<Attribute>> {
        self.endpoint.request(&Self::PATH).get(cancel).await
    }

    /// `GET {uri}/metadata/attributes/{id}`
    pub async fn get_by_id(&self, id: Uuid, cancel: &CancellationToken) -> Result<Attribute> {
        let id = id.to_string();
        self.endpoint
            .request(&["metadata", "attributes", id.as_str()])
            .get(cancel)
            .await
    }

    /// `POST {uri}/metadata/attributes`
    pub async fn create(
        &self,
        attribute: &Attribute,
        cancel: &CancellationToken,
    ) -> Result<Attribute> {
        self.endpoint.request(&Self::PATH).post(attribute, cancel).await
    }

    /// `POST {uri}/metadata/attributes` with an array.
    pub async fn create_update_many(
        &self,
        attributes: &[Attribute],
        cancel: &CancellationToken,
    ) -> Result<BulkResult<Attribute>> {
        self.endpoint
            .request(&Self::PATH)
            .create_update_many(attributes, cancel)
            .await
    }

    /// `PUT {uri}/metadata/attributes/{id}`
    pub async fn update(
        &self,
        id: Uuid,
        attribute: &Attribute,
        cancel: &CancellationToken,
    ) -> Result<Attribute> {
        let id = id.to_string();
        self.endpoint
            .request(&["metadata", "attributes", id.as_str()])
            .put(attribute, cancel)
            .await
    }

    /// `DELETE {uri}/metadata/attributes/{id}`
    pub async fn delete(&self, id: Uuid, cancel: &CancellationToken) -> Result<bool> {
        let id = id.to_string();
        self.endpoint
            .request(&["metadata", "attributes", id.as_str()])
            .delete(cancel)
            .await
    }

    /// `POST {uri}/metadata/attributes/delete`
    pub async fn delete_many<R: MetaOwner>(
        &self,
        references: &[R],
        cancel: &CancellationToken,
    ) -> Result<BulkResult<Meta>> {
        self.endpoint
            .request(&["metadata", "attributes", "delete"])
            .delete_many(references, cancel)
            .await
    }
}

block! {
    /// Custom statuses: `{uri}/metadata/states`.
    States
}

impl States {
    const PATH: [&'static str; 2] = ["metadata", "states"];

    /// `GET {uri}/metadata/states/{id}`
    pub async fn get_by_id(&self, id: Uuid, cancel: &CancellationToken) -> Result<State> {
        let id = id.to_string();
        self.endpoint
            .request(&["metadata", "states", id.as_str()])
            .get(cancel)
            .await
    }

    /// `POST {uri}/metadata/states`
    pub async fn create(&self, state: &State, cancel: &CancellationToken) -> Result<State> {
        self.endpoint.request(&Self::PATH).post(state, cancel).await
    }

    /// `POST {uri}/metadata/states` with an array.
    pub async fn create_update_many(
        &self,
        states: &[State],
        cancel: &CancellationToken,
    ) -> Result<BulkResult<State>> {
        self.endpoint
            .request(&Self::PATH)
            .create_update_many(states, cancel)
            .await
    }

    /// `PUT {uri}/metadata/states/{id}`
    pub async fn update(
        &self,
        id: Uuid,
        state: &State,
        cancel: &CancellationToken,
    ) -> Result<State> {
        let id = id.to_string();
        self.endpoint
            .request(&["metadata", "states", id.as_str()])
            .put(state, cancel)
            .await
    }

    /// `DELETE {uri}/metadata/states/{id}`
    pub async fn delete(&self, id: Uuid, cancel: &CancellationToken) -> Result<bool> {
        let id = id.to_string();
        self.endpoint
            .request(&["metadata", "states", id.as_str()])
            .delete(cancel)
            .await
    }
}

block! {
    /// Files attached to an entity: `{uri}/{id}/files`.
    Files
}

impl Files {
    /// `GET {uri}/{id}/files`
    pub async fn list(
        &self,
        id: Uuid,
        params: &Params,
        cancel: &CancellationToken,
    ) -> Result<List<File>> {
        self.endpoint
            .request_with(&[id.to_string().as_str(), "files"], params)
            .get(cancel)
            .await
    }

    /// `POST {uri}/{id}/files`
    pub async fn create(
        &self,
        id: Uuid,
        files: &[File],
        cancel: &CancellationToken,
    ) -> Result<Vec<File>> {
        self.endpoint
            .request(&[id.to_string().as_str(), "files"])
            .post(files, cancel)
            .await
    }

    /// `DELETE {uri}/{id}/files/{fileId}`
    pub async fn delete(
        &self,
        id: Uuid,
        file_id: Uuid,
        cancel: &CancellationToken,
    ) -> Result<bool> {
        self.endpoint
            .request(&[id.to_string().as_str(), "files", file_id.to_string().as_str()])
            .delete(cancel)
            .await
    }

    /// `POST {uri}/{id}/files/delete`
    pub async fn delete_many<R: MetaOwner>(
        &self,
        id: Uuid,
        references: &[R],
        cancel: &CancellationToken,
    ) -> Result<BulkResult<Meta>> {
        self.endpoint
            .request(&[id.to_string().as_str(), "files", "delete"])
            .delete_many(references, cancel)
            .await
    }
}

#[derive(Serialize)]
struct PublicationRequest<'a> {
    template: &'a MetaWrapper,
}

block! {
    /// Publications of a document: `{uri}/{id}/publication`.
    Publications
}

impl Publications {
    /// `GET {uri}/{id}/publication`
    pub async fn list(&self, id: Uuid, cancel: &CancellationToken) -> Result<List<Publication>> {
        self.endpoint
            .request(&[id.to_string().as_str(), "publication"])
            .get(cancel)
            .await
    }

    /// `GET {uri}/{id}/publication/{publicationId}`
    pub async fn get_by_id(
        &self,
        id: Uuid,
        publication_id: Uuid,
        cancel: &CancellationToken,
    ) -> Result<Publication> {
        self.endpoint
            .request(&[id.to_string().as_str(), "publication", publication_id.to_string().as_str()])
            .get(cancel)
            .await
    }

    /// `POST {uri}/{id}/publication` rendering `template`.
    pub async fn create(
        &self,
        id: Uuid,
        template: &MetaWrapper,
        cancel: &CancellationToken,
    ) -> Result<Publication> {
        self.endpoint
            .request(&[id.to_string().as_str(), "publication"])
            .post(&PublicationRequest { template }, cancel)
            .await
    }

    /// `DELETE {uri}/{id}/publication/{publicationId}`
    pub async fn delete(
        &self,
        id: Uuid,
        publication_id: Uuid,
        cancel: &CancellationToken,
    ) -> Result<bool> {
        self.endpoint
            .request(&[id.to_string().as_str(), "publication", publication_id.to_string().as_str()])
            .delete(cancel)
            .await
    }
}

block! {
    /// Saved filters: `{uri}/namedfilter`.
    NamedFilters
}

impl NamedFilters {
    /// `GET {uri}/namedfilter`
    pub async fn list(
        &self,
        params: &Params,
        cancel: &CancellationToken,
    ) -> Result<List<NamedFilter>> {
        self.endpoint
            .request_with(&["namedfilter"], params)
            .get(cancel)
            .await
    }

    /// `GET {uri}/namedfilter/{id}`
    pub async fn get_by_id(&self, id: Uuid, cancel: &CancellationToken) -> Result<NamedFilter> {
        self.endpoint
            .request(&["namedfilter", id.to_string().as_str()])
            .get(cancel)
            .await
    }
}

block! {
    /// Document positions: `{uri}/{id}/positions`.
    Positions<P>
}

impl<P> Positions<P>
where
    P: Serialize + DeserializeOwned,
{
    /// `GET {uri}/{id}/positions`
    pub async fn list(
        &self,
        id: Uuid,
        params: &Params,
        cancel: &CancellationToken,
    ) -> Result<List<P>> {
        self.endpoint
            .request_with(&[id.to_string().as_str(), "positions"], params)
            .get(cancel)
            .await
    }

    /// `GET {uri}/{id}/positions/{positionId}`
    pub async fn get_by_id(
        &self,
        id: Uuid,
        position_id: Uuid,
        params: &Params,
        cancel: &CancellationToken,
    ) -> Result<P> {
        self.endpoint
            .request_with(
                &[
                    id.to_string().as_str(),
                    "positions",
                    position_id.to_string().as_str(),
                ],
                params,
            )
            .get(cancel)
            .await
    }

    /// `POST {uri}/{id}/positions`
    pub async fn create(
        &self,
        id: Uuid,
        positions: &[P],
        cancel: &CancellationToken,
    ) -> Result<Vec<P>> {
        self.endpoint
            .request(&[id.to_string().as_str(), "positions"])
            .post(positions, cancel)
            .await
    }

    /// `POST {uri}/{id}/positions` with a single position.
    pub async fn create_one(
        &self,
        id: Uuid,
        position: &P,
        cancel: &CancellationToken,
    ) -> Result<P> {
        self.endpoint
            .request(&[id.to_string().as_str(), "positions"])
            .post(position, cancel)
            .await
    }

    /// `PUT {uri}/{id}/positions/{positionId}`
    pub async fn update(
        &self,
        id: Uuid,
        position_id: Uuid,
        position: &P,
        cancel: &CancellationToken,
    ) -> Result<P> {
        self.endpoint
            .request(&[id.to_string().as_str(), "positions", position_id.to_string().as_str()])
            .put(position, cancel)
            .await
    }

    /// `DELETE {uri}/{id}/positions/{positionId}`
    pub async fn delete(
        &self,
        id: Uuid,
        position_id: Uuid,
        cancel: &CancellationToken,
    ) -> Result<bool> {
        self.endpoint
            .request(&[id.to_string().as_str(), "positions", position_id.to_string().as_str()])
            .delete(cancel)
            .await
    }

    /// `POST {uri}/{id}/positions/delete`
    pub async fn delete_many<R: MetaOwner>(
        &self,
        id: Uuid,
        references: &[R],
        cancel: &CancellationToken,
    ) -> Result<BulkResult<Meta>> {
        self.endpoint
            .request(&[id.to_string().as_str(), "positions", "delete"])
            .delete_many(references, cancel)
            .await
    }

    /// `GET {uri}/{id}/positions/{positionId}/trackingCodes`
    pub async fn tracking_codes(
        &self,
        id: Uuid,
        position_id: Uuid,
        cancel: &CancellationToken,
    ) -> Result<List<TrackingCode>> {
        let (id, position_id) = (id.to_string(), position_id.to_string());
        self.endpoint
            .request(&[id.as_str(), "positions", position_id.as_str(), "trackingCodes"])
            .get(cancel)
            .await
    }

    /// `POST {uri}/{id}/positions/{positionId}/trackingCodes`
    pub async fn create_update_tracking_codes(
        &self,
        id: Uuid,
        position_id: Uuid,
        codes: &[TrackingCode],
        cancel: &CancellationToken,
    ) -> Result<BulkResult<TrackingCode>> {
        let (id, position_id) = (id.to_string(), position_id.to_string());
        self.endpoint
            .request(&[id.as_str(), "positions", position_id.as_str(), "trackingCodes"])
            .create_update_many(codes, cancel)
            .await
    }

    /// `POST {uri}/{id}/positions/{positionId}/trackingCodes/delete`
    pub async fn delete_tracking_codes(
        &self,
        id: Uuid,
        position_id: Uuid,
        codes: &[TrackingCode],
        cancel: &CancellationToken,
    ) -> Result<BulkResult<TrackingCode>> {
        let (id, position_id) = (id.to_string(), position_id.to_string());
        self.endpoint
            .request(&[
                id.as_str(),
                "positions",
                position_id.as_str(),
                "trackingCodes",
                "delete",
            ])
            .delete_values(codes, cancel)
            .await
    }
}


block! {
    /// Access by external sync id: `{uri}/syncid/{syncId}`.
    SyncIds<T>
}

impl<T: DeserializeOwned> SyncIds<T> {
    /// `GET {uri}/syncid/{syncId}`
    pub async fn get(
        &self,
        sync_id: Uuid,
        params: &Params,
        cancel: &CancellationToken,
    ) -> Result<T> {
        self.endpoint
            .request_with(&["syncid", sync_id.to_string().as_str()], params)
            .get(cancel)
            .await
    }

    /// `DELETE {uri}/syncid/{syncId}`
    pub async fn delete(&self, sync_id: Uuid, cancel: &CancellationToken) -> Result<bool> {
        self.endpoint
            .request(&["syncid", sync_id.to_string().as_str()])
            .delete(cancel)
            .await
    }
}

block! {
    /// Moving documents to the recycle bin: `{uri}/{id}/trash`.
    Trash
}

impl Trash {
    /// `POST {uri}/{id}/trash`
    pub async fn move_to_trash(&self, id: Uuid, cancel: &CancellationToken) -> Result<()> {
        self.endpoint
            .request(&[id.to_string().as_str(), "trash"])
            .post_empty(cancel)
            .await
    }
}
