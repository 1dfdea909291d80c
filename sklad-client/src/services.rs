//! Per-entity services composed from endpoint building blocks.

use crate::async_op::AsyncOperation;
use crate::client::Client;
use crate::endpoint::{
    Attributes, Crud, Endpoint, Files, Metadata, NamedFilters, Positions, Publications, States,
    SyncIds, Trash,
};
use crate::error::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sklad_core::{
    Assortment, AssortmentSettings, BulkResult, Bundle, CashIn, CashOut, Consignment,
    CustomEntity, CustomEntityElement, Enter, EnterPosition, EntityMetadata, InvoiceOut,
    InvoicePosition, List, Meta, MetaOwner, MetaType, MetaTyped, Params, PaymentIn, PaymentOut,
    Product, Service, Variant,
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Collection path of an entity kind.
fn entity_uri(meta_type: MetaType) -> String {
    format!("entity/{}", meta_type)
}

/// Forward the common entity operations to the blocks reached through the
/// given field path.
macro_rules! entity_operations {
    ($($field:ident).*) => {
        /// The collection endpoint.
        pub fn endpoint(&self) -> &Endpoint {
            &self$(.$field)*.endpoint
        }

        /// List one page of entities.
        pub async fn list(&self, params: &Params, cancel: &CancellationToken) -> Result<List<T>> {
            self$(.$field)*.crud.list(params, cancel).await
        }

        /// Submit a list query as an asynchronous task.
        pub async fn list_async(
            &self,
            params: &Params,
            cancel: &CancellationToken,
        ) -> Result<AsyncOperation<List<T>>> {
            self$(.$field)*.crud.list_async(params, cancel).await
        }

        /// Get one entity by id.
        pub async fn get_by_id(
            &self,
            id: Uuid,
            params: &Params,
            cancel: &CancellationToken,
        ) -> Result<T> {
            self$(.$field)*.crud.get_by_id(id, params, cancel).await
        }

        /// Create an entity.
        pub async fn create(
            &self,
            entity: &T,
            params: &Params,
            cancel: &CancellationToken,
        ) -> Result<T> {
            self$(.$field)*.crud.create(entity, params, cancel).await
        }

        /// Update an entity.
        pub async fn update(
            &self,
            id: Uuid,
            entity: &T,
            params: &Params,
            cancel: &CancellationToken,
        ) -> Result<T> {
            self$(.$field)*.crud.update(id, entity, params, cancel).await
        }

        /// Delete an entity.
        pub async fn delete(&self, id: Uuid, cancel: &CancellationToken) -> Result<bool> {
            self$(.$field)*.crud.delete(id, cancel).await
        }

        /// Create or update many entities in one request.
        pub async fn create_update_many(
            &self,
            entities: &[T],
            params: &Params,
            cancel: &CancellationToken,
        ) -> Result<BulkResult<T>> {
            self$(.$field)*
                .crud
                .create_update_many(entities, params, cancel)
                .await
        }

        /// Delete many entities in one request.
        pub async fn delete_many<R: MetaOwner>(
            &self,
            references: &[R],
            cancel: &CancellationToken,
        ) -> Result<BulkResult<Meta>> {
            self$(.$field)*.crud.delete_many(references, cancel).await
        }

        /// Metadata of the entity kind.
        pub async fn metadata(&self, cancel: &CancellationToken) -> Result<EntityMetadata> {
            self$(.$field)*.metadata.get(cancel).await
        }

        /// Get an entity by its external sync id.
        pub async fn get_by_sync_id(
            &self,
            sync_id: Uuid,
            params: &Params,
            cancel: &CancellationToken,
        ) -> Result<T> {
            self$(.$field)*.sync_ids.get(sync_id, params, cancel).await
        }

        /// Delete an entity by its external sync id.
        pub async fn delete_by_sync_id(
            &self,
            sync_id: Uuid,
            cancel: &CancellationToken,
        ) -> Result<bool> {
            self$(.$field)*.sync_ids.delete(sync_id, cancel).await
        }

        /// Move an entity to the recycle bin.
        pub async fn move_to_trash(&self, id: Uuid, cancel: &CancellationToken) -> Result<()> {
            self$(.$field)*.trash.move_to_trash(id, cancel).await
        }

        /// Additional field definitions.
        pub fn attributes(&self) -> &Attributes {
            &self$(.$field)*.attributes
        }

        /// Custom statuses.
        pub fn states(&self) -> &States {
            &self$(.$field)*.states
        }

        /// Attached files.
        pub fn files(&self) -> &Files {
            &self$(.$field)*.files
        }

        /// Publications.
        pub fn publications(&self) -> &Publications {
            &self$(.$field)*.publications
        }

        /// Saved filters.
        pub fn named_filters(&self) -> &NamedFilters {
            &self$(.$field)*.named_filters
        }
    };
}

/// Service for an entity kind with the common sub-resources.
#[derive(Debug, Clone)]
pub struct EntityService<T> {
    endpoint: Endpoint,
    crud: Crud<T>,
    metadata: Metadata<EntityMetadata>,
    attributes: Attributes,
    states: States,
    files: Files,
    publications: Publications,
    named_filters: NamedFilters,
    sync_ids: SyncIds<T>,
    trash: Trash,
}

impl<T> EntityService<T> {
    /// Service over `entity/{kind}` for the kind `T` is bound to.
    pub fn new(client: Client) -> Self
    where
        T: MetaTyped,
    {
        Self::with_uri(client, entity_uri(T::META_TYPE))
    }

    /// Service over an arbitrary collection path.
    pub fn with_uri(client: Client, uri: impl Into<String>) -> Self {
        let endpoint = Endpoint::new(client, uri);
        Self {
            crud: Crud::new(endpoint.clone()),
            metadata: Metadata::new(endpoint.clone()),
            attributes: Attributes::new(endpoint.clone()),
            states: States::new(endpoint.clone()),
            files: Files::new(endpoint.clone()),
            publications: Publications::new(endpoint.clone()),
            named_filters: NamedFilters::new(endpoint.clone()),
            sync_ids: SyncIds::new(endpoint.clone()),
            trash: Trash::new(endpoint.clone()),
            endpoint,
        }
    }
}

impl<T> EntityService<T>
where
    T: Serialize + DeserializeOwned,
{
    entity_operations!();
}

/// Service for a document kind: the entity operations plus positions.
#[derive(Debug, Clone)]
pub struct DocumentService<T, P> {
    entity: EntityService<T>,
    positions: Positions<P>,
}

impl<T, P> DocumentService<T, P> {
    /// Service over `entity/{kind}` for the kind `T` is bound to.
    pub fn new(client: Client) -> Self
    where
        T: MetaTyped,
    {
        Self::with_uri(client, entity_uri(T::META_TYPE))
    }

    /// Service over an arbitrary collection path.
    pub fn with_uri(client: Client, uri: impl Into<String>) -> Self {
        let entity = EntityService::with_uri(client, uri);
        Self {
            positions: Positions::new(entity.endpoint.clone()),
            entity,
        }
    }

    /// Document positions.
    pub fn positions(&self) -> &Positions<P> {
        &self.positions
    }
}

impl<T, P> DocumentService<T, P>
where
    T: Serialize + DeserializeOwned,
{
    entity_operations!(entity);
}

/// Incoming cash orders.
pub type CashInService = EntityService<CashIn>;
/// Outgoing cash orders.
pub type CashOutService = EntityService<CashOut>;
/// Incoming payments.
pub type PaymentInService = EntityService<PaymentIn>;
/// Outgoing payments.
pub type PaymentOutService = EntityService<PaymentOut>;
/// Products.
pub type ProductService = EntityService<Product>;
/// Product variants.
pub type VariantService = EntityService<Variant>;
/// Bundles.
pub type BundleService = EntityService<Bundle>;
/// Services.
pub type ServiceService = EntityService<Service>;
/// Consignments.
pub type ConsignmentService = EntityService<Consignment>;
/// Stock enter documents.
pub type EnterService = DocumentService<Enter, EnterPosition>;
/// Outgoing invoices.
pub type InvoiceOutService = DocumentService<InvoiceOut, InvoicePosition>;

/// The mixed assortment collection: `entity/assortment`.
#[derive(Debug, Clone)]
pub struct AssortmentService {
    endpoint: Endpoint,
}

impl AssortmentService {
    /// Service over `entity/assortment`.
    pub fn new(client: Client) -> Self {
        Self {
            endpoint: Endpoint::new(client, entity_uri(MetaType::Assortment)),
        }
    }

    /// List one page of products, variants, bundles, services and
    /// consignments as envelopes.
    pub async fn list(&self, params: &Params, cancel: &CancellationToken) -> Result<Assortment> {
        self.endpoint
            .request(&[])
            .with_params(params.clone())
            .get(cancel)
            .await
    }

    /// Submit an assortment query as an asynchronous task.
    pub async fn list_async(
        &self,
        params: &Params,
        cancel: &CancellationToken,
    ) -> Result<AsyncOperation<Assortment>> {
        self.endpoint
            .request(&[])
            .with_params(params.clone())
            .get_async(cancel)
            .await
    }

    /// Delete assortment entities of any kind in one request.
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

    /// Directory settings.
    pub async fn settings(&self, cancel: &CancellationToken) -> Result<AssortmentSettings> {
        self.endpoint.request(&["settings"]).get(cancel).await
    }

    /// Change directory settings.
    pub async fn update_settings(
        &self,
        settings: &AssortmentSettings,
        cancel: &CancellationToken,
    ) -> Result<AssortmentSettings> {
        self.endpoint
            .request(&["settings"])
            .put(settings, cancel)
            .await
    }
}

/// User-defined directories and their elements: `entity/customentity`.
#[derive(Debug, Clone)]
pub struct CustomEntityService {
    endpoint: Endpoint,
}

impl CustomEntityService {
    /// Service over `entity/customentity`.
    pub fn new(client: Client) -> Self {
        Self {
            endpoint: Endpoint::new(client, entity_uri(MetaType::CustomEntity)),
        }
    }

    /// Create a directory.
    pub async fn create(
        &self,
        entity: &CustomEntity,
        cancel: &CancellationToken,
    ) -> Result<CustomEntity> {
        self.endpoint.request(&[]).post(entity, cancel).await
    }

    /// Rename a directory.
    pub async fn update(
        &self,
        id: Uuid,
        entity: &CustomEntity,
        cancel: &CancellationToken,
    ) -> Result<CustomEntity> {
        self.endpoint
            .request(&[id.to_string().as_str()])
            .put(entity, cancel)
            .await
    }

    /// Delete a directory.
    pub async fn delete(&self, id: Uuid, cancel: &CancellationToken) -> Result<bool> {
        self.endpoint
            .request(&[id.to_string().as_str()])
            .delete(cancel)
            .await
    }

    /// List elements of a directory.
    pub async fn elements(
        &self,
        id: Uuid,
        params: &Params,
        cancel: &CancellationToken,
    ) -> Result<List<CustomEntityElement>> {
        self.endpoint
            .request(&[id.to_string().as_str()])
            .with_params(params.clone())
            .get(cancel)
            .await
    }

    /// Get one element.
    pub async fn element_by_id(
        &self,
        id: Uuid,
        element_id: Uuid,
        cancel: &CancellationToken,
    ) -> Result<CustomEntityElement> {
        self.endpoint
            .request(&[id.to_string().as_str(), element_id.to_string().as_str()])
            .get(cancel)
            .await
    }

    /// Add an element.
    pub async fn create_element(
        &self,
        id: Uuid,
        element: &CustomEntityElement,
        cancel: &CancellationToken,
    ) -> Result<CustomEntityElement> {
        self.endpoint
            .request(&[id.to_string().as_str()])
            .post(element, cancel)
            .await
    }

    /// Change an element.
    pub async fn update_element(
        &self,
        id: Uuid,
        element_id: Uuid,
        element: &CustomEntityElement,
        cancel: &CancellationToken,
    ) -> Result<CustomEntityElement> {
        self.endpoint
            .request(&[id.to_string().as_str(), element_id.to_string().as_str()])
            .put(element, cancel)
            .await
    }

    /// Remove an element.
    pub async fn delete_element(
        &self,
        id: Uuid,
        element_id: Uuid,
        cancel: &CancellationToken,
    ) -> Result<bool> {
        self.endpoint
            .request(&[id.to_string().as_str(), element_id.to_string().as_str()])
            .delete(cancel)
            .await
    }
}

impl Client {
    /// Products, variants, bundles, services and consignments.
    pub fn assortment(&self) -> AssortmentService {
        AssortmentService::new(self.clone())
    }

    /// Custom directories.
    pub fn custom_entity(&self) -> CustomEntityService {
        CustomEntityService::new(self.clone())
    }

    /// Products.
    pub fn product(&self) -> ProductService {
        EntityService::new(self.clone())
    }

    /// Product variants.
    pub fn variant(&self) -> VariantService {
        EntityService::new(self.clone())
    }

    /// Bundles.
    pub fn bundle(&self) -> BundleService {
        EntityService::new(self.clone())
    }

    /// Services.
    pub fn service(&self) -> ServiceService {
        EntityService::new(self.clone())
    }

    /// Consignments.
    pub fn consignment(&self) -> ConsignmentService {
        EntityService::new(self.clone())
    }

    /// Incoming cash orders.
    pub fn cash_in(&self) -> CashInService {
        EntityService::new(self.clone())
    }

    /// Outgoing cash orders.
    pub fn cash_out(&self) -> CashOutService {
        EntityService::new(self.clone())
    }

    /// Incoming payments.
    pub fn payment_in(&self) -> PaymentInService {
        EntityService::new(self.clone())
    }

    /// Outgoing payments.
    pub fn payment_out(&self) -> PaymentOutService {
        EntityService::new(self.clone())
    }

    /// Stock enter documents.
    pub fn enter(&self) -> EnterService {
        DocumentService::new(self.clone())
    }

    /// Outgoing invoices.
    pub fn invoice_out(&self) -> InvoiceOutService {
        DocumentService::new(self.clone())
    }
}
