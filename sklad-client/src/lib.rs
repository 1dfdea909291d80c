//! Type-safe async Rust client for the MoySklad JSON API.
//!
//! This crate provides the HTTP layer on top of the shared types in
//! `sklad-core`, which are re-exported here.
//!
//! # Features
//!
//! - Client with bearer token or basic authentication
//! - Generic request builder with filter, paging, expansion and search
//!   parameters
//! - Polymorphic lists narrowed to concrete entities on demand
//! - Asynchronous tasks: submit a query, then poll for the result
//! - Batch create, update and delete with per-item outcomes
//! - Per-entity services composed from reusable endpoint blocks
//! - Cancellation of every call through a `CancellationToken`
//!
//! # Example
//!
//! ```no_run
//! use sklad_client::{Client, Params};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new("https://api.moysklad.ru/api/remap/1.2")?
//!     .with_token(std::env::var("SKLAD_TOKEN")?);
//! let cancel = CancellationToken::new();
//!
//! // Fetch the first page of the assortment and keep only products
//! let page = client
//!     .assortment()
//!     .list(&Params::new().with_limit(100), &cancel)
//!     .await?;
//! for product in page.products()? {
//!     println!("{:?}", product.name);
//! }
//!
//! // Walk to the next page, if any
//! if let Some(next) = page.next_params(&Params::new().with_limit(100)) {
//!     let _more = client.assortment().list(&next, &cancel).await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```no_run
//! # use sklad_client::{Client, ClientConfig};
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::from_config(ClientConfig::from_env()?)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All operations return `Result<T, ClientError>`:
//!
//! ```no_run
//! # use sklad_client::{Client, ClientError, Params};
//! # use tokio_util::sync::CancellationToken;
//! # async fn example(client: Client, id: uuid::Uuid) -> Result<(), ClientError> {
//! # let cancel = CancellationToken::new();
//! match client.cash_out().get_by_id(id, &Params::new(), &cancel).await {
//!     Ok(cash_out) => println!("Found: {:?}", cash_out.name),
//!     Err(e) if e.is_not_found() => println!("Cash order not found"),
//!     Err(e) => println!("Error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

mod async_op;
mod bulk;
mod client;
mod config;
mod endpoint;
mod error;
mod request;
mod services;

pub use async_op::{AsyncOperation, AsyncState, DEFAULT_POLL_INTERVAL};
pub use client::Client;
pub use config::{
    ClientConfig, ClientConfigBuilder, Credentials, DEFAULT_BASE_URL, DEFAULT_TIMEOUT,
    DEFAULT_USER_AGENT,
};
pub use endpoint::{
    Attributes, Crud, Endpoint, Files, Metadata, NamedFilters, Positions, Publications, States,
    SyncIds, Trash,
};
pub use error::{ClientError, Result};
pub use request::RequestBuilder;
pub use services::{
    AssortmentService, BundleService, CashInService, CashOutService, ConsignmentService,
    CustomEntityService, DocumentService, EnterService, EntityService, InvoiceOutService,
    PaymentInService, PaymentOutService, ProductService, ServiceService, VariantService,
};

pub use sklad_core::{
    ApiError, Assortment, AssortmentEntity, AssortmentSettings, Attribute, BulkItemError,
    BulkOutcome, BulkResult, Bundle, CashIn, CashOut, Consignment, Context, CoreError,
    CustomEntity, CustomEntityElement, DEFAULT_PAGE_SIZE, Direction, ENTITY_NOT_FOUND_CODE, Enter,
    EnterPosition, EntityMetadata, Envelope, ErrorDocument, File, Filter, FilterOp, InvoiceOut,
    InvoicePosition, List, Meta, MetaCollection, MetaOwner, MetaType, MetaTyped, MetaWrapper,
    NamedFilter, Order, Params, PaymentEntity, PaymentIn, PaymentOut, Product, Publication,
    Service, State, StateType, TrackingCode, TrackingCodeType, Variant, filter_by_type,
};
