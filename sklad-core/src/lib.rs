//! Transport-free types for the sklad warehouse API client.
//!
//! This crate holds everything that can be decided without performing I/O:
//!
//! - [`Meta`] and the closed [`MetaType`] discriminator
//! - [`Envelope`], a partially decoded record that keeps its raw JSON and can
//!   be narrowed to a concrete entity with [`Envelope::narrow`]
//! - [`Params`], the query builder for filters, paging, expansion and search
//! - [`List`], one page of a collection
//! - [`BulkResult`], per-item outcomes of batch operations
//! - reference entity types in [`entity`]
//!
//! The HTTP layer lives in `sklad-client`, which re-exports these types.

#![warn(missing_docs)]

pub mod bulk;
pub mod entity;
pub mod envelope;
pub mod error;
pub mod list;
pub mod meta;
pub mod params;

pub use bulk::{BulkItemError, BulkOutcome, BulkResult};
pub use entity::{
    AssortmentSettings, Attribute, BarcodeRules, Bundle, CashIn, CashOut, Consignment,
    CustomEntity, CustomEntityElement, Enter, EnterPosition, EntityMetadata, File, InvoiceOut,
    InvoicePosition, NamedFilter, Operation, PaymentIn, PaymentOut, Product, Publication, Service,
    State, StateType, TrackingCode, TrackingCodeType, UniqueCodeRules, Variant,
};
pub use envelope::{Assortment, AssortmentEntity, Envelope, PaymentEntity, filter_by_type};
pub use error::{ApiError, CoreError, ENTITY_NOT_FOUND_CODE, ErrorDocument, Result};
pub use list::{Context, DEFAULT_PAGE_SIZE, List};
pub use meta::{
    MEDIA_TYPE_JSON, Meta, MetaCollection, MetaOwner, MetaType, MetaTyped, MetaWrapper,
};
pub use params::{Direction, Filter, FilterOp, Order, Params};
