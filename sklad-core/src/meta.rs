//! Entity metadata and the closed set of entity kinds.
//!
//! Every remote object carries a `meta` block with its `href` and `type`.
//! The `type` string is the only reliable signal for telling entity kinds
//! apart, so it is kept verbatim in [`Meta`] and validated on demand through
//! [`Meta::resolve_type`].

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Default media type of entity metadata.
pub const MEDIA_TYPE_JSON: &str = "application/json";

/// Known entity kinds (the `meta.type` discriminator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetaType {
    /// Assortment (products, variants, bundles, services, consignments).
    Assortment,
    /// Assortment directory settings.
    AssortmentSettings,
    /// Product.
    Product,
    /// Product variant.
    Variant,
    /// Bundle of products.
    Bundle,
    /// Service.
    Service,
    /// Consignment (product series).
    Consignment,
    /// Product folder.
    ProductFolder,
    /// Incoming cash order.
    CashIn,
    /// Outgoing cash order.
    CashOut,
    /// Incoming payment.
    PaymentIn,
    /// Outgoing payment.
    PaymentOut,
    /// Stock enter document.
    Enter,
    /// Stock enter position.
    EnterPosition,
    /// Outgoing invoice.
    InvoiceOut,
    /// Invoice position.
    InvoicePosition,
    /// Custom directory and its elements.
    CustomEntity,
    /// Counterparty.
    Counterparty,
    /// Legal entity of the account.
    Organization,
    /// Employee.
    Employee,
    /// Employee group.
    Group,
    /// Warehouse.
    Store,
    /// Currency.
    Currency,
    /// Project.
    Project,
    /// Contract.
    Contract,
    /// Sales channel.
    SalesChannel,
    /// Expense item.
    ExpenseItem,
    /// Unit of measure.
    Uom,
    /// Custom status of an entity.
    State,
    /// Additional field definition.
    #[serde(rename = "attributemetadata")]
    Attribute,
    /// File attached to an entity.
    Files,
    /// Document publication.
    #[serde(rename = "operationpublication")]
    Publication,
    /// Saved filter.
    NamedFilter,
    /// Asynchronous task.
    Async,
}

impl MetaType {
    /// Every known entity kind.
    pub const ALL: [MetaType; 34] = [
        Self::Assortment,
        Self::AssortmentSettings,
        Self::Product,
        Self::Variant,
        Self::Bundle,
        Self::Service,
        Self::Consignment,
        Self::ProductFolder,
        Self::CashIn,
        Self::CashOut,
        Self::PaymentIn,
        Self::PaymentOut,
        Self::Enter,
        Self::EnterPosition,
        Self::InvoiceOut,
        Self::InvoicePosition,
        Self::CustomEntity,
        Self::Counterparty,
        Self::Organization,
        Self::Employee,
        Self::Group,
        Self::Store,
        Self::Currency,
        Self::Project,
        Self::Contract,
        Self::SalesChannel,
        Self::ExpenseItem,
        Self::Uom,
        Self::State,
        Self::Attribute,
        Self::Files,
        Self::Publication,
        Self::NamedFilter,
        Self::Async,
    ];

    /// Wire name of the entity kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assortment => "assortment",
            Self::AssortmentSettings => "assortmentsettings",
            Self::Product => "product",
            Self::Variant => "variant",
            Self::Bundle => "bundle",
            Self::Service => "service",
            Self::Consignment => "consignment",
            Self::ProductFolder => "productfolder",
            Self::CashIn => "cashin",
            Self::CashOut => "cashout",
            Self::PaymentIn => "paymentin",
            Self::PaymentOut => "paymentout",
            Self::Enter => "enter",
            Self::EnterPosition => "enterposition",
            Self::InvoiceOut => "invoiceout",
            Self::InvoicePosition => "invoiceposition",
            Self::CustomEntity => "customentity",
            Self::Counterparty => "counterparty",
            Self::Organization => "organization",
            Self::Employee => "employee",
            Self::Group => "group",
            Self::Store => "store",
            Self::Currency => "currency",
            Self::Project => "project",
            Self::Contract => "contract",
            Self::SalesChannel => "saleschannel",
            Self::ExpenseItem => "expenseitem",
            Self::Uom => "uom",
            Self::State => "state",
            Self::Attribute => "attributemetadata",
            Self::Files => "files",
            Self::Publication => "operationpublication",
            Self::NamedFilter => "namedfilter",
            Self::Async => "async",
        }
    }
}

impl fmt::Display for MetaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetaType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::UnknownType(s.to_string()))
    }
}

/// Metadata of a single remote entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    /// Link to the entity.
    pub href: String,
    /// Entity kind as received; see [`Meta::resolve_type`].
    #[serde(rename = "type")]
    pub kind: String,
    /// Media type of the entity representation.
    #[serde(default = "default_media_type")]
    pub media_type: String,
    /// Link to the metadata of the entity kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_href: Option<String>,
    /// Link to the entity in the web UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid_href: Option<String>,
    /// Download link (files and images).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_href: Option<String>,
    /// Size of a nested collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Page size of a nested collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    /// Page offset of a nested collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

fn default_media_type() -> String {
    MEDIA_TYPE_JSON.to_string()
}

impl Meta {
    /// Create metadata for an entity of a known kind.
    #[must_use]
    pub fn new(href: impl Into<String>, meta_type: MetaType) -> Self {
        Self {
            href: href.into(),
            kind: meta_type.as_str().to_string(),
            media_type: default_media_type(),
            metadata_href: None,
            uuid_href: None,
            download_href: None,
            size: None,
            limit: None,
            offset: None,
        }
    }

    /// Validate the discriminator against the closed set of entity kinds.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownType`] when the `type` string is not known.
    pub fn resolve_type(&self) -> Result<MetaType> {
        self.kind.parse()
    }

    /// Whether the discriminator equals `meta_type`.
    #[must_use]
    pub fn is(&self, meta_type: MetaType) -> bool {
        self.kind == meta_type.as_str()
    }

    /// Entity id taken from the last segment of `href`.
    #[must_use]
    pub fn id(&self) -> Option<Uuid> {
        let path = self.href.split(['?', '#']).next().unwrap_or_default();
        path.rsplit('/').next().and_then(|s| Uuid::parse_str(s).ok())
    }

    /// Wrap into the `{"meta": ...}` reference form.
    #[must_use]
    pub fn wrap(self) -> MetaWrapper {
        MetaWrapper { meta: self }
    }
}

/// Reference to an entity by metadata only: `{"meta": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaWrapper {
    /// Entity metadata.
    pub meta: Meta,
}

/// Paging metadata of a collection response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaCollection {
    /// Link to the collection.
    #[serde(default)]
    pub href: String,
    /// Kind of entities in the collection.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Media type of the collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    /// Total number of entities matching the query.
    #[serde(default)]
    pub size: u64,
    /// Page size the server applied.
    #[serde(default)]
    pub limit: u64,
    /// Offset of the first row of this page.
    #[serde(default)]
    pub offset: u64,
    /// Link to the next page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_href: Option<String>,
    /// Link to the previous page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_href: Option<String>,
}

/// Types whose values can be referenced by their metadata.
pub trait MetaOwner {
    /// Metadata of this value, if it has been assigned one.
    fn meta(&self) -> Option<&Meta>;

    /// Meta-only projection for use as a reference.
    fn meta_wrapper(&self) -> Option<MetaWrapper> {
        self.meta().cloned().map(Meta::wrap)
    }
}

impl MetaOwner for Meta {
    fn meta(&self) -> Option<&Meta> {
        Some(self)
    }
}

impl MetaOwner for MetaWrapper {
    fn meta(&self) -> Option<&Meta> {
        Some(&self.meta)
    }
}

impl<T: MetaOwner + ?Sized> MetaOwner for &T {
    fn meta(&self) -> Option<&Meta> {
        (**self).meta()
    }
}

/// Concrete entity types statically bound to one discriminator.
pub trait MetaTyped {
    /// The discriminator carried by every value of this type.
    const META_TYPE: MetaType;
}
