//! Stock and sales documents with positions.

use crate::list::List;
use crate::meta::{Meta, MetaType, MetaWrapper};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stock enter document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enter {
    /// Entity metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    /// Entity id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Document number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Document date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moment: Option<String>,
    /// Whether the document is posted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicable: Option<bool>,
    /// Legal entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<MetaWrapper>,
    /// Warehouse.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<MetaWrapper>,
    /// Total amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sum: Option<f64>,
    /// Positions; only rows when expanded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positions: Option<List<EnterPosition>>,
}

/// Position of a stock enter document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnterPosition {
    /// Position metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    /// Position id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Product, variant or consignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assortment: Option<MetaWrapper>,
    /// Quantity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    /// Price in minor units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Overhead share.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overhead: Option<f64>,
}

/// Outgoing invoice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceOut {
    /// Entity metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    /// Entity id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Document number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Document date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moment: Option<String>,
    /// Planned payment date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_planned_moment: Option<String>,
    /// Counterparty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<MetaWrapper>,
    /// Legal entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<MetaWrapper>,
    /// Total amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sum: Option<f64>,
    /// Amount paid so far.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payed_sum: Option<f64>,
    /// Positions; only rows when expanded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positions: Option<List<InvoicePosition>>,
}

/// Position of an invoice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePosition {
    /// Position metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    /// Position id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Product, variant, service or bundle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assortment: Option<MetaWrapper>,
    /// Quantity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    /// Price in minor units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Discount percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    /// VAT percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat: Option<u32>,
}

/// Packaging level of a tracking code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackingCodeType {
    /// Single item mark.
    TrackingCode,
    /// Consumer package.
    ConsumerPack,
    /// Transport package.
    TransportPack,
}

/// Marking code of a document position.
///
/// Codes are identified by `cis` rather than by meta; package codes nest the
/// codes they contain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingCode {
    /// Code id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Code value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cis: Option<String>,
    /// Packaging level.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TrackingCodeType>,
    /// Nested codes of a package.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_codes: Option<Vec<TrackingCode>>,
}

impl TrackingCode {
    /// Create a code of the given level.
    #[must_use]
    pub fn new(cis: impl Into<String>, kind: TrackingCodeType) -> Self {
        Self {
            cis: Some(cis.into()),
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Add a nested code.
    #[must_use]
    pub fn with_nested(mut self, code: TrackingCode) -> Self {
        self.tracking_codes.get_or_insert_with(Vec::new).push(code);
        self
    }
}

impl_meta! {
    Enter => MetaType::Enter,
    EnterPosition => MetaType::EnterPosition,
    InvoiceOut => MetaType::InvoiceOut,
    InvoicePosition => MetaType::InvoicePosition,
}
