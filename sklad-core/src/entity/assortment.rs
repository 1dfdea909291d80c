//! Assortment members: products, variants, bundles, services, consignments.

use crate::meta::{Meta, MetaType, MetaWrapper};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Entity metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    /// Entity id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Account id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<Uuid>,
    /// Name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// External code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_code: Option<String>,
    /// Comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Article number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article: Option<String>,
    /// Whether the product is archived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    /// Weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Volume.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    /// Folder path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_name: Option<String>,
    /// Number of variants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants_count: Option<u32>,
    /// Unit of measure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uom: Option<MetaWrapper>,
}

/// Product variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    /// Entity metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    /// Entity id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// External code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_code: Option<String>,
    /// Whether the variant is archived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    /// Parent product.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<MetaWrapper>,
}

/// Bundle of products.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    /// Entity metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    /// Entity id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// External code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_code: Option<String>,
    /// Article number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article: Option<String>,
    /// Whether the bundle is archived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    /// Bundle components collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<MetaWrapper>,
}

/// Service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Entity metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    /// Entity id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// External code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_code: Option<String>,
    /// Whether the service is archived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    /// Minimum price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<serde_json::Value>,
}

/// Consignment (product series).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consignment {
    /// Entity metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    /// Entity id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// External code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_code: Option<String>,
    /// Series label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Product or variant the series belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assortment: Option<MetaWrapper>,
}

/// Assortment directory settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssortmentSettings {
    /// Settings metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    /// Barcode rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode_rules: Option<BarcodeRules>,
    /// Code uniqueness rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_code_rules: Option<UniqueCodeRules>,
    /// Create new documents as shared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_shared: Option<bool>,
}

/// Barcode generation rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeRules {
    /// Generate EAN13 barcodes for new entities.
    #[serde(rename = "fillEAN13Barcode", default, skip_serializing_if = "Option::is_none")]
    pub fill_ean13_barcode: Option<bool>,
    /// Use weight barcode prefixes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_barcode: Option<bool>,
    /// Weight barcode prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_barcode_prefix: Option<u32>,
}

/// Code uniqueness rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniqueCodeRules {
    /// Check code uniqueness.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_unique_code: Option<bool>,
    /// Fill unique codes automatically.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_unique_code: Option<bool>,
}

impl_meta! {
    Product => MetaType::Product,
    Variant => MetaType::Variant,
    Bundle => MetaType::Bundle,
    Service => MetaType::Service,
    Consignment => MetaType::Consignment,
    AssortmentSettings => MetaType::AssortmentSettings,
}
