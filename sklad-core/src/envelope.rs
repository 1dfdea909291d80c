//! Polymorphic records with deferred decoding.
//!
//! Collections such as the assortment or the payments list mix several entity
//! kinds. An [`Envelope`] decodes only the fields every entity shares and keeps
//! the original JSON text, so the record can later be narrowed to its concrete
//! type without losing variant-specific fields.
//!
//! ```
//! use sklad_core::{Envelope, Product, Bundle};
//!
//! let envelope = Envelope::from_slice(br#"{
//!     "meta": {"href": "https://example.com/entity/product/1", "type": "product"},
//!     "name": "Tea",
//!     "article": "T-01"
//! }"#).unwrap();
//!
//! assert!(envelope.narrow::<Bundle>().unwrap().is_none());
//! let product = envelope.narrow::<Product>().unwrap().unwrap();
//! assert_eq!(product.article.as_deref(), Some("T-01"));
//! ```

use crate::entity::{
    Bundle, CashIn, CashOut, Consignment, PaymentIn, PaymentOut, Product, Service, Variant,
};
use crate::error::{CoreError, Result};
use crate::list::List;
use crate::meta::{Meta, MetaOwner, MetaType, MetaTyped};
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::value::RawValue;
use uuid::Uuid;

/// Assortment page: products, variants, bundles, services and consignments.
pub type Assortment = List<Envelope>;

/// A partially decoded entity that owns its raw JSON.
#[derive(Debug, Clone)]
pub struct Envelope {
    meta: Meta,
    id: Option<Uuid>,
    account_id: Option<Uuid>,
    code: Option<String>,
    description: Option<String>,
    external_code: Option<String>,
    name: Option<String>,
    raw: Box<RawValue>,
}

/// Fields decoded eagerly from every entity.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommonFields {
    meta: Meta,
    #[serde(default)]
    id: Option<Uuid>,
    #[serde(default)]
    account_id: Option<Uuid>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    external_code: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

impl Envelope {
    /// Decode an envelope from JSON bytes.
    ///
    /// # Errors
    ///
    /// Fails when the input is not a JSON object with a valid `meta` block.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let raw: Box<RawValue> = serde_json::from_slice(bytes)?;
        Self::from_raw(raw)
    }

    /// Decode an envelope from an already isolated raw JSON value.
    ///
    /// # Errors
    ///
    /// Fails when the value is not an object with a valid `meta` block.
    pub fn from_raw(raw: Box<RawValue>) -> Result<Self> {
        let common: CommonFields = serde_json::from_str(raw.get())?;
        Ok(Self {
            meta: common.meta,
            id: common.id,
            account_id: common.account_id,
            code: common.code,
            description: common.description,
            external_code: common.external_code,
            name: common.name,
            raw,
        })
    }

    /// Entity metadata.
    #[must_use]
    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// Entity id.
    #[must_use]
    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    /// Account id.
    #[must_use]
    pub fn account_id(&self) -> Option<Uuid> {
        self.account_id
    }

    /// Code.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Comment.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// External code.
    #[must_use]
    pub fn external_code(&self) -> Option<&str> {
        self.external_code.as_deref()
    }

    /// Name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Validated discriminator.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownType`] for kinds outside the closed set.
    pub fn meta_type(&self) -> Result<MetaType> {
        self.meta.resolve_type()
    }

    /// The JSON exactly as received.
    #[must_use]
    pub fn raw(&self) -> &str {
        self.raw.get()
    }

    /// The JSON exactly as received, as bytes.
    #[must_use]
    pub fn raw_bytes(&self) -> &[u8] {
        self.raw.get().as_bytes()
    }

    /// Give up the envelope and keep only the raw JSON.
    #[must_use]
    pub fn into_raw(self) -> Box<RawValue> {
        self.raw
    }

    /// Narrow to `V` if the discriminator matches.
    ///
    /// A different kind (including an unknown one) yields `Ok(None)`; a
    /// matching kind whose payload does not decode into `V` is an error.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Decode`] on malformed variant fields.
    pub fn narrow<V>(&self) -> Result<Option<V>>
    where
        V: MetaTyped + DeserializeOwned,
    {
        if !self.meta.is(V::META_TYPE) {
            return Ok(None);
        }
        self.decode().map(Some)
    }

    /// Decode the raw payload without checking the discriminator.
    fn decode<V: DeserializeOwned>(&self) -> Result<V> {
        serde_json::from_str(self.raw.get()).map_err(CoreError::Decode)
    }

    /// Narrow to [`Product`].
    ///
    /// # Errors
    ///
    /// See [`Envelope::narrow`].
    pub fn as_product(&self) -> Result<Option<Product>> {
        self.narrow()
    }

    /// Narrow to [`Variant`].
    ///
    /// # Errors
    ///
    /// See [`Envelope::narrow`].
    pub fn as_variant(&self) -> Result<Option<Variant>> {
        self.narrow()
    }

    /// Narrow to [`Bundle`].
    ///
    /// # Errors
    ///
    /// See [`Envelope::narrow`].
    pub fn as_bundle(&self) -> Result<Option<Bundle>> {
        self.narrow()
    }

    /// Narrow to [`Service`].
    ///
    /// # Errors
    ///
    /// See [`Envelope::narrow`].
    pub fn as_service(&self) -> Result<Option<Service>> {
        self.narrow()
    }

    /// Narrow to [`Consignment`].
    ///
    /// # Errors
    ///
    /// See [`Envelope::narrow`].
    pub fn as_consignment(&self) -> Result<Option<Consignment>> {
        self.narrow()
    }

    /// Narrow to [`CashIn`].
    ///
    /// # Errors
    ///
    /// See [`Envelope::narrow`].
    pub fn as_cash_in(&self) -> Result<Option<CashIn>> {
        self.narrow()
    }

    /// Narrow to [`CashOut`].
    ///
    /// # Errors
    ///
    /// See [`Envelope::narrow`].
    pub fn as_cash_out(&self) -> Result<Option<CashOut>> {
        self.narrow()
    }

    /// Narrow to [`PaymentIn`].
    ///
    /// # Errors
    ///
    /// See [`Envelope::narrow`].
    pub fn as_payment_in(&self) -> Result<Option<PaymentIn>> {
        self.narrow()
    }

    /// Narrow to [`PaymentOut`].
    ///
    /// # Errors
    ///
    /// See [`Envelope::narrow`].
    pub fn as_payment_out(&self) -> Result<Option<PaymentOut>> {
        self.narrow()
    }
}

impl PartialEq for Envelope {
    fn eq(&self, other: &Self) -> bool {
        self.raw.get() == other.raw.get()
    }
}

impl MetaOwner for Envelope {
    fn meta(&self) -> Option<&Meta> {
        Some(&self.meta)
    }
}

impl<'de> Deserialize<'de> for Envelope {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        Self::from_raw(raw).map_err(de::Error::custom)
    }
}

impl Serialize for Envelope {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.raw.serialize(serializer)
    }
}

/// Keep the envelopes whose kind is `V`, decoded, in their original order.
///
/// # Errors
///
/// Returns [`CoreError::Decode`] if a matching envelope is malformed.
pub fn filter_by_type<'a, V, I>(envelopes: I) -> Result<Vec<V>>
where
    V: MetaTyped + DeserializeOwned,
    I: IntoIterator<Item = &'a Envelope>,
{
    let mut out = Vec::new();
    for envelope in envelopes {
        if let Some(value) = envelope.narrow::<V>()? {
            out.push(value);
        }
    }
    Ok(out)
}

impl List<Envelope> {
    /// Rows of kind `V`, decoded.
    ///
    /// # Errors
    ///
    /// See [`filter_by_type`].
    pub fn filter_by_type<V>(&self) -> Result<Vec<V>>
    where
        V: MetaTyped + DeserializeOwned,
    {
        filter_by_type(&self.rows)
    }

    /// Products among the rows.
    ///
    /// # Errors
    ///
    /// See [`filter_by_type`].
    pub fn products(&self) -> Result<Vec<Product>> {
        self.filter_by_type()
    }

    /// Variants among the rows.
    ///
    /// # Errors
    ///
    /// See [`filter_by_type`].
    pub fn variants(&self) -> Result<Vec<Variant>> {
        self.filter_by_type()
    }

    /// Bundles among the rows.
    ///
    /// # Errors
    ///
    /// See [`filter_by_type`].
    pub fn bundles(&self) -> Result<Vec<Bundle>> {
        self.filter_by_type()
    }

    /// Services among the rows.
    ///
    /// # Errors
    ///
    /// See [`filter_by_type`].
    pub fn services(&self) -> Result<Vec<Service>> {
        self.filter_by_type()
    }

    /// Consignments among the rows.
    ///
    /// # Errors
    ///
    /// See [`filter_by_type`].
    pub fn consignments(&self) -> Result<Vec<Consignment>> {
        self.filter_by_type()
    }
}

/// A decoded assortment member.
#[derive(Debug, Clone, PartialEq)]
pub enum AssortmentEntity {
    /// Product.
    Product(Product),
    /// Variant.
    Variant(Variant),
    /// Bundle.
    Bundle(Bundle),
    /// Service.
    Service(Service),
    /// Consignment.
    Consignment(Consignment),
}

impl TryFrom<&Envelope> for AssortmentEntity {
    type Error = CoreError;

    fn try_from(envelope: &Envelope) -> Result<Self> {
        match envelope.meta_type()? {
            MetaType::Product => envelope.decode().map(Self::Product),
            MetaType::Variant => envelope.decode().map(Self::Variant),
            MetaType::Bundle => envelope.decode().map(Self::Bundle),
            MetaType::Service => envelope.decode().map(Self::Service),
            MetaType::Consignment => envelope.decode().map(Self::Consignment),
            other => Err(CoreError::UnexpectedType {
                expected: "assortment entity",
                actual: other,
            }),
        }
    }
}

/// A decoded payment document.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentEntity {
    /// Incoming cash order.
    CashIn(CashIn),
    /// Outgoing cash order.
    CashOut(CashOut),
    /// Incoming bank payment.
    PaymentIn(PaymentIn),
    /// Outgoing bank payment.
    PaymentOut(PaymentOut),
}

impl TryFrom<&Envelope> for PaymentEntity {
    type Error = CoreError;

    fn try_from(envelope: &Envelope) -> Result<Self> {
        match envelope.meta_type()? {
            MetaType::CashIn => envelope.decode().map(Self::CashIn),
            MetaType::CashOut => envelope.decode().map(Self::CashOut),
            MetaType::PaymentIn => envelope.decode().map(Self::PaymentIn),
            MetaType::PaymentOut => envelope.decode().map(Self::PaymentOut),
            other => Err(CoreError::UnexpectedType {
                expected: "payment document",
                actual: other,
            }),
        }
    }
}
