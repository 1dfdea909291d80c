//! Reference entity types.
//!
//! Each type models a representative subset of the fields the remote service
//! returns. Fields not modelled here are still reachable through the raw
//! payload of an [`Envelope`](crate::Envelope).

/// Implement [`MetaTyped`](crate::MetaTyped) and [`MetaOwner`](crate::MetaOwner)
/// for types with an `Option<Meta>` field named `meta`.
macro_rules! impl_meta {
    ($($ty:ty => $meta_type:expr),+ $(,)?) => {
        $(
            impl $crate::meta::MetaTyped for $ty {
                const META_TYPE: $crate::meta::MetaType = $meta_type;
            }

            impl $crate::meta::MetaOwner for $ty {
                fn meta(&self) -> Option<&$crate::meta::Meta> {
                    self.meta.as_ref()
                }
            }
        )+
    };
}

mod assortment;
mod custom;
mod document;
mod payment;
mod subresource;

pub use assortment::{
    AssortmentSettings, BarcodeRules, Bundle, Consignment, Product, Service, UniqueCodeRules,
    Variant,
};
pub use custom::{CustomEntity, CustomEntityElement};
pub use document::{
    Enter, EnterPosition, InvoiceOut, InvoicePosition, TrackingCode, TrackingCodeType,
};
pub use payment::{CashIn, CashOut, Operation, PaymentIn, PaymentOut};
pub use subresource::{
    Attribute, EntityMetadata, File, NamedFilter, Publication, State, StateType,
};
