//! Payment documents: cash orders and bank payments.

use crate::meta::{Meta, MetaType, MetaWrapper};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Link from a payment to the document it settles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Linked document.
    pub meta: Meta,
    /// Amount of the payment applied to the document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_sum: Option<f64>,
}

/// Incoming cash order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashIn {
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
    /// Amount in minor units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sum: Option<f64>,
    /// Counterparty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<MetaWrapper>,
    /// Legal entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<MetaWrapper>,
    /// Payment purpose.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_purpose: Option<String>,
    /// Settled documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operations: Option<Vec<Operation>>,
}

/// Outgoing cash order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashOut {
    /// Entity metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    /// Entity id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Synchronisation id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_id: Option<Uuid>,
    /// Document number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Document date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moment: Option<String>,
    /// Whether the document is posted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicable: Option<bool>,
    /// Amount in minor units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sum: Option<f64>,
    /// Counterparty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<MetaWrapper>,
    /// Legal entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<MetaWrapper>,
    /// Expense item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense_item: Option<MetaWrapper>,
    /// Custom status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<MetaWrapper>,
    /// Payment purpose.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_purpose: Option<String>,
    /// Settled documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operations: Option<Vec<Operation>>,
}

/// Incoming bank payment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIn {
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
    /// Amount in minor units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sum: Option<f64>,
    /// Counterparty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<MetaWrapper>,
    /// Legal entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<MetaWrapper>,
    /// Incoming document number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incoming_number: Option<String>,
    /// Settled documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operations: Option<Vec<Operation>>,
}

/// Outgoing bank payment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOut {
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
    /// Amount in minor units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sum: Option<f64>,
    /// VAT amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat_sum: Option<f64>,
    /// Counterparty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<MetaWrapper>,
    /// Counterparty bank account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_account: Option<MetaWrapper>,
    /// Legal entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<MetaWrapper>,
    /// Legal entity bank account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_account: Option<MetaWrapper>,
    /// Expense item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense_item: Option<MetaWrapper>,
    /// Payment purpose.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_purpose: Option<String>,
    /// Settled documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operations: Option<Vec<Operation>>,
}

impl PaymentOut {
    /// Link the payment to the documents it settles.
    pub fn bind_documents<I>(&mut self, documents: I) -> &mut Self
    where
        I: IntoIterator<Item = Meta>,
    {
        let operations = self.operations.get_or_insert_with(Vec::new);
        operations.extend(documents.into_iter().map(|meta| Operation {
            meta,
            linked_sum: None,
        }));
        self
    }
}

impl_meta! {
    CashIn => MetaType::CashIn,
    CashOut => MetaType::CashOut,
    PaymentIn => MetaType::PaymentIn,
    PaymentOut => MetaType::PaymentOut,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_documents_appends() {
        let mut payment = PaymentOut::default();
        payment
            .bind_documents([Meta::new("https://example.com/entity/enter/1", MetaType::Enter)])
            .bind_documents([Meta::new(
                "https://example.com/entity/invoiceout/2",
                MetaType::InvoiceOut,
            )]);

        let operations = payment.operations.unwrap();
        assert_eq!(operations.len(), 2);
        assert!(operations[0].linked_sum.is_none());
    }

    #[test]
    fn test_unset_fields_are_not_serialized() {
        let cash_out = CashOut {
            name: Some("00001".to_string()),
            sum: Some(1500.0),
            ..CashOut::default()
        };
        let value = serde_json::to_value(&cash_out).unwrap();
        assert_eq!(value, serde_json::json!({"name": "00001", "sum": 1500.0}));
    }
}
