//! Auction invoice data models, shaped like the persisted invoice document.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One auction transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Invoice {
    /// Vendor-assigned invoice number, kept as an opaque string.
    pub invoice_number: String,

    /// Identifier of the whole auction event.
    pub auction_lot: u32,

    /// Invoice time, normalized to US Eastern.
    pub time: Option<DateTime<FixedOffset>>,

    pub buyer_name: String,
    pub buyer_email: String,
    pub buyer_address: String,
    pub shipping_address: String,
    pub buyer_phone: String,

    /// Whether the buyer chose shipping over pickup.
    pub is_shipping: bool,

    pub status: InvoiceStatus,
    pub payment_method: PaymentMethod,

    pub invoice_total: Decimal,
    pub remaining_balance: Decimal,
    pub tax: Decimal,

    /// Buyer's premium. Zero when the footer carries no premium line.
    pub buyers_premium: Decimal,

    /// Sum of the items' handling fees.
    pub total_handling_fee: Decimal,

    pub items: Vec<InvoiceItem>,

    /// Append-only lifecycle log.
    #[serde(rename = "invoiceEvent")]
    pub events: Vec<InvoiceEvent>,

    /// CDN link of the uploaded PDF, filled by the upload step.
    pub invoice_cdn: String,

    /// CDN link of the captured signature, filled by the signature step.
    pub signature_cdn: String,
}

/// A single line item of an auction lot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<u64>,

    pub msrp: Decimal,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shelf_location: Option<String>,

    /// Per-item identifier within the auction lot.
    pub item_lot: u32,

    #[serde(rename = "desc", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "bid", skip_serializing_if = "Option::is_none")]
    pub bid_amount: Option<Decimal>,

    #[serde(rename = "unit")]
    pub unit_quantity: u32,

    /// Unit quantity times bid; computed by the caller, never by the parser.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extended_price: Option<Decimal>,

    pub handling_fee: Decimal,
}

/// Immutable lifecycle record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceEvent {
    pub title: String,
    #[serde(rename = "desc")]
    pub description: String,
    pub time: Option<DateTime<FixedOffset>>,
}

impl InvoiceEvent {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        time: Option<DateTime<FixedOffset>>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            time,
        }
    }

    /// The event recorded when an invoice is first parsed.
    pub fn issued(status: InvoiceStatus, time: Option<DateTime<FixedOffset>>) -> Self {
        match status {
            InvoiceStatus::Paid => Self::new("Invoice Paid", "Invoice paid on issue", time),
            _ => Self::new("Invoice Unpaid", "Invoice unpaid on issue", time),
        }
    }

    /// Whether this is one of the issue events appended at parse time.
    pub fn is_issue(&self) -> bool {
        self.title == "Invoice Paid" || self.title == "Invoice Unpaid"
    }
}

/// Payment status of an invoice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    #[default]
    Unpaid,
    Paid,
    Refund,
    PickedUp,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Unpaid => "unpaid",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Refund => "refund",
            InvoiceStatus::PickedUp => "pickedup",
        }
    }
}

/// How the invoice was settled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "")]
    Unset,
    Cash,
    Card,
    ETransfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Unset => "",
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::ETransfer => "etransfer",
        }
    }
}

impl Invoice {
    /// Create a new empty invoice.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of the items' handling fees.
    pub fn item_handling_fee_sum(&self) -> Decimal {
        self.items.iter().map(|i| i.handling_fee).sum()
    }

    /// Check the invoice for gaps a human should review.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.invoice_number.is_empty() {
            issues.push("Missing invoice number".to_string());
        }

        if self.buyer_email.is_empty() {
            issues.push("Missing buyer email".to_string());
        }

        if self.time.is_none() {
            issues.push("Missing invoice time".to_string());
        }

        if self.items.is_empty() {
            issues.push("No line items".to_string());
        }

        if self.invoice_total.is_zero() {
            issues.push("Invoice total is zero".to_string());
        }

        let fee_sum = self.item_handling_fee_sum();
        if fee_sum != self.total_handling_fee {
            issues.push(format!(
                "Item handling fees ({}) differ from total handling fee ({})",
                fee_sum, self.total_handling_fee
            ));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_string(&InvoiceStatus::PickedUp).unwrap(), "\"pickedup\"");
        assert_eq!(serde_json::to_string(&InvoiceStatus::Unpaid).unwrap(), "\"unpaid\"");
        assert_eq!(
            serde_json::from_str::<InvoiceStatus>("\"refund\"").unwrap(),
            InvoiceStatus::Refund
        );
    }

    #[test]
    fn test_payment_method_serialization() {
        assert_eq!(serde_json::to_string(&PaymentMethod::Unset).unwrap(), "\"\"");
        assert_eq!(serde_json::to_string(&PaymentMethod::ETransfer).unwrap(), "\"etransfer\"");
        assert_eq!(
            serde_json::from_str::<PaymentMethod>("\"card\"").unwrap(),
            PaymentMethod::Card
        );
        assert_eq!(PaymentMethod::Cash.as_str(), "cash");
    }

    #[test]
    fn test_issue_event() {
        let paid = InvoiceEvent::issued(InvoiceStatus::Paid, None);
        assert_eq!(paid.title, "Invoice Paid");
        assert_eq!(paid.description, "Invoice paid on issue");
        assert!(paid.is_issue());

        let unpaid = InvoiceEvent::issued(InvoiceStatus::Unpaid, None);
        assert_eq!(unpaid.title, "Invoice Unpaid");
        assert!(!InvoiceEvent::new("Refund", "Refund: 1 Items", None).is_issue());
    }

    #[test]
    fn test_validate_reports_gaps() {
        let invoice = Invoice::new();
        let issues = invoice.validate();

        assert!(issues.contains(&"Missing invoice number".to_string()));
        assert!(issues.contains(&"No line items".to_string()));
        assert!(issues.contains(&"Invoice total is zero".to_string()));
    }

    #[test]
    fn test_validate_handling_fee_mismatch() {
        let mut invoice = Invoice::new();
        invoice.items.push(InvoiceItem {
            handling_fee: Decimal::new(150, 2),
            ..InvoiceItem::default()
        });
        invoice.total_handling_fee = Decimal::new(100, 2);

        let issues = invoice.validate();
        assert!(issues.iter().any(|i| i.starts_with("Item handling fees (1.50)")));
    }

    #[test]
    fn test_item_field_names() {
        let item = InvoiceItem {
            sku: Some(1976),
            item_lot: 528,
            unit_quantity: 1,
            ..InvoiceItem::default()
        };
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["sku"], 1976);
        assert_eq!(json["itemLot"], 528);
        assert_eq!(json["unit"], 1);
        assert!(json.get("desc").is_none());
    }
}
