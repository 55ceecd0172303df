//! Buyer identity, timing, and payment status from the invoice header.

use chrono::{DateTime, FixedOffset};
use tracing::debug;

use crate::models::invoice::{InvoiceEvent, InvoiceStatus, PaymentMethod};

use super::rules::{
    extract_invoice_time, normalize_phone, split_name_address, Extracted, AUCTION_LOT,
    INVOICE_NUMBER, PAID_NAME_ADDRESS, PHONE, SHIP_TO_EMAIL, SOLD_TO_EMAIL, SOLD_TO_SHIP_TO,
    UNPAID_NAME_ADDRESS,
};

const SHIP_TO: &str = "SHIP TO:";
const PAID_IN_FULL: &str = "PAID IN FULL";
const CARD_AUTH: &str = "Auth#";

/// Fields read from the header region.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderFields {
    pub invoice_number: String,
    pub auction_lot: u32,
    pub time: Option<DateTime<FixedOffset>>,
    pub buyer_name: String,
    pub buyer_email: String,
    pub buyer_address: String,
    pub shipping_address: String,
    pub buyer_phone: String,
    pub is_shipping: bool,
    pub status: InvoiceStatus,
    pub payment_method: PaymentMethod,
    /// The single issue event.
    pub events: Vec<InvoiceEvent>,
}

/// Extract header fields. Never fails; misses become diagnostics.
pub fn extract_header(header: &str) -> Extracted<HeaderFields> {
    let mut result = Extracted::new(HeaderFields::default());

    extract_identity(header, &mut result);
    extract_buyer_contact(header, &mut result);

    let paid = header.contains(PAID_IN_FULL);
    let fields = &mut result.value;
    fields.status = if paid {
        InvoiceStatus::Paid
    } else {
        InvoiceStatus::Unpaid
    };
    if header.contains(CARD_AUTH) {
        fields.payment_method = PaymentMethod::Card;
    }

    extract_name_address(header, paid, &mut result);

    match PHONE.captures(header) {
        Some(caps) => result.value.buyer_phone = normalize_phone(&caps[1]),
        None => result.warn("buyerPhone", "no \"Phone:\" ... \"#\" run"),
    }

    result.value.time = extract_invoice_time(header);
    if result.value.time.is_none() {
        result.warn("time", "no parseable invoice time");
    }

    let event = InvoiceEvent::issued(result.value.status, result.value.time);
    result.value.events.push(event);

    debug!(
        "Header: invoice {:?}, auction lot {}, {:?}, shipping={}",
        result.value.invoice_number,
        result.value.auction_lot,
        result.value.status,
        result.value.is_shipping
    );

    result
}

fn extract_identity(header: &str, result: &mut Extracted<HeaderFields>) {
    match AUCTION_LOT.captures(header) {
        Some(caps) => match caps[1].parse::<u32>() {
            Ok(lot) => result.value.auction_lot = lot,
            Err(e) => result.warn("auctionLot", format!("{:?}: {}", &caps[1], e)),
        },
        None => result.warn("auctionLot", "no \"Auction Sale - \" marker"),
    }

    match INVOICE_NUMBER.captures(header) {
        Some(caps) => result.value.invoice_number = caps[1].trim().to_string(),
        None => result.warn("invoiceNumber", "no \" 1 <number>Auction Sale\" run"),
    }
}

fn extract_buyer_contact(header: &str, result: &mut Extracted<HeaderFields>) {
    result.value.is_shipping = header.contains(SHIP_TO);

    if result.value.is_shipping {
        match SHIP_TO_EMAIL.captures(header) {
            Some(caps) => result.value.buyer_email = caps[1].trim().to_string(),
            None => result.warn("buyerEmail", "no \"SHIP TO:\" ... \"Lot#\" run"),
        }

        let sold_to = SOLD_TO_SHIP_TO
            .captures(header)
            .and_then(|caps| split_name_address(&caps[1]));
        match sold_to {
            Some((name, address)) => {
                result.value.buyer_name = name;
                result.value.shipping_address = address;
            }
            None => result.warn("shippingAddress", "no splittable \"SOLD TO:\" ... \"SHIP TO:\" run"),
        }
    } else {
        match SOLD_TO_EMAIL.captures(header) {
            Some(caps) => result.value.buyer_email = caps[1].trim().to_string(),
            None => result.warn("buyerEmail", "no \"SOLD TO:\" ... \"Lot#\" run"),
        }
    }
}

fn extract_name_address(header: &str, paid: bool, result: &mut Extracted<HeaderFields>) {
    let pattern = if paid {
        &*PAID_NAME_ADDRESS
    } else {
        &*UNPAID_NAME_ADDRESS
    };

    match pattern.captures(header).and_then(|caps| split_name_address(&caps[1])) {
        Some((name, address)) => {
            if result.value.buyer_name.is_empty() {
                result.value.buyer_name = name;
            }
            result.value.buyer_address = address;
        }
        None => result.warn("buyerAddress", "no splittable name and address before \"Phone\""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use pretty_assertions::assert_eq;

    const UNPAID_PICKUP: &str = "Invoice (Original) 2024-03-14 18:45:12 Invoice #: 16105 \
        1 16105Auction Sale - 132 SOLD TO:julius_roy@msn.comLot#**4821Julius Roy \
        12 King St W Toronto ON M5H 1A1Phone: 416-555-0199 #:Date:Page:UNPAIDLot#\
        DESCRIPTIONUNIT PRICEEXTENDEDPRICE";

    const PAID_SHIPPING: &str = "Invoice (Original) 2024-07-04 09:05:01 Invoice #: 20417 \
        1 20417Auction Sale - 140 SOLD TO:Ana Li 88 Queen St E Toronto ONSHIP TO:\
        ana.li@example.comLot#PAID IN FULLAna Li 5 Elm Ave Markham ONPhone: 647-000-1111 \
        #Auth# 009911Lot#DESCRIPTIONUNIT PRICEEXTENDEDPRICE";

    #[test]
    fn test_unpaid_pickup_header() {
        let result = extract_header(UNPAID_PICKUP);
        let fields = &result.value;

        assert_eq!(fields.auction_lot, 132);
        assert_eq!(fields.invoice_number, "16105");
        assert_eq!(fields.buyer_email, "julius_roy@msn.com");
        assert!(!fields.is_shipping);
        assert_eq!(fields.buyer_name, "Julius Roy");
        assert_eq!(fields.buyer_address, "12 King St W Toronto ON M5H 1A1");
        assert_eq!(fields.shipping_address, "");
        assert_eq!(fields.buyer_phone, "4165550199");
        assert_eq!(fields.status, InvoiceStatus::Unpaid);
        assert_eq!(fields.payment_method, PaymentMethod::Unset);

        let time = fields.time.unwrap();
        assert_eq!((time.year(), time.month(), time.day(), time.hour()), (2024, 3, 14, 18));
        assert!(result.is_clean(), "{:?}", result.diagnostics);
    }

    #[test]
    fn test_paid_shipping_header() {
        let result = extract_header(PAID_SHIPPING);
        let fields = &result.value;

        assert!(fields.is_shipping);
        assert_eq!(fields.buyer_email, "ana.li@example.com");
        assert_eq!(fields.buyer_name, "Ana Li");
        assert_eq!(fields.shipping_address, "88 Queen St E Toronto ON");
        assert_eq!(fields.buyer_address, "5 Elm Ave Markham ON");
        assert_eq!(fields.buyer_phone, "6470001111");
        assert_eq!(fields.status, InvoiceStatus::Paid);
        assert_eq!(fields.payment_method, PaymentMethod::Card);
        assert_eq!(fields.auction_lot, 140);
        assert_eq!(fields.invoice_number, "20417");
    }

    #[test]
    fn test_single_issue_event_uses_header_time() {
        let result = extract_header(PAID_SHIPPING);
        let fields = &result.value;

        assert_eq!(fields.events.len(), 1);
        assert_eq!(fields.events[0].title, "Invoice Paid");
        assert_eq!(fields.events[0].time, fields.time);
        assert_eq!(fields.time.unwrap().offset().local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn test_paid_without_auth_leaves_method_unset() {
        let header = PAID_SHIPPING.replace("Auth#", "Ref#");
        let result = extract_header(&header);

        assert_eq!(result.value.status, InvoiceStatus::Paid);
        assert_eq!(result.value.payment_method, PaymentMethod::Unset);
    }

    #[test]
    fn test_empty_header_degrades_to_diagnostics() {
        let result = extract_header("PRICEEXTENDEDPRICE");
        let fields = &result.value;

        assert_eq!(fields.auction_lot, 0);
        assert_eq!(fields.invoice_number, "");
        assert_eq!(fields.time, None);
        assert_eq!(fields.status, InvoiceStatus::Unpaid);
        assert_eq!(fields.events.len(), 1);
        assert_eq!(fields.events[0].title, "Invoice Unpaid");

        let fields: Vec<&str> = result.diagnostics.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["auctionLot", "invoiceNumber", "buyerEmail", "buyerAddress", "buyerPhone", "time"]
        );
    }

    #[test]
    fn test_falls_back_to_us_time_layout() {
        let header = "Page 1 of 1 3/14/2024 6:45:12 PM Invoice #: 16105 1 16105Auction Sale - 132";
        let time = extract_header(header).value.time.unwrap();
        assert_eq!(time.hour(), 18);
    }
}
