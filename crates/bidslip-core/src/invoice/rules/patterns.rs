//! Regex patterns for the auction-house invoice layout.
//!
//! The vendor's PDF flattening drops most whitespace and every line
//! break, so the patterns are anchored on the printed labels rather than
//! on line structure.

use lazy_static::lazy_static;
use regex::Regex;

/// Literal separating the header from the body.
pub const HEADER_ANCHOR: &str = "PRICEEXTENDEDPRICE";

lazy_static! {
    // Segmentation
    pub static ref ITEM_BLOCK: Regex = Regex::new(
        r"MSRP:(.*?)Item handling"
    ).unwrap();

    pub static ref HANDLING_FEE: Regex = Regex::new(
        r"Item handling fee\s*-\s*(.*?)\s*T"
    ).unwrap();

    pub static ref UNIT_QUANTITY: Regex = Regex::new(
        r"(\d+)\s*x\s*\d+\.\d{2}"
    ).unwrap();

    pub static ref FOOTER_START: Regex = Regex::new(
        r"\d[\d,]*\.\d{2}\s*Total Extended Price:"
    ).unwrap();

    // Header
    pub static ref AUCTION_LOT: Regex = Regex::new(
        r"Auction Sale - (\d+)"
    ).unwrap();

    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"\s+1\s+(\d+)\s*Auction Sale"
    ).unwrap();

    pub static ref SHIP_TO_EMAIL: Regex = Regex::new(
        r"SHIP TO:\s*(.*?)Lot#"
    ).unwrap();

    pub static ref SOLD_TO_SHIP_TO: Regex = Regex::new(
        r"SOLD TO:\s*(.*?)SHIP TO:"
    ).unwrap();

    pub static ref SOLD_TO_EMAIL: Regex = Regex::new(
        r"SOLD TO:\s*(.*?)Lot#"
    ).unwrap();

    pub static ref UNPAID_NAME_ADDRESS: Regex = Regex::new(
        r"\*\*\d{4}(.*?)Phone"
    ).unwrap();

    pub static ref PAID_NAME_ADDRESS: Regex = Regex::new(
        r"PAID IN FULL(.*?)Phone"
    ).unwrap();

    pub static ref PHONE: Regex = Regex::new(
        r"Phone:\s*(.*?)\s*#"
    ).unwrap();

    pub static ref TIME_BEFORE_INVOICE_NO: Regex = Regex::new(
        r"\)\s*(.*?)\s*Invoice #:"
    ).unwrap();

    pub static ref TIME_US: Regex = Regex::new(
        r"(\d{1,2}/\d{1,2}/\d{4} \d{1,2}:\d{2}:\d{2}(?:\s*[AaPp][Mm])?)"
    ).unwrap();

    // Footer
    pub static ref DEFAULT_BALANCE: Regex = Regex::new(
        r"Default:\s*(.*?)\s*Invoice Total:"
    ).unwrap();

    pub static ref PAID_BALANCE: Regex = Regex::new(
        r"PAID IN FULL\s*(.*?)\s*Invoice Total:"
    ).unwrap();

    pub static ref TAX: Regex = Regex::new(
        r"Quantity:\s*(.*?)\s*Tax1"
    ).unwrap();

    pub static ref PREMIUM: Regex = Regex::new(
        r"(\d[\d,]*\.\d+)\s*Total Extended Price:"
    ).unwrap();

    // Items
    pub static ref FALLBACK_MSRP: Regex = Regex::new(
        r"\$(.*?)[A-Za-z]"
    ).unwrap();

    pub static ref FIRST_DIGIT: Regex = Regex::new(r"\d").unwrap();
}
