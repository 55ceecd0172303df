//! Invoice field extraction module.

pub mod footer;
pub mod header;
pub mod items;
mod parser;
pub mod rules;
pub mod segmenter;

pub use footer::{extract_footer, FooterFields};
pub use header::{extract_header, HeaderFields};
pub use items::{parse_item, parse_items, RowLayout};
pub use parser::{parse_invoice_document, AuctionInvoiceParser, ExtractionResult};
pub use rules::{Diagnostic, Extracted};
pub use segmenter::{segment, strip_boilerplate, Segments};

use crate::error::ParseError;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Trait for invoice parsers.
pub trait InvoiceParser {
    /// Parse an invoice from the plain text of one document.
    fn parse(&self, text: &str) -> Result<ExtractionResult>;
}
