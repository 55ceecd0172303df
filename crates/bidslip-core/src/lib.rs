//! Core library for auction-house invoice text extraction.
//!
//! This crate provides:
//! - Segmentation of flattened invoice text into header, item rows and footer
//! - Header, footer and line-item field extraction with per-field diagnostics
//! - Line-item enrichment from remaining-inventory records
//! - Invoice data models matching the persisted invoice document

pub mod enrich;
pub mod error;
pub mod invoice;
pub mod models;

pub use enrich::{enrich_items, InventoryStore, RemainingInventory, SoldItemLookup, SoldItemRecord};
pub use error::{BidslipError, LookupError, ParseError, Result, SegmentationError};
pub use invoice::{
    parse_invoice_document, AuctionInvoiceParser, Diagnostic, ExtractionResult, InvoiceParser,
};
pub use models::config::BidslipConfig;
pub use models::invoice::{Invoice, InvoiceEvent, InvoiceItem, InvoiceStatus, PaymentMethod};
