//! Error types for the bidslip-core library.

use thiserror::Error;

/// Main error type for the bidslip library.
#[derive(Error, Debug)]
pub enum BidslipError {
    /// Document-level parse failure.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Inventory lookup failure.
    #[error("lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while splitting raw text into header, items, and footer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SegmentationError {
    /// The literal that separates the header from the body is absent.
    #[error("cannot find {anchor:?} to split the header from the body")]
    MissingHeaderAnchor { anchor: &'static str },
}

/// Fatal, document-level parse errors.
///
/// Everything short of these is reported as a diagnostic on the result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The document could not be segmented; no invoice is produced.
    #[error("document cannot be segmented: {0}")]
    Unsegmentable(#[from] SegmentationError),
}

/// Errors returned by a sold-item lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// No record for this (auction lot, item lot) pair.
    #[error("no sold item for auction lot {auction_lot}, item lot {item_lot}")]
    NotFound { auction_lot: u32, item_lot: u32 },

    /// The backing store failed.
    #[error("inventory backend error: {0}")]
    Backend(String),
}

/// Result type for the bidslip library.
pub type Result<T> = std::result::Result<T, BidslipError>;
