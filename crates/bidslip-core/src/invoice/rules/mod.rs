//! Rule-based field extraction for the auction-house invoice layout.

pub mod dates;
pub mod money;
pub mod party;
pub mod patterns;

pub use dates::{extract_invoice_time, parse_invoice_time};
pub use money::{parse_money, parse_money_pair, round_cents};
pub use party::{normalize_phone, split_name_address};
pub use patterns::*;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// A soft, field-level extraction failure.
///
/// The affected field keeps its zero value; the entry tells a reviewer
/// what to check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Field path, e.g. `buyerEmail` or `items[1].msrp`.
    pub field: String,
    /// Why the field could not be filled.
    pub reason: String,
}

impl Diagnostic {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// An extraction outcome that always carries a value, plus any warnings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extracted<T> {
    /// Extracted value; unmatched fields are left at their zero value.
    pub value: T,
    /// Soft failures met while extracting.
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Extracted<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            diagnostics: Vec::new(),
        }
    }

    /// Record a soft failure and log it.
    pub fn warn(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        let diagnostic = Diagnostic::new(field, reason);
        warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    /// Whether extraction finished without any soft failure.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_parts(self) -> (T, Vec<Diagnostic>) {
        (self.value, self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extracted_collects_diagnostics() {
        let mut extracted = Extracted::new(0u32);
        assert!(extracted.is_clean());

        extracted.warn("auctionLot", "no \"Auction Sale - \" marker");
        let (value, diagnostics) = extracted.into_parts();

        assert_eq!(value, 0);
        assert_eq!(
            diagnostics,
            vec![Diagnostic::new("auctionLot", "no \"Auction Sale - \" marker")]
        );
    }

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic::new("tax", "not a number");
        assert_eq!(diagnostic.to_string(), "tax: not a number");
    }
}
