//! Invoice assembly: segmentation, field extraction, and enrichment.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::enrich::{enrich_items, SoldItemLookup};
use crate::models::config::BidslipConfig;
use crate::models::invoice::Invoice;

use super::footer::extract_footer;
use super::header::extract_header;
use super::items::{parse_items, total_handling_fee};
use super::rules::Diagnostic;
use super::segmenter::{segment, strip_boilerplate};
use super::{InvoiceParser, Result};

/// Result of invoice extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Assembled invoice.
    pub invoice: Invoice,
    /// Soft failures; non-empty means the invoice needs manual review.
    pub diagnostics: Vec<Diagnostic>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionResult {
    pub fn needs_review(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Parser for the auction house's flattened PDF invoices.
#[derive(Clone, Default)]
pub struct AuctionInvoiceParser {
    /// Phrases stripped from raw text before segmentation.
    boilerplate: Vec<String>,
    /// Sold-item lookup used to enrich line items.
    lookup: Option<Arc<dyn SoldItemLookup>>,
}

impl AuctionInvoiceParser {
    /// Create a parser that neither strips boilerplate nor enriches items.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the vendor phrases removed before segmentation.
    pub fn with_boilerplate(mut self, phrases: Vec<String>) -> Self {
        self.boilerplate = phrases;
        self
    }

    /// Create a parser with the configured boilerplate phrases.
    pub fn from_config(config: &BidslipConfig) -> Self {
        Self::new().with_boilerplate(config.active_boilerplate())
    }

    /// Enrich line items from this lookup.
    pub fn with_lookup(mut self, lookup: Arc<dyn SoldItemLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    /// Assemble an invoice without touching the inventory store.
    fn assemble(&self, text: &str) -> Result<(Invoice, Vec<Diagnostic>)> {
        let (segments, mut diagnostics) = segment(text)?.into_parts();

        let (header, header_diagnostics) = extract_header(&segments.header).into_parts();
        let (footer, footer_diagnostics) = extract_footer(&segments.footer).into_parts();
        let (items, item_diagnostics) = parse_items(
            segments.items.as_slice(),
            segments.unit_texts.as_slice(),
            segments.handling_fee_texts.as_slice(),
        )
        .into_parts();

        diagnostics.extend(header_diagnostics);
        diagnostics.extend(footer_diagnostics);
        diagnostics.extend(item_diagnostics);

        let invoice = Invoice {
            invoice_number: header.invoice_number,
            auction_lot: header.auction_lot,
            time: header.time,
            buyer_name: header.buyer_name,
            buyer_email: header.buyer_email,
            buyer_address: header.buyer_address,
            shipping_address: header.shipping_address,
            buyer_phone: header.buyer_phone,
            is_shipping: header.is_shipping,
            status: header.status,
            payment_method: header.payment_method,
            invoice_total: footer.invoice_total,
            remaining_balance: footer.remaining_balance,
            tax: footer.tax,
            buyers_premium: footer.buyers_premium,
            total_handling_fee: total_handling_fee(&items),
            items,
            events: header.events,
            invoice_cdn: String::new(),
            signature_cdn: String::new(),
        };

        Ok((invoice, diagnostics))
    }
}

impl std::fmt::Debug for AuctionInvoiceParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuctionInvoiceParser")
            .field("boilerplate", &self.boilerplate.len())
            .field("lookup", &self.lookup.is_some())
            .finish()
    }
}

impl InvoiceParser for AuctionInvoiceParser {
    fn parse(&self, text: &str) -> Result<ExtractionResult> {
        let start = Instant::now();

        info!("Parsing invoice from {} characters of text", text.len());

        let cleaned = strip_boilerplate(text, &self.boilerplate);
        let (mut invoice, mut diagnostics) = self.assemble(&cleaned)?;

        if let Some(lookup) = &self.lookup {
            let misses = enrich_items(invoice.auction_lot, &mut invoice.items, lookup.as_ref());
            diagnostics.extend(misses);
        }

        debug!(
            "Extracted invoice {} with {} items and {} diagnostics",
            invoice.invoice_number,
            invoice.items.len(),
            diagnostics.len()
        );

        Ok(ExtractionResult {
            invoice,
            diagnostics,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Parse one raw invoice dump into an invoice, without enrichment.
pub fn parse_invoice_document(raw_text: &str) -> Result<Invoice> {
    AuctionInvoiceParser::new().parse(raw_text).map(|r| r.invoice)
}
