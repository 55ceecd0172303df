//! Line-item parsing.
//!
//! A well-formed row flattens to `$<msrp> <shelf> <sku>T<item lot>`.
//! The vendor's PDF generator sometimes drops the separator between
//! adjacent columns (`$10.98Y17 43430T651`, `$ 27.53 G1043239T563`); those
//! rows only reliably expose the MSRP and the trailing item lot.

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::invoice::InvoiceItem;

use super::rules::{parse_money, Extracted, FALLBACK_MSRP};

/// Column layout detected for one flattened item row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLayout {
    /// `msrp shelf sku lot`, one token each.
    Columns,
    /// Adjacent columns collapsed into one token somewhere.
    Collapsed,
}

impl RowLayout {
    /// Pick a layout from the row's whitespace tokens.
    pub fn detect(tokens: &[&str]) -> Self {
        match tokens.len() {
            4 => RowLayout::Columns,
            _ => RowLayout::Collapsed,
        }
    }
}

/// Parse every item row, pairing it positionally with its unit quantity
/// and handling fee.
///
/// Only the first `min(items, units, fees)` rows are kept; entries beyond
/// the shortest list are dropped rather than paired with a neighbour's data.
pub fn parse_items<S: AsRef<str>>(
    item_texts: &[S],
    unit_texts: &[S],
    fee_texts: &[S],
) -> Extracted<Vec<InvoiceItem>> {
    let kept = item_texts.len().min(unit_texts.len()).min(fee_texts.len());
    let mut result = Extracted::new(Vec::with_capacity(kept));

    if kept != item_texts.len() || kept != unit_texts.len() || kept != fee_texts.len() {
        result.warn(
            "items",
            format!(
                "kept {} rows from {} item blocks, {} unit quantities, {} handling fees",
                kept,
                item_texts.len(),
                unit_texts.len(),
                fee_texts.len()
            ),
        );
    }

    for index in 0..kept {
        let item = parse_item(
            index,
            item_texts[index].as_ref(),
            unit_texts[index].as_ref(),
            fee_texts[index].as_ref(),
        );
        let (item, diagnostics) = item.into_parts();
        result.value.push(item);
        result.diagnostics.extend(diagnostics);
    }

    result
}

/// Parse a single item row.
pub fn parse_item(index: usize, text: &str, unit_text: &str, fee_text: &str) -> Extracted<InvoiceItem> {
    let mut result = Extracted::new(InvoiceItem::default());
    let field = |name: &str| format!("items[{}].{}", index, name);

    match unit_text.trim().parse::<u32>() {
        Ok(unit) => result.value.unit_quantity = unit,
        Err(_) => result.warn(field("unit"), format!("{:?} is not a quantity", unit_text)),
    }

    match parse_money(fee_text) {
        Some(fee) => result.value.handling_fee = fee,
        None => result.warn(field("handlingFee"), format!("{:?} is not an amount", fee_text)),
    }

    let cleaned = text.replace('$', "").replace('T', " ");
    let tokens: Vec<&str> = cleaned.split_whitespace().collect();
    let layout = RowLayout::detect(&tokens);
    debug!("Item {} {:?} row: {:?}", index, layout, tokens);

    match layout {
        RowLayout::Columns => {
            match parse_money(tokens[0]) {
                Some(msrp) => result.value.msrp = msrp,
                None => result.warn(field("msrp"), format!("{:?} is not an amount", tokens[0])),
            }

            result.value.shelf_location = Some(tokens[1].to_string());

            match tokens[2].parse::<u64>() {
                Ok(sku) => result.value.sku = Some(sku),
                Err(_) => result.warn(field("sku"), format!("{:?} is not a SKU", tokens[2])),
            }

            match tokens[3].parse::<u32>() {
                Ok(lot) => result.value.item_lot = lot,
                Err(_) => result.warn(field("itemLot"), format!("{:?} is not a lot number", tokens[3])),
            }
        }
        RowLayout::Collapsed => {
            result.warn(
                field("layout"),
                format!(
                    "irregular row {:?} ({} tokens); SKU and shelf location left unset",
                    text,
                    tokens.len()
                ),
            );

            match FALLBACK_MSRP.captures(text) {
                Some(caps) => match parse_money(&caps[1]) {
                    Some(msrp) => result.value.msrp = msrp,
                    None => result.warn(field("msrp"), format!("{:?} is not an amount", &caps[1])),
                },
                None => result.warn(field("msrp"), "no \"$<amount><letter>\" run"),
            }

            match tokens.last().map(|t| t.parse::<u32>()) {
                Some(Ok(lot)) => result.value.item_lot = lot,
                Some(Err(_)) | None => {
                    result.warn(field("itemLot"), "trailing token is not a lot number")
                }
            }
        }
    }

    result
}

/// Sum of the items' handling fees.
pub fn total_handling_fee(items: &[InvoiceItem]) -> Decimal {
    items.iter().map(|item| item.handling_fee).sum()
}
