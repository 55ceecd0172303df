//! Line-item enrichment from the remaining-inventory store.
//!
//! Parsed rows carry only MSRP, lot numbers and fees. Description, bid,
//! shelf location and SKU come from the auction's sold-item records,
//! keyed by `(auction lot, item lot)`.

use std::collections::HashMap;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::LookupError;
use crate::invoice::rules::Diagnostic;
use crate::models::invoice::InvoiceItem;

/// A sold item as recorded in the remaining-inventory store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoldItemRecord {
    pub sku: u64,
    #[serde(rename = "clotNumber")]
    pub item_lot: u32,
    #[serde(rename = "lead")]
    pub description: String,
    #[serde(rename = "shelfLocation")]
    pub shelf_location: String,
    #[serde(rename = "bidAmount")]
    pub bid_amount: Decimal,
}

/// Remaining-inventory document for one auction lot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemainingInventory {
    pub lot: u32,
    #[serde(rename = "soldItems", default)]
    pub sold_items: Vec<SoldItemRecord>,
}

/// Read-only lookup of sold items.
///
/// Implementations are shared across documents processed in parallel.
pub trait SoldItemLookup: Send + Sync {
    fn lookup_sold_item(&self, auction_lot: u32, item_lot: u32) -> Result<SoldItemRecord, LookupError>;
}

/// In-memory sold-item index.
#[derive(Debug, Clone, Default)]
pub struct InventoryStore {
    items: HashMap<(u32, u32), SoldItemRecord>,
}

impl InventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index remaining-inventory documents. Later duplicates win.
    pub fn from_records(records: impl IntoIterator<Item = RemainingInventory>) -> Self {
        let mut items = HashMap::new();
        for record in records {
            for item in record.sold_items {
                items.insert((record.lot, item.item_lot), item);
            }
        }
        Self { items }
    }

    /// Parse a JSON array of remaining-inventory documents.
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        let records: Vec<RemainingInventory> = serde_json::from_str(json)?;
        Ok(Self::from_records(records))
    }

    /// Load a JSON array of remaining-inventory documents from disk.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sold-item count per auction lot, ordered by lot.
    pub fn lots(&self) -> Vec<(u32, usize)> {
        let mut counts: HashMap<u32, usize> = HashMap::new();
        for (lot, _) in self.items.keys() {
            *counts.entry(*lot).or_default() += 1;
        }
        let mut lots: Vec<_> = counts.into_iter().collect();
        lots.sort_unstable();
        lots
    }
}

impl SoldItemLookup for InventoryStore {
    fn lookup_sold_item(&self, auction_lot: u32, item_lot: u32) -> Result<SoldItemRecord, LookupError> {
        self.items
            .get(&(auction_lot, item_lot))
            .cloned()
            .ok_or(LookupError::NotFound {
                auction_lot,
                item_lot,
            })
    }
}

/// Fill each item from its sold-item record.
///
/// A failed lookup leaves that item's parsed fields untouched and is
/// reported; the remaining items are still enriched.
pub fn enrich_items(
    auction_lot: u32,
    items: &mut [InvoiceItem],
    lookup: &dyn SoldItemLookup,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for (index, item) in items.iter_mut().enumerate() {
        match lookup.lookup_sold_item(auction_lot, item.item_lot) {
            Ok(record) => {
                debug!("Enriched item lot {} from inventory", item.item_lot);
                item.description = Some(record.description);
                item.bid_amount = Some(record.bid_amount);
                item.shelf_location = Some(record.shelf_location);
                item.sku = Some(record.sku);
            }
            Err(e) => {
                warn!("Cannot enrich item {}: {}", index, e);
                diagnostics.push(Diagnostic::new(format!("items[{}].enrichment", index), e.to_string()));
            }
        }
    }

    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const INVENTORY: &str = r#"[
        {
            "lot": 132,
            "soldItems": [
                {"sku": 1976, "clotNumber": 528, "lead": "Cordless drill", "shelfLocation": "K22", "bidAmount": 12.5},
                {"sku": 10854, "clotNumber": 788, "lead": "Air fryer", "shelfLocation": "H12", "bidAmount": "30.00"}
            ]
        },
        {"lot": 133}
    ]"#;

    #[test]
    fn test_load_inventory() {
        let store = InventoryStore::from_json_str(INVENTORY).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.lots(), vec![(132, 2)]);

        let record = store.lookup_sold_item(132, 788).unwrap();
        assert_eq!(record.description, "Air fryer");
        assert_eq!(record.bid_amount, Decimal::new(3000, 2));
    }

    #[test]
    fn test_lookup_is_keyed_by_both_lots() {
        let store = InventoryStore::from_json_str(INVENTORY).unwrap();

        assert_eq!(
            store.lookup_sold_item(133, 528),
            Err(LookupError::NotFound {
                auction_lot: 133,
                item_lot: 528
            })
        );
    }

    #[test]
    fn test_enrichment_miss_keeps_other_items() {
        let store = InventoryStore::from_json_str(INVENTORY).unwrap();
        let mut items = vec![
            InvoiceItem {
                item_lot: 528,
                ..InvoiceItem::default()
            },
            InvoiceItem {
                item_lot: 999,
                shelf_location: Some("Z9".to_string()),
                ..InvoiceItem::default()
            },
        ];

        let diagnostics = enrich_items(132, &mut items, &store);

        assert_eq!(items[0].description.as_deref(), Some("Cordless drill"));
        assert_eq!(items[0].bid_amount, Some(Decimal::new(125, 1)));
        assert_eq!(items[0].sku, Some(1976));
        assert_eq!(items[1].description, None);
        assert_eq!(items[1].bid_amount, None);
        assert_eq!(items[1].shelf_location.as_deref(), Some("Z9"));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].field, "items[1].enrichment");
    }

    #[test]
    fn test_missing_inventory_file_is_io_error() {
        let err = InventoryStore::from_file(Path::new("/nonexistent/bidslip/inventory.json")).unwrap_err();

        assert!(matches!(err, crate::error::BidslipError::Io(_)));
    }

    #[test]
    fn test_malformed_inventory() {
        assert!(InventoryStore::from_json_str("{\"lot\": 1}").is_err());
    }
}
