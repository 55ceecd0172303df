//! Splits a flattened invoice dump into header, item blocks, and footer.

use tracing::debug;

use crate::error::SegmentationError;

use super::rules::{
    Extracted, FOOTER_START, HANDLING_FEE, HEADER_ANCHOR, ITEM_BLOCK, UNIT_QUANTITY,
};

/// The textual regions of one invoice.
///
/// `items`, `handling_fee_texts` and `unit_texts` are extracted
/// independently and correlated by position only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segments {
    /// Everything up to and including the header anchor.
    pub header: String,
    /// Text between each `MSRP:` and the following `Item handling`.
    pub items: Vec<String>,
    /// Text after each `Item handling fee -`, up to the next `T`.
    pub handling_fee_texts: Vec<String>,
    /// Quantity of each `<n> x <price>` occurrence.
    pub unit_texts: Vec<String>,
    /// From the first `<amount> Total Extended Price:` to the end.
    pub footer: String,
}

/// Remove vendor banner phrases, verbatim and everywhere, from raw text.
pub fn strip_boilerplate<S: AsRef<str>>(text: &str, phrases: &[S]) -> String {
    let mut cleaned = text.to_string();
    for phrase in phrases {
        let phrase: &str = phrase.as_ref();
        if !phrase.is_empty() {
            cleaned = cleaned.replace(phrase, "");
        }
    }
    cleaned
}

/// Segment a raw invoice dump.
///
/// Fails only when the header anchor is missing. Count mismatches between
/// the three item lists and a missing footer are reported as diagnostics.
pub fn segment(raw_text: &str) -> Result<Extracted<Segments>, SegmentationError> {
    let anchor_end = raw_text
        .find(HEADER_ANCHOR)
        .map(|start| start + HEADER_ANCHOR.len())
        .ok_or(SegmentationError::MissingHeaderAnchor {
            anchor: HEADER_ANCHOR,
        })?;

    let (header, rest) = raw_text.split_at(anchor_end);

    let items: Vec<String> = ITEM_BLOCK
        .captures_iter(rest)
        .map(|caps| caps[1].trim().to_string())
        .collect();

    let handling_fee_texts: Vec<String> = HANDLING_FEE
        .captures_iter(rest)
        .map(|caps| caps[1].trim().to_string())
        .collect();

    let unit_texts: Vec<String> = UNIT_QUANTITY
        .captures_iter(rest)
        .map(|caps| caps[1].trim().to_string())
        .collect();

    let footer = FOOTER_START
        .find(rest)
        .map(|m| rest[m.start()..].to_string());

    let mut result = Extracted::new(Segments {
        header: header.to_string(),
        items,
        handling_fee_texts,
        unit_texts,
        footer: footer.clone().unwrap_or_default(),
    });

    let segments = &result.value;
    debug!(
        "Segmented {} header chars, {} items, {} fees, {} units, {} footer chars",
        segments.header.len(),
        segments.items.len(),
        segments.handling_fee_texts.len(),
        segments.unit_texts.len(),
        segments.footer.len()
    );

    let (item_count, fee_count, unit_count) = (
        segments.items.len(),
        segments.handling_fee_texts.len(),
        segments.unit_texts.len(),
    );
    if item_count != fee_count {
        result.warn(
            "itemHandlingFees",
            format!("found {} item blocks but {} handling fees", item_count, fee_count),
        );
    }
    if item_count != unit_count {
        result.warn(
            "units",
            format!("found {} item blocks but {} unit quantities", item_count, unit_count),
        );
    }
    if footer.is_none() {
        result.warn("footer", "no \"Total Extended Price:\" amount found");
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BODY: &str = "1 x 74.9674.96MSRP:$74.96 K22 1976T528Item handling fee - 1.00T\
                        2 x 49.9999.98MSRP:$99.99 H12 10854T788Item handling fee - $1.50T\
                        174.94 Total Extended Price:Quantity: 1.76Tax1";

    fn document(body: &str) -> String {
        format!("Auction Sale - 132 1 16105Auction SaleLot#DESCRIPTIONUNIT PRICEEXTENDEDPRICE{}", body)
    }

    #[test]
    fn test_segment_regions() {
        let result = segment(&document(BODY)).unwrap();
        let segments = &result.value;

        assert!(segments.header.ends_with("PRICEEXTENDEDPRICE"));
        assert!(segments.header.starts_with("Auction Sale - 132"));
        assert_eq!(
            segments.items,
            vec!["$74.96 K22 1976T528".to_string(), "$99.99 H12 10854T788".to_string()]
        );
        assert_eq!(segments.handling_fee_texts, vec!["1.00".to_string(), "$1.50".to_string()]);
        assert_eq!(segments.unit_texts, vec!["1".to_string(), "2".to_string()]);
        assert!(segments.footer.starts_with("174.94 Total Extended Price:"));
        assert!(result.is_clean());
    }

    #[test]
    fn test_missing_anchor_is_fatal() {
        let err = segment("Auction Sale - 132 MSRP:$1.00 A1 1T2Item handling").unwrap_err();
        assert_eq!(
            err,
            SegmentationError::MissingHeaderAnchor {
                anchor: "PRICEEXTENDEDPRICE"
            }
        );
    }

    #[test]
    fn test_missing_footer_is_soft() {
        let result = segment(&document("1 x 5.005.00MSRP:$5.00 A1 11T2Item handling fee - 1.00T")).unwrap();

        assert_eq!(result.value.footer, "");
        assert_eq!(result.value.items.len(), 1);
        assert!(result.diagnostics.iter().any(|d| d.field == "footer"));
    }

    #[test]
    fn test_count_mismatch_is_reported() {
        let body = "1 x 5.005.00MSRP:$5.00 A1 11T2Item handling fee - 1.00T\
                    MSRP:$6.00 B2 12T3Item handling\
                    11.00 Total Extended Price:";
        let result = segment(&document(body)).unwrap();

        assert_eq!(result.value.items.len(), 2);
        assert_eq!(result.value.handling_fee_texts.len(), 1);
        assert_eq!(result.value.unit_texts.len(), 1);

        let fields: Vec<&str> = result.diagnostics.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, vec!["itemHandlingFees", "units"]);
    }

    #[test]
    fn test_footer_keeps_comma_grouped_amount() {
        let body = "1 x 5.005.00MSRP:$5.00 A1 11T2Item handling fee - 1.00T\
                    1,234.56 Total Extended Price:Buyer's Premium: 15%";
        let result = segment(&document(body)).unwrap();

        assert!(result.value.footer.starts_with("1,234.56 Total Extended Price:"));
        assert_eq!(result.value.handling_fee_texts, vec!["1.00".to_string()]);
    }

    #[test]
    fn test_anchor_text_stays_in_header() {
        let result = segment(&document("")).unwrap();
        assert!(result.value.items.is_empty());
        assert!(!result.value.header.is_empty());
    }

    #[test]
    fn test_strip_boilerplate() {
        let text = "NO RETURN AND REFUNDAuction Sale - 1NO RETURN AND REFUND";
        assert_eq!(strip_boilerplate(text, &["NO RETURN AND REFUND", ""]), "Auction Sale - 1");

        let none: [&str; 0] = [];
        assert_eq!(strip_boilerplate(text, &none), text);
    }
}
