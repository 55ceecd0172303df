//! Invoice timestamp extraction.
//!
//! The vendor prints times as local wall-clock time without an offset.
//! The auction house operates on Eastern time, so parsed values are
//! resolved against `America/New_York`.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use chrono_tz::America::New_York;

use super::patterns::{TIME_BEFORE_INVOICE_NO, TIME_US};

const ISO_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";
const US_LAYOUT: &str = "%m/%d/%Y %H:%M:%S";
const US_LAYOUT_12H: &str = "%m/%d/%Y %I:%M:%S %p";

/// Find and parse the invoice time in a header.
///
/// Candidates are tried in order: the text between a closing parenthesis
/// and `Invoice #:`, then the first `M/D/YYYY H:MM:SS` run anywhere in
/// the header. The first one that parses wins.
pub fn extract_invoice_time(header: &str) -> Option<DateTime<FixedOffset>> {
    let candidates = [
        TIME_BEFORE_INVOICE_NO.captures(header).map(|c| c[1].trim().to_string()),
        TIME_US.captures(header).map(|c| c[1].trim().to_string()),
    ];

    candidates
        .into_iter()
        .flatten()
        .find_map(|candidate| parse_invoice_time(&candidate))
}

/// Parse one timestamp string and resolve it as Eastern time.
pub fn parse_invoice_time(s: &str) -> Option<DateTime<FixedOffset>> {
    let naive = parse_naive(s)?;
    to_eastern(naive)
}

fn parse_naive(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    if let Ok(dt) = NaiveDateTime::parse_from_str(s, ISO_LAYOUT) {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, US_LAYOUT) {
        return Some(dt);
    }

    // "3:04:05PM" and "3:04:05 PM" both occur
    let upper = s.to_ascii_uppercase();
    let meridiem = upper.strip_suffix("AM").map(|rest| (rest, "AM"))
        .or_else(|| upper.strip_suffix("PM").map(|rest| (rest, "PM")))?;
    let spaced = format!("{} {}", meridiem.0.trim_end(), meridiem.1);
    NaiveDateTime::parse_from_str(&spaced, US_LAYOUT_12H).ok()
}

fn to_eastern(naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
    // Ambiguous fall-back hour resolves to the earlier instant;
    // spring-forward gap times do not exist and yield None.
    New_York
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.fixed_offset())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_iso_layout_in_winter() {
        let time = parse_invoice_time("2024-01-15 14:30:00").unwrap();

        assert_eq!(time.to_rfc3339(), "2024-01-15T14:30:00-05:00");
    }

    #[test]
    fn test_parse_us_layout_in_summer() {
        let time = parse_invoice_time("7/4/2024 9:05:01").unwrap();

        assert_eq!((time.month(), time.day(), time.hour()), (7, 4, 9));
        assert_eq!(time.offset().local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn test_parse_us_layout_with_meridiem() {
        let time = parse_invoice_time("7/4/2024 3:05:01PM").unwrap();
        assert_eq!(time.hour(), 15);

        let time = parse_invoice_time("7/4/2024 12:10:00 am").unwrap();
        assert_eq!(time.hour(), 0);
    }

    #[test]
    fn test_unparseable_time() {
        assert_eq!(parse_invoice_time("yesterday"), None);
        assert_eq!(parse_invoice_time("2024-13-40 10:00:00"), None);
    }

    #[test]
    fn test_nonexistent_local_time() {
        // 2:30am on the spring-forward date is skipped in Eastern time
        assert_eq!(parse_invoice_time("2024-03-10 02:30:00"), None);
    }

    #[test]
    fn test_extract_prefers_labelled_time() {
        let header = "Invoice (Copy) 2024-02-01 10:00:00 Invoice #: 16105 1/5/2024 9:00:00";
        let time = extract_invoice_time(header).unwrap();

        assert_eq!((time.month(), time.day(), time.hour()), (2, 1, 10));
    }

    #[test]
    fn test_extract_falls_back_to_us_time() {
        let header = "Page (1) Date: Invoice #: 16105 3/14/2024 18:45:12 Auction Sale - 132";
        let time = extract_invoice_time(header).unwrap();

        assert_eq!((time.month(), time.day(), time.hour(), time.minute()), (3, 14, 18, 45));
    }

    #[test]
    fn test_extract_without_time() {
        assert_eq!(extract_invoice_time("SOLD TO:someone@example.comLot#"), None);
    }
}
