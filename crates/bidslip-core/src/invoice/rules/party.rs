//! Buyer name, address, and phone heuristics.

use super::patterns::FIRST_DIGIT;

/// Split a run-on `"<name><address>"` string at its first digit.
///
/// Returns `None` when the text has no digit at all. Buyers whose name
/// contains a digit are split too early; the layout offers nothing better.
pub fn split_name_address(text: &str) -> Option<(String, String)> {
    let text = text.trim();
    let at = FIRST_DIGIT.find(text)?.start();

    Some((
        text[..at].trim().to_string(),
        text[at..].trim().to_string(),
    ))
}

/// Strip hyphens and spaces from a phone number.
pub fn normalize_phone(raw: &str) -> String {
    raw.trim().chars().filter(|c| *c != '-' && *c != ' ').collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_name_address() {
        assert_eq!(
            split_name_address(" Julius Roy 12 King St W Toronto ON "),
            Some(("Julius Roy".to_string(), "12 King St W Toronto ON".to_string()))
        );
    }

    #[test]
    fn test_split_without_digit() {
        assert_eq!(split_name_address("Julius Roy"), None);
    }

    #[test]
    fn test_split_name_with_digit() {
        // Known limitation of the layout
        assert_eq!(
            split_name_address("R2 Traders 5 Main St"),
            Some(("R".to_string(), "2 Traders 5 Main St".to_string()))
        );
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone(" 416-555 0199 "), "4165550199");
        assert_eq!(normalize_phone("+1 647-000-1111"), "+16470001111");
    }
}
