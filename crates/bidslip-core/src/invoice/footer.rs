//! Monetary totals from the invoice footer.

use rust_decimal::Decimal;
use tracing::debug;

use super::rules::{
    parse_money, parse_money_pair, round_cents, Extracted, DEFAULT_BALANCE, PAID_BALANCE,
    PREMIUM, TAX,
};

const PREMIUM_MARKER: &str = "Premium:";

/// Fields read from the footer region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FooterFields {
    pub invoice_total: Decimal,
    pub remaining_balance: Decimal,
    pub tax: Decimal,
    /// Exactly zero when the footer has no premium line.
    pub buyers_premium: Decimal,
}

/// Extract footer totals. Never fails; misses become diagnostics.
pub fn extract_footer(footer: &str) -> Extracted<FooterFields> {
    let mut result = Extracted::new(FooterFields::default());

    let balance = [&*DEFAULT_BALANCE, &*PAID_BALANCE]
        .into_iter()
        .find_map(|pattern| {
            pattern
                .captures(footer)
                .and_then(|caps| parse_money_pair(&caps[1]))
        });
    match balance {
        Some((total, remaining)) => {
            result.value.invoice_total = total;
            result.value.remaining_balance = remaining;
        }
        None => result.warn(
            "invoiceTotal",
            "no two amounts before \"Invoice Total:\" after \"Default:\" or \"PAID IN FULL\"",
        ),
    }

    match TAX.captures(footer) {
        Some(caps) => match parse_money(&caps[1]) {
            Some(tax) => result.value.tax = tax,
            None => result.warn("tax", format!("{:?} is not an amount", &caps[1])),
        },
        None => result.warn("tax", "no \"Quantity:\" ... \"Tax1\" run"),
    }

    if footer.contains(PREMIUM_MARKER) {
        match PREMIUM.captures(footer).and_then(|caps| parse_money(&caps[1])) {
            Some(premium) => result.value.buyers_premium = round_cents(premium),
            None => result.warn("buyersPremium", "no amount before \"Total Extended Price:\""),
        }
    }

    debug!(
        "Footer: total {}, remaining {}, tax {}, premium {}",
        result.value.invoice_total,
        result.value.remaining_balance,
        result.value.tax,
        result.value.buyers_premium
    );

    result
}
