//! Field parsing for interactive input. Each helper validates one field
//! the same way the menus do, so the rules are testable without a terminal.

use rust_decimal::Decimal;

/// Parse a positive integer identifier.
pub fn parse_id(s: &str) -> Option<i32> {
    match s.trim().parse::<i32>() {
        Ok(id) if id > 0 => Some(id),
        _ => None,
    }
}

/// Parse a quantity; must be a positive integer.
pub fn parse_quantity(s: &str) -> Option<i32> {
    parse_id(s)
}

/// Parse a strictly positive money amount.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    match s.trim().parse::<Decimal>() {
        Ok(amount) if amount > Decimal::ZERO => Some(amount),
        _ => None,
    }
}

/// Payment method: blank defaults to CARD, anything else is uppercased.
pub fn normalize_method(s: &str) -> String {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        "CARD".to_string()
    } else {
        trimmed.to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_positive_integers() {
        assert_eq!(parse_id("7"), Some(7));
        assert_eq!(parse_id(" 42 "), Some(42));
        assert_eq!(parse_id("0"), None);
        assert_eq!(parse_id("-3"), None);
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id("2.5"), None);
        assert_eq!(parse_id(""), None);
    }

    #[test]
    fn amounts_must_be_strictly_positive() {
        assert_eq!(parse_amount("50.00"), Some(Decimal::new(5000, 2)));
        assert_eq!(parse_amount("0"), None);
        assert_eq!(parse_amount("-1.50"), None);
        assert_eq!(parse_amount("lots"), None);
    }

    #[test]
    fn blank_method_defaults_to_card() {
        assert_eq!(normalize_method(""), "CARD");
        assert_eq!(normalize_method("   "), "CARD");
        assert_eq!(normalize_method("paypal"), "PAYPAL");
        assert_eq!(normalize_method(" Bank "), "BANK");
    }
}
