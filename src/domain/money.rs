// Prices are stored as integer cents and rendered with two fraction digits.

// 99 999 999.99
pub const MAX_PRICE_CENTS: i64 = 9_999_999_999;

/// Parses `"150"`, `"150.5"` or `"150,50"` into cents. At most two fraction
/// digits; negative values and anything above the maximum are rejected.
pub fn parse_price_cents(raw: &str) -> Option<i64> {
    let normalized = raw.trim().replace(',', ".");
    let (whole, fraction) = match normalized.split_once('.') {
        Some((whole, fraction)) if !fraction.is_empty() => (whole, fraction),
        Some(_) => return None,
        None => (normalized.as_str(), ""),
    };
    if whole.is_empty() || whole.len() > 8 || fraction.len() > 2 {
        return None;
    }
    if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let whole: i64 = whole.parse().ok()?;
    let fraction: i64 = format!("{fraction:0<2}").parse().ok()?;
    let cents = whole * 100 + fraction;
    (cents <= MAX_PRICE_CENTS).then_some(cents)
}

pub fn format_cents(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_and_fractional_prices() {
        assert_eq!(parse_price_cents("150"), Some(15_000));
        assert_eq!(parse_price_cents("150.5"), Some(15_050));
        assert_eq!(parse_price_cents("150,05"), Some(15_005));
        assert_eq!(parse_price_cents("0"), Some(0));
        assert_eq!(parse_price_cents("99999999.99"), Some(MAX_PRICE_CENTS));
    }

    #[test]
    fn rejects_malformed_or_out_of_range_prices() {
        for raw in ["", "-1", "1.234", "1.", ".5", "abc", "100000000", "1e2"] {
            assert_eq!(parse_price_cents(raw), None, "{raw:?} should be rejected");
        }
    }

    #[test]
    fn formats_with_two_fraction_digits() {
        assert_eq!(format_cents(15_000), "150.00");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(1_050), "10.50");
    }
}
