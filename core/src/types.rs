//! Shared primitive types used across the wheel engine.

/// Money in minor units (cents). Signed so a settlement delta can be negative.
pub type Cents = i64;

/// A stable identifier for a registered player.
pub type PlayerId = String;

/// A unique identifier for one spin, assigned when the spin starts.
pub type SpinId = String;

/// Render cents as a plain decimal amount: `1250` → `"12.50"`, `-400` → `"-4.00"`.
pub fn format_cents(amount: Cents) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::format_cents;

    #[test]
    fn formats_positive_negative_and_zero() {
        assert_eq!(format_cents(1250), "12.50");
        assert_eq!(format_cents(-400), "-4.00");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(0), "0.00");
    }
}
