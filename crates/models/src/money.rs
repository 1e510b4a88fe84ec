//! Money is stored as integer minor units (cents).

/// Format cents with a currency symbol, e.g. `$1,250.50` or `-$5.00`.
pub fn format_cents(cents: i64, symbol: &str) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let units = abs / 100;
    let minor = abs % 100;
    format!("{sign}{symbol}{}.{minor:02}", group_thousands(units))
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::format_cents;

    #[test]
    fn formats_units_and_minor() {
        assert_eq!(format_cents(0, "$"), "$0.00");
        assert_eq!(format_cents(5, "$"), "$0.05");
        assert_eq!(format_cents(125050, "$"), "$1,250.50");
        assert_eq!(format_cents(100000000, "€"), "€1,000,000.00");
    }

    #[test]
    fn negative_amounts_keep_sign_before_symbol() {
        assert_eq!(format_cents(-500, "$"), "-$5.00");
    }
}
