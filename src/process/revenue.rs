use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

static NOT_DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9.]").unwrap());

/// Parse a dollar amount such as `"$12,345.67"`.
///
/// Everything but ASCII digits and `.` is dropped before parsing. Absent,
/// empty or unparsable input (e.g. `"1.2.3"`) yields `0.0`.
pub fn parse_revenue(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return 0.0;
    };
    let digits = NOT_DECIMAL.replace_all(raw, "");
    match digits.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            trace!(raw, "revenue not parsable; using 0.0");
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dollar_strings() {
        assert_eq!(parse_revenue(Some("$1,234.50")), 1234.50);
        assert_eq!(parse_revenue(Some("$14,512,680")), 14_512_680.0);
        assert_eq!(parse_revenue(Some("  US$ 99 ")), 99.0);
    }

    #[test]
    fn degrades_to_zero() {
        assert_eq!(parse_revenue(None), 0.0);
        assert_eq!(parse_revenue(Some("")), 0.0);
        assert_eq!(parse_revenue(Some("abc")), 0.0);
        assert_eq!(parse_revenue(Some("1.2.3")), 0.0);
        assert_eq!(parse_revenue(Some(".")), 0.0);
    }

    #[test]
    fn never_negative_or_infinite() {
        assert_eq!(parse_revenue(Some("-$500")), 500.0);
        let huge = "9".repeat(400);
        assert_eq!(parse_revenue(Some(&huge)), 0.0);
    }
}
