//! Numeric literals with engineering suffixes.

/// Parse a number string with optional unit suffix.
///
/// Plain floats are tried first, so exponents such as `1e-9` are never
/// mistaken for suffixes. `m` is milli, `M` and `meg` are mega.
pub fn parse_value(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(v) = text.parse::<f64>() {
        return Some(v);
    }

    let split = text.len().saturating_sub(3);
    if let Some(suffix) = text.get(split..) {
        if split > 0 && suffix.eq_ignore_ascii_case("meg") {
            return text[..split].parse::<f64>().ok().map(|v| v * 1e6);
        }
    }

    let last = text.chars().last()?;
    let multiplier = match last {
        'f' | 'F' => 1e-15,
        'p' | 'P' => 1e-12,
        'n' | 'N' => 1e-9,
        'u' | 'U' | 'µ' => 1e-6,
        'm' => 1e-3,
        'k' | 'K' => 1e3,
        'M' => 1e6,
        'g' | 'G' => 1e9,
        't' | 'T' => 1e12,
        _ => return None,
    };

    text[..text.len() - last.len_utf8()]
        .parse::<f64>()
        .ok()
        .map(|v| v * multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Option<f64>, b: Option<f64>) -> bool {
        match (a, b) {
            (Some(x), Some(y)) => (x - y).abs() < x.abs() * 1e-10 + 1e-15,
            (None, None) => true,
            _ => false,
        }
    }

    #[test]
    fn test_parse_value() {
        assert!(approx_eq(parse_value("10k"), Some(10_000.0)));
        assert!(approx_eq(parse_value("100n"), Some(100e-9)));
        assert!(approx_eq(parse_value("4.7u"), Some(4.7e-6)));
        assert!(approx_eq(parse_value("1M"), Some(1_000_000.0)));
        assert!(approx_eq(parse_value("2.2meg"), Some(2_200_000.0)));
        assert!(approx_eq(parse_value("10m"), Some(0.01)));
        assert!(approx_eq(parse_value("2.2"), Some(2.2)));
        assert!(approx_eq(parse_value("1e-9"), Some(1e-9)));
        assert!(approx_eq(parse_value(" 10 "), Some(10.0)));
    }

    #[test]
    fn test_parse_value_rejects_garbage() {
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("abc"), None);
        assert_eq!(parse_value("10x"), None);
        assert_eq!(parse_value("k"), None);
        assert_eq!(parse_value("SIN(0 1 50)"), None);
    }
}
