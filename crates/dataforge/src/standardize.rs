//! Value standardization keyed on canonical field semantics.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Field-name keywords that trigger date extraction.
const DATE_KEYWORDS: [&str; 5] = ["date", "time", "year", "month", "day"];

/// Field-name keywords that trigger URL scheme repair.
const URL_KEYWORDS: [&str; 3] = ["url", "link", "website"];

/// Field-name keywords that trigger numeric price parsing.
const PRICE_KEYWORDS: [&str; 3] = ["price", "cost", "fee"];

/// Date-like substring: `D{1,4}[-/.]D{1,2}[-/.]D{1,4}` or the
/// two-digit-year variant.
static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,4}[-/.]\d{1,2}[-/.]\d{1,4}|\d{1,2}[-/.]\d{1,2}[-/.]\d{2,4})").unwrap()
});

/// Optional currency symbol followed by a grouped/decimal number.
static PRICE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[$£€]?\s*(\d+(?:,\d{3})*(?:\.\d{1,2})?)").unwrap());

fn contains_any(field: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| field.contains(k))
}

/// Clean a single value according to its canonical field name.
///
/// Non-string values and nulls pass through unchanged. Strings are
/// trimmed (empty becomes null), then the first matching keyword rule
/// applies: date-like fields keep the matched date substring verbatim
/// (reformatting happens at enhancement time), url-like fields gain an
/// `https://` scheme, price-like fields parse to a number with thousands
/// separators stripped. Anything else returns the trimmed string.
pub fn clean_value(value: &Value, canonical_field: &str) -> Value {
    let Value::String(raw) = value else {
        return value.clone();
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }

    let field = canonical_field.to_lowercase();

    if contains_any(&field, &DATE_KEYWORDS) {
        return match DATE_RE.find(trimmed) {
            Some(m) => Value::String(m.as_str().to_string()),
            None => Value::String(trimmed.to_string()),
        };
    }

    if contains_any(&field, &URL_KEYWORDS) {
        if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
            return Value::String(format!("https://{trimmed}"));
        }
        return Value::String(trimmed.to_string());
    }

    if contains_any(&field, &PRICE_KEYWORDS) {
        if let Some(caps) = PRICE_RE.captures(trimmed) {
            let numeric = caps[1].replace(',', "");
            if let Ok(parsed) = numeric.parse::<f64>() {
                if let Some(number) = serde_json::Number::from_f64(parsed) {
                    return Value::Number(number);
                }
            }
        }
        return Value::String(trimmed.to_string());
    }

    Value::String(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_string_passes_through() {
        assert_eq!(clean_value(&json!(42), "price"), json!(42));
        assert_eq!(clean_value(&json!(["a", "b"]), "features"), json!(["a", "b"]));
        assert_eq!(clean_value(&Value::Null, "anything"), Value::Null);
    }

    #[test]
    fn test_empty_string_becomes_null() {
        assert_eq!(clean_value(&json!("   "), "description"), Value::Null);
    }

    #[test]
    fn test_plain_string_is_trimmed() {
        assert_eq!(clean_value(&json!("  hello  "), "description"), json!("hello"));
    }

    #[test]
    fn test_date_substring_extracted_verbatim() {
        assert_eq!(
            clean_value(&json!("03/14/2024 and other text"), "release_date"),
            json!("03/14/2024")
        );
        assert_eq!(
            clean_value(&json!("updated 2023-01-05."), "last_updated_date"),
            json!("2023-01-05")
        );
    }

    #[test]
    fn test_date_field_without_pattern_returns_trimmed_original() {
        assert_eq!(clean_value(&json!(" unknown "), "launch_date"), json!("unknown"));
    }

    #[test]
    fn test_url_scheme_prepended() {
        assert_eq!(clean_value(&json!("example.com"), "url"), json!("https://example.com"));
        assert_eq!(
            clean_value(&json!("http://example.com"), "website"),
            json!("http://example.com")
        );
        assert_eq!(
            clean_value(&json!("https://example.com"), "link"),
            json!("https://example.com")
        );
    }

    #[test]
    fn test_price_parses_to_number() {
        assert_eq!(clean_value(&json!("$1,234.50"), "price"), json!(1234.5));
        assert_eq!(clean_value(&json!("£20"), "monthly_fee"), json!(20.0));
        assert_eq!(clean_value(&json!("about 99.99 per year"), "cost"), json!(99.99));
    }

    #[test]
    fn test_unparseable_price_keeps_original_string() {
        assert_eq!(clean_value(&json!("free"), "price"), json!("free"));
    }

    #[test]
    fn test_no_keyword_match_returns_trimmed() {
        assert_eq!(clean_value(&json!(" GPT-4 "), "model"), json!("GPT-4"));
    }
}
