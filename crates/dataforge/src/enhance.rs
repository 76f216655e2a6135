//! Post-validation enhancement: applying oracle-suggested fixes.
//!
//! The review response may carry `fixes: [{field, action, format?}]`.
//! Supported actions are `remove` (drop the field everywhere) and
//! `standardize` with a format hint (date reformatting to `YYYY-MM-DD`,
//! URL scheme repair). Unknown actions and hints are ignored.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::record::Record;

/// A single fix instruction from the review response.
#[derive(Debug, Clone, Deserialize)]
pub struct Fix {
    /// Field the fix applies to.
    pub field: String,
    /// What to do: `remove` or `standardize`.
    pub action: String,
    /// Format hint for `standardize` fixes.
    #[serde(default)]
    pub format: Option<String>,
}

static YMD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})").unwrap());
static DMY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})[-/.](\d{1,2})[-/.](\d{4})").unwrap());

const DATE_HINTS: [&str; 4] = ["date", "yyyy-mm-dd", "mm/dd/yyyy", "date-iso"];
const URL_HINTS: [&str; 3] = ["url", "website", "link"];

/// Read the fix list out of a review response, tolerating absence and
/// malformed entries.
pub fn fixes_from_report(report: &Value) -> Vec<Fix> {
    report
        .get("fixes")
        .and_then(Value::as_array)
        .map(|fixes| {
            fixes
                .iter()
                .filter_map(|f| serde_json::from_value(f.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// Apply fixes to every record, in fix order.
pub fn apply_fixes(mut records: Vec<Record>, fixes: &[Fix]) -> Vec<Record> {
    for fix in fixes {
        match fix.action.as_str() {
            "remove" => {
                for record in &mut records {
                    record.shift_remove(&fix.field);
                }
            }
            "standardize" => {
                let Some(ref hint) = fix.format else {
                    continue;
                };
                for record in &mut records {
                    if let Some(value) = record.get_mut(&fix.field) {
                        *value = standardize_value(value, hint);
                    }
                }
            }
            _ => {}
        }
    }
    records
}

/// Rewrite a value according to a format hint.
pub fn standardize_value(value: &Value, format_hint: &str) -> Value {
    let Value::String(raw) = value else {
        return value.clone();
    };
    let trimmed = raw.trim();
    let hint = format_hint.to_lowercase();

    if DATE_HINTS.contains(&hint.as_str()) {
        if let Some(date) = reformat_date(trimmed, &hint) {
            return Value::String(date);
        }
        return Value::String(trimmed.to_string());
    }

    if URL_HINTS.contains(&hint.as_str()) {
        if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
            return Value::String(format!("https://{trimmed}"));
        }
        return Value::String(trimmed.to_string());
    }

    value.clone()
}

/// Reformat a date-bearing string to `YYYY-MM-DD`.
///
/// Year-first dates are unambiguous. Year-last dates follow the hint:
/// `mm/dd/yyyy` reads month first, anything else day first. Month and day
/// must fall in their calendar ranges or the input is left alone.
fn reformat_date(value: &str, hint: &str) -> Option<String> {
    if let Some(caps) = YMD_RE.captures(value) {
        let year = &caps[1];
        let month = caps[2].parse::<u32>().ok()?;
        let day = caps[3].parse::<u32>().ok()?;
        if (1..=12).contains(&month) && (1..=31).contains(&day) {
            return Some(format!("{year}-{month:02}-{day:02}"));
        }
    }

    if let Some(caps) = DMY_RE.captures(value) {
        let year = &caps[3];
        let (month, day) = if hint == "mm/dd/yyyy" {
            (caps[1].parse::<u32>().ok()?, caps[2].parse::<u32>().ok()?)
        } else {
            (caps[2].parse::<u32>().ok()?, caps[1].parse::<u32>().ok()?)
        };
        if (1..=12).contains(&month) && (1..=31).contains(&day) {
            return Some(format!("{year}-{month:02}-{day:02}"));
        }
    }

    None
}
