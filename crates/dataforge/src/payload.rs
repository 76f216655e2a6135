//! Tolerant decoding of stage output payloads.
//!
//! Upstream stages and the oracle return records in several shapes: a
//! bare list, an object wrapping the list under a known key, or raw text
//! with an embedded JSON array. Unparseable payloads degrade to an empty
//! list rather than failing the stage.

use serde_json::Value;

use crate::record::Record;

/// Keys under which a payload may nest its record list, in probe order.
const RECORD_LIST_KEYS: [&str; 4] = ["data", "processed_data", "extracted_data", "validated_data"];

/// Extract a record list from a stage output payload.
pub fn extract_records(payload: &Value) -> Vec<Record> {
    extract_records_counted(payload).0
}

/// Extract a record list, also counting elements that had to be dropped
/// because they were not objects. Processing continues past a dropped
/// record; the count surfaces in stage summaries.
pub fn extract_records_counted(payload: &Value) -> (Vec<Record>, usize) {
    match payload {
        Value::Array(items) => convert(items),
        Value::Object(map) => {
            for key in RECORD_LIST_KEYS {
                if let Some(Value::Array(items)) = map.get(key) {
                    return convert(items);
                }
            }
            (Vec::new(), 0)
        }
        Value::String(text) => extract_records_from_text(text),
        _ => (Vec::new(), 0),
    }
}

fn convert(items: &[Value]) -> (Vec<Record>, usize) {
    let records: Vec<Record> = items.iter().filter_map(to_record).collect();
    let dropped = items.len() - records.len();
    (records, dropped)
}

/// Locate an embedded JSON array in free text via the first `[` and last
/// `]` and parse it. Anything unparseable yields an empty list.
fn extract_records_from_text(text: &str) -> (Vec<Record>, usize) {
    let (Some(start), Some(end)) = (text.find('['), text.rfind(']')) else {
        return (Vec::new(), 0);
    };
    if end <= start {
        return (Vec::new(), 0);
    }

    match serde_json::from_str::<Value>(&text[start..=end]) {
        Ok(Value::Array(items)) => convert(&items),
        _ => (Vec::new(), 0),
    }
}

/// Convert one payload element to a record. Non-object elements are
/// dropped.
fn to_record(value: &Value) -> Option<Record> {
    match value {
        Value::Object(map) => Some(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()),
        _ => None,
    }
}
