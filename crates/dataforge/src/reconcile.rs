//! Field reconciliation: mapping raw field names onto the target schema.
//!
//! Layered heuristics with explicit priority: a cached decision always
//! wins, then exact normalized match, then substring containment in
//! schema order, then common-prefix similarity, then a normalized
//! fallback. Once a raw key is mapped in a run, every later occurrence of
//! that exact key reuses the same canonical name.

use indexmap::IndexMap;

use crate::schema::TargetSchema;

/// Minimum normalized length for the prefix-similarity rule to apply.
const PREFIX_MIN_LEN: usize = 3;

/// Fraction of the shorter normalized string the common prefix must exceed.
const PREFIX_RATIO: f64 = 0.7;

/// Append-only cache of raw-key to canonical-name decisions for one run.
///
/// The first decision for a raw key is authoritative: `insert` never
/// overwrites. Keys are the raw names exactly as first observed.
#[derive(Debug, Clone, Default)]
pub struct MappingCache {
    mappings: IndexMap<String, String>,
}

impl MappingCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the cached canonical name for a raw key.
    pub fn get(&self, raw_key: &str) -> Option<&str> {
        self.mappings.get(raw_key).map(String::as_str)
    }

    /// Record a decision. A key already present keeps its first mapping.
    pub fn insert(&mut self, raw_key: impl Into<String>, canonical: impl Into<String>) {
        self.mappings.entry(raw_key.into()).or_insert(canonical.into());
    }

    /// Number of cached decisions.
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Iterate over (raw key, canonical name) pairs in decision order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.mappings.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Normalize a field name for comparison: lowercase, spaces and hyphens
/// become underscores.
pub fn normalize_key(key: &str) -> String {
    key.to_lowercase().replace([' ', '-'], "_")
}

/// Length of the common leading-character prefix of two strings.
fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .count()
}

/// Whether two normalized names clear the common-prefix similarity bar.
fn prefix_similar(a: &str, b: &str) -> bool {
    let (a_len, b_len) = (a.chars().count(), b.chars().count());
    if a_len <= PREFIX_MIN_LEN || b_len <= PREFIX_MIN_LEN {
        return false;
    }
    let shorter = a_len.min(b_len);
    common_prefix_len(a, b) as f64 > shorter as f64 * PREFIX_RATIO
}

/// Whether two field names are similar under the exact / substring /
/// prefix-ratio rule. Used for one-shot template mapping, where no cache
/// is consulted.
pub fn fields_similar(field_a: &str, field_b: &str) -> bool {
    let a = normalize_key(field_a);
    let b = normalize_key(field_b);

    if a == b {
        return true;
    }
    if a.contains(&b) || b.contains(&a) {
        return true;
    }
    prefix_similar(&a, &b)
}

/// Map a raw field name to its canonical name for this run.
///
/// Exact matches always win over fuzzy ones; schema order breaks ties
/// among equally-fuzzy candidates; the cache guarantees idempotence.
/// A key with no schema match maps to its normalized form.
pub fn reconcile_field(raw_key: &str, schema: &TargetSchema, cache: &mut MappingCache) -> String {
    if let Some(canonical) = cache.get(raw_key) {
        return canonical.to_string();
    }

    let normalized = normalize_key(raw_key);

    for field in schema.fields() {
        if normalized == normalize_key(&field.name) {
            cache.insert(raw_key, field.name.clone());
            return field.name.clone();
        }
    }

    for field in schema.fields() {
        let target = normalize_key(&field.name);
        if normalized.contains(&target) || target.contains(&normalized) {
            cache.insert(raw_key, field.name.clone());
            return field.name.clone();
        }
    }

    for field in schema.fields() {
        if prefix_similar(&normalized, &normalize_key(&field.name)) {
            cache.insert(raw_key, field.name.clone());
            return field.name.clone();
        }
    }

    cache.insert(raw_key, normalized.clone());
    normalized
}
