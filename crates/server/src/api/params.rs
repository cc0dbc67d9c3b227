//! Query-string access that tolerates repeated keys.
//!
//! Extracting into `Query<Vec<(String, String)>>` never rejects a request
//! for a duplicated key; the first occurrence wins.

/// Decoded `key=value` pairs in request order.
pub type QueryPairs = Vec<(String, String)>;

/// First value for `key`, if present.
pub fn first_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}
