//! Query API response decoding.
//!
//! The query endpoint answers `{"ms": .., "query": .., "result": [...]}`.
//! For slug queries `result` must be an array of slug strings.

use std::collections::HashSet;

use sitekit_shared::{ContentSlug, FetchError};

/// Decode a slug query response. Any bad element rejects the whole body.
pub(crate) fn parse_slug_result(body: &str) -> Result<Vec<ContentSlug>, FetchError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| FetchError::malformed(format!("response is not JSON: {e}")))?;

    let items = value
        .get("result")
        .ok_or_else(|| FetchError::malformed("response has no `result` field"))?
        .as_array()
        .ok_or_else(|| FetchError::malformed("`result` is not an array"))?;

    let mut seen = HashSet::new();
    let mut slugs = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let raw = item
            .as_str()
            .ok_or_else(|| FetchError::malformed(format!("result[{index}] is not a string")))?;
        let slug = ContentSlug::parse(raw)
            .map_err(|e| FetchError::malformed(format!("result[{index}]: {e}")))?;
        if seen.insert(slug.clone()) {
            slugs.push(slug);
        }
    }

    Ok(slugs)
}
