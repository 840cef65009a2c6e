//! Whitespace normalisation shared by every stage of the pipeline.

/// Collapses internal whitespace runs to single spaces and trims the ends.
pub fn clean(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Variant of [`clean`] for optional values; a missing value becomes the
/// empty string.
pub fn clean_opt(value: Option<&str>) -> String {
    value.map(clean).unwrap_or_default()
}
