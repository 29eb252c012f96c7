//! Small helpers for reading typed values out of Polars columns.

/// Returns the trimmed value, or `None` when it is missing or blank.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|trimmed| !trimmed.is_empty())
}
