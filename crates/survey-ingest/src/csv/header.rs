//! CSV header normalization.

/// Normalizes a header cell: strips a UTF-8 BOM and collapses inner whitespace.
pub fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}').trim();
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}
