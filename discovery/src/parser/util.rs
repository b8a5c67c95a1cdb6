//! Line splitting helpers for help text rows.

/// Column separator between an entry's label and its description.
pub const COLUMN_SEPARATOR: &str = "  ";

/// Splits an entry row on the first double space.
///
/// The label is the trimmed first segment; the description is every other
/// segment rejoined with the same separator and trimmed, so double spaces
/// inside the description survive.
pub fn split_entry(line: &str) -> (String, String) {
    let mut segments = line.split(COLUMN_SEPARATOR);
    let label = segments.next().unwrap_or_default().trim().to_string();
    let description = segments
        .collect::<Vec<_>>()
        .join(COLUMN_SEPARATOR)
        .trim()
        .to_string();
    (label, description)
}

/// Returns everything after the first `:` of a `Usage:` line, trimmed.
pub fn usage_remainder(line: &str) -> String {
    line.split_once(':')
        .map(|(_, rest)| rest.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_entry_on_wide_gap() {
        assert_eq!(
            split_entry("foo    does a thing"),
            ("foo".to_string(), "does a thing".to_string())
        );
    }

    #[test]
    fn test_split_entry_odd_gap_keeps_single_space_trimmed() {
        // Five spaces leave a lone space segment that trimming removes.
        assert_eq!(
            split_entry("-o, --output <PATH>     Output file"),
            ("-o, --output <PATH>".to_string(), "Output file".to_string())
        );
    }

    #[test]
    fn test_split_entry_single_spaces_stay_in_label() {
        assert_eq!(
            split_entry("--dry-run do nothing"),
            ("--dry-run do nothing".to_string(), String::new())
        );
    }

    #[test]
    fn test_usage_remainder() {
        assert_eq!(usage_remainder("Usage: a:b: c"), "a:b: c");
        assert_eq!(usage_remainder("Usage:"), "");
    }
}
