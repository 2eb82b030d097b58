//! Task Queue
//!
//! The queue file selects which template ids to process in this run:
//! newline-delimited, `#` comments, order and duplicates preserved. An id
//! that appears twice is processed twice.

use std::fs;
use std::path::Path;

use crate::types::Result;

const COMMENT_MARKER: char = '#';

/// Load the ordered queue of template ids from a file.
pub fn load_queue(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)?;
    Ok(parse_queue(&text))
}

/// Split queue text into ids: trim, drop blanks, drop comment lines.
pub fn parse_queue(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(COMMENT_MARKER))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_drops_blanks_and_comments() {
        let text = "5\n\n  # header comment\n7\n   \n# trailing\n";
        assert_eq!(parse_queue(text), vec!["5", "7"]);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(parse_queue("  42  \n"), vec!["42"]);
    }

    #[test]
    fn test_parse_preserves_order_and_duplicates() {
        let text = "5\n9\n5\n";
        assert_eq!(parse_queue(text), vec!["5", "9", "5"]);
    }

    #[test]
    fn test_indented_comment_is_still_a_comment() {
        assert!(parse_queue("   # nothing here").is_empty());
    }

    #[test]
    fn test_empty_input_yields_empty_queue() {
        assert!(parse_queue("").is_empty());
    }
}
