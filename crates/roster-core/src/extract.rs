//! Code extraction from a free-text groups cell.

use std::sync::LazyLock;

use regex::Regex;
use roster_model::Code;

/// Maximal runs of ASCII digits; everything else separates codes.
static CODE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("Invalid code run regex"));

/// Extract every code from a raw cell, in order, duplicates kept.
///
/// A missing cell yields no codes.
///
/// ```
/// use roster_core::extract_codes;
/// use roster_model::Code;
///
/// assert_eq!(extract_codes(Some("5016, 5944;5016")), vec![Code(5016), Code(5944), Code(5016)]);
/// assert!(extract_codes(None).is_empty());
/// ```
pub fn extract_codes(raw: Option<&str>) -> Vec<Code> {
    let Some(text) = raw else {
        return Vec::new();
    };
    CODE_RUN
        .find_iter(text)
        .map(|found| Code::from_digits(found.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_and_punctuation_separate_codes() {
        assert_eq!(
            extract_codes(Some("abc 4538")),
            vec![Code(4538)],
        );
        assert_eq!(
            extract_codes(Some("G5016-C5944/x")),
            vec![Code(5016), Code(5944)],
        );
    }

    #[test]
    fn empty_and_blank_cells_have_no_codes() {
        assert!(extract_codes(Some("")).is_empty());
        assert!(extract_codes(Some("   ")).is_empty());
        assert!(extract_codes(Some("aucun groupe")).is_empty());
    }

    #[test]
    fn decimal_points_split_runs() {
        assert_eq!(extract_codes(Some("5016.0")), vec![Code(5016), Code(0)]);
    }
}
