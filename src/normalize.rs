//! Registration number normalization
//!
//! Every cache key and upstream URL is built from the normalized form, so two
//! inputs that differ only by case or whitespace resolve to the same record.

/// Canonicalizes a free-form registration number into its lookup key
///
/// Removes every whitespace character (leading, trailing and internal) and
/// upper-cases the remainder. Empty input yields an empty string.
///
/// # Examples
/// ```
/// assert_eq!(rclookup::normalize::normalize_rc(" mh12 ab 1234 "), "MH12AB1234");
/// ```
pub fn normalize_rc(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_and_uppercases() {
        assert_eq!(normalize_rc(" ab 12 "), "AB12");
        assert_eq!(normalize_rc("AB12"), "AB12");
        assert_eq!(normalize_rc(" ab 12 "), normalize_rc("AB12"));
    }

    #[test]
    fn test_removes_internal_whitespace_runs() {
        assert_eq!(normalize_rc("mh 12\tab\n\n1234"), "MH12AB1234");
        assert_eq!(normalize_rc("  dl   3c  "), "DL3C");
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert_eq!(normalize_rc(""), "");
        assert_eq!(normalize_rc(" \t\r\n "), "");
    }

    #[test]
    fn test_is_idempotent() {
        for input in [" mh12 ab 1234 ", "Ka 01\tmj 2022", "", "ß x"] {
            let once = normalize_rc(input);
            assert_eq!(normalize_rc(&once), once, "input: {:?}", input);
        }
    }
}
