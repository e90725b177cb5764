use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating display names
    /// Must start with a letter; allows letters, digits, spaces and a few punctuation marks
    /// - Valid: "Jane Doe", "K. O'Brien", "Worker 2"
    /// - Invalid: " leading space", "--", ""
    pub static ref DISPLAY_NAME_REGEX: Regex =
        Regex::new(r"^[\p{L}][\p{L}\p{N} .,'-]*$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_regex_valid() {
        assert!(DISPLAY_NAME_REGEX.is_match("Jane Doe"));
        assert!(DISPLAY_NAME_REGEX.is_match("K. O'Brien"));
        assert!(DISPLAY_NAME_REGEX.is_match("Worker 2"));
        assert!(DISPLAY_NAME_REGEX.is_match("José"));
    }

    #[test]
    fn test_display_name_regex_invalid() {
        assert!(!DISPLAY_NAME_REGEX.is_match("")); // empty
        assert!(!DISPLAY_NAME_REGEX.is_match(" leading space"));
        assert!(!DISPLAY_NAME_REGEX.is_match("--"));
        assert!(!DISPLAY_NAME_REGEX.is_match("1st")); // starts with digit
    }
}
