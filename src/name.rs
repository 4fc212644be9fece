// name.rs
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Canonical key for a country, continent or player name: all whitespace
/// removed, lowercased.
pub fn normalize_name(name: &str) -> String {
    WHITESPACE.replace_all(name, "").to_lowercase()
}

pub fn names_match(a: &str, b: &str) -> bool {
    normalize_name(a) == normalize_name(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_whitespace_and_case() {
        assert_eq!(normalize_name("  North\tAmerica "), "northamerica");
        assert_eq!(normalize_name("Great Britain"), "greatbritain");
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn matching_ignores_spacing() {
        assert!(names_match("New Guinea", "newguinea"));
        assert!(names_match("EAST AFRICA", " east  africa"));
        assert!(!names_match("Egypt", "Egypt2"));
    }
}
