//! Anchor slugs for aggregated items.

use regex::Regex;
use std::sync::LazyLock;

/// Runs of characters that are not Unicode word characters
static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W+").unwrap());

/// Lowercase `title` and collapse every run of non-word characters into `-`.
///
/// Leading and trailing punctuation is kept as a hyphen, not trimmed:
/// `"Café & Co."` becomes `"café-co-"`.
pub fn slugify_title(title: &str) -> String {
    NON_WORD.replace_all(&title.to_lowercase(), "-").into_owned()
}

/// Slug used as an item's `link`; `None` when there is no usable title.
pub fn link_for(title: Option<&str>) -> Option<String> {
    title.filter(|t| !t.is_empty()).map(slugify_title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_spaces() {
        assert_eq!(slugify_title("Hello World"), "hello-world");
    }

    #[test]
    fn test_slugify_keeps_unicode_letters() {
        assert_eq!(slugify_title("Café & Co."), "café-co-");
    }

    #[test]
    fn test_slugify_trailing_punctuation() {
        assert_eq!(slugify_title("Hello, World!"), "hello-world-");
    }

    #[test]
    fn test_slugify_leading_punctuation() {
        assert_eq!(slugify_title("  (Draft) notes"), "-draft-notes");
    }

    #[test]
    fn test_slugify_keeps_underscores_and_digits() {
        assert_eq!(slugify_title("Part_2 of 10"), "part_2-of-10");
    }

    #[test]
    fn test_link_absent_without_title() {
        assert_eq!(link_for(None), None);
        assert_eq!(link_for(Some("")), None);
        assert_eq!(link_for(Some("A")), Some("a".to_string()));
    }
}
