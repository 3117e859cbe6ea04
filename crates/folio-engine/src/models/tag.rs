use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

static SEPARATORS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("valid separator pattern"));

/// Turns a name into a URL slug: ASCII lowercase, words joined by `-`.
/// Accented letters fold to their base letter (NFKD); anything else outside
/// `[a-z0-9_-]` and whitespace is dropped.
pub fn slugify(value: &str) -> String {
    let kept: String = value
        .nfkd()
        .filter(char::is_ascii)
        .collect::<String>()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();
    SEPARATORS_RE
        .replace_all(kept.trim(), "-")
        .trim_matches(['-', '_'])
        .to_string()
}

/// Whether `value` is usable as a slug as-is.
pub fn is_valid_slug(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// A listing label. Stored either as a bare name or as `{name, slug}`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "StoredTag")]
pub struct Tag {
    pub name: String,
    pub slug: String,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let slug = slugify(&name);
        Self { name, slug }
    }
}

/// One tag per slug, sorted by name. The first spelling seen wins.
pub fn distinct_tags<'a>(tags: impl IntoIterator<Item = &'a Tag>) -> Vec<&'a Tag> {
    let mut by_slug: BTreeMap<&str, &Tag> = BTreeMap::new();
    for tag in tags {
        by_slug.entry(tag.slug.as_str()).or_insert(tag);
    }
    let mut distinct: Vec<&Tag> = by_slug.into_values().collect();
    distinct.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.slug.cmp(&b.slug)));
    distinct
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredTag {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        slug: String,
    },
}

impl From<StoredTag> for Tag {
    fn from(stored: StoredTag) -> Self {
        match stored {
            StoredTag::Name(name) => Tag::new(name),
            StoredTag::Full { name, slug } if slug.is_empty() => Tag::new(name),
            StoredTag::Full { name, slug } => Tag { name, slug },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Rust", "rust")]
    #[case("Machine Learning", "machine-learning")]
    #[case("  C++ & Python  ", "c-python")]
    #[case("data--science__", "data-science")]
    #[case("Café Racer", "cafe-racer")]
    #[case("Ünïcode", "unicode")]
    #[case("Straße", "strae")]
    #[case("!!!", "")]
    fn slugify_matches_url_rules(#[case] name: &str, #[case] slug: &str) {
        assert_eq!(slugify(name), slug);
    }

    #[test]
    fn tags_read_from_names_or_objects() {
        let tags: Vec<Tag> =
            serde_json::from_str(r#"["Web Dev", {"name": "Go"}, {"name": "Misc", "slug": "other"}]"#)
                .unwrap();
        assert_eq!(tags[0].slug, "web-dev");
        assert_eq!(tags[1].slug, "go");
        assert_eq!(tags[2].slug, "other");
    }

    #[test]
    fn distinct_tags_merge_spellings_of_one_slug() {
        let tags = [Tag::new("Rust"), Tag::new("Web"), Tag::new("rust"), Tag::new("RUST")];
        let names: Vec<_> = distinct_tags(&tags).iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Rust", "Web"]);
    }

    #[test]
    fn slug_validity() {
        assert!(is_valid_slug("hello-world_2"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("with space"));
        assert!(!is_valid_slug("../etc"));
    }
}
