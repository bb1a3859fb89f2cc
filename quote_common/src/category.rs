//! Category filter used when picking and listing quotes.

use std::fmt;

use strum_macros::EnumString;

use crate::quote::Quote;

/// Sentinel meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";

/// Which quotes a random pick may choose from.
#[derive(Debug, Clone, PartialEq, Eq, Default, EnumString)]
pub enum CategoryFilter {
    /// Every quote matches.
    #[default]
    #[strum(serialize = "all")]
    All,
    /// Only quotes whose category equals the given name exactly.
    #[strum(default)]
    Category(String),
}

impl CategoryFilter {
    /// Parse user or storage input. Blank input means no filter.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CategoryFilter::All;
        }
        trimmed.parse().unwrap_or_default()
    }

    /// Whether `quote` passes this filter.
    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(name) => quote.category == *name,
        }
    }
}

impl From<Option<&str>> for CategoryFilter {
    fn from(raw: Option<&str>) -> Self {
        raw.map(CategoryFilter::parse).unwrap_or_default()
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(ALL_CATEGORIES),
            CategoryFilter::Category(name) => f.write_str(name),
        }
    }
}

/// Unique categories of `quotes` in first-seen order.
pub fn unique_categories(quotes: &[Quote]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for quote in quotes {
        if !categories.contains(&quote.category) {
            categories.push(quote.category.clone());
        }
    }
    categories
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_recognises_sentinel_and_blank() {
        assert_eq!(CategoryFilter::parse("all"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse("  "), CategoryFilter::All);
        assert_eq!(CategoryFilter::from(None), CategoryFilter::All);
    }

    #[test]
    fn parse_keeps_other_names_verbatim() {
        assert_eq!(
            CategoryFilter::parse(" Wisdom "),
            CategoryFilter::Category("Wisdom".to_string())
        );
        assert_eq!(
            CategoryFilter::parse("All"),
            CategoryFilter::Category("All".to_string())
        );
    }

    #[test]
    fn display_round_trips_through_parse() {
        for raw in ["all", "Motivation"] {
            assert_eq!(CategoryFilter::parse(raw).to_string(), raw);
        }
    }

    #[test]
    fn matches_is_exact() {
        let quote = Quote::new("a", "Wisdom").unwrap();
        assert!(CategoryFilter::All.matches(&quote));
        assert!(CategoryFilter::parse("Wisdom").matches(&quote));
        assert!(!CategoryFilter::parse("wisdom").matches(&quote));
    }

    #[test]
    fn unique_categories_keeps_first_seen_order() {
        let quotes = vec![
            Quote::new("a", "B").unwrap(),
            Quote::new("b", "A").unwrap(),
            Quote::new("c", "B").unwrap(),
        ];
        assert_eq!(unique_categories(&quotes), vec!["B", "A"]);
    }
}
