//! Quote data model.
//!
//! A `Quote` is a piece of text together with the category it belongs to. Quotes
//! have no identifier: two quotes are the same when their text and category match.
//! Every constructor trims both fields and rejects empty ones, so a `Quote` in hand
//! always satisfies the shape the store relies on.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::QuoteError;
use crate::result::Result;

/// Ordered list of quotes, insertion order preserved.
pub type QuoteList = Vec<Quote>;

/// A single (text, category) record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quote {
    /// Quote body, trimmed and non-empty.
    pub text: String,
    /// Category label, trimmed and non-empty.
    pub category: String,
}

impl Quote {
    /// Build a quote from raw user input.
    ///
    /// Both fields are trimmed. Fails with `QuoteError::Validation` when either one
    /// is empty afterwards.
    pub fn new(text: &str, category: &str) -> Result<Self> {
        let text = text.trim();
        let category = category.trim();

        if text.is_empty() {
            return Err(QuoteError::Validation("quote text is empty".to_string()));
        }
        if category.is_empty() {
            return Err(QuoteError::Validation("quote category is empty".to_string()));
        }

        Ok(Quote {
            text: text.to_string(),
            category: category.to_string(),
        })
    }

    /// Try to read a quote out of an arbitrary JSON value.
    ///
    /// Returns `None` when the value is not an object, a field is missing or not a
    /// string, or a field is empty after trimming. Extra fields are ignored.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let text = object.get("text")?.as_str()?;
        let category = object.get("category")?.as_str()?;
        Quote::new(text, category).ok()
    }

    /// Case-insensitive identity key: lowercased text and category.
    pub(crate) fn folded_key(&self) -> (String, String) {
        (self.text.to_lowercase(), self.category.to_lowercase())
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" ({})", self.text, self.category)
    }
}

/// The list used when durable storage holds nothing usable.
pub fn default_quotes() -> QuoteList {
    [
        (
            "The best way to get started is to quit talking and begin doing.",
            "Motivation",
        ),
        ("Success is not in what you have, but who you are.", "Success"),
        ("In the middle of every difficulty lies opportunity.", "Wisdom"),
    ]
    .into_iter()
    .map(|(text, category)| Quote {
        text: text.to_string(),
        category: category.to_string(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_trims_both_fields() {
        let quote = Quote::new("  Stay hungry.  ", "\tLife ").unwrap();
        assert_eq!(quote.text, "Stay hungry.");
        assert_eq!(quote.category, "Life");
    }

    #[test]
    fn new_rejects_blank_fields() {
        assert!(matches!(Quote::new("", "x"), Err(QuoteError::Validation(_))));
        assert!(matches!(Quote::new("x", "   "), Err(QuoteError::Validation(_))));
    }

    #[test]
    fn from_value_checks_shape() {
        assert_eq!(
            Quote::from_value(&json!({"text": " a ", "category": "M", "extra": 1})),
            Some(Quote::new("a", "M").unwrap())
        );
        assert_eq!(Quote::from_value(&json!({"text": "a"})), None);
        assert_eq!(Quote::from_value(&json!({"text": 3, "category": "M"})), None);
        assert_eq!(Quote::from_value(&json!({"text": "", "category": "M"})), None);
        assert_eq!(Quote::from_value(&json!("a")), None);
    }

    #[test]
    fn defaults_are_valid_quotes() {
        let defaults = default_quotes();
        assert_eq!(defaults.len(), 3);
        for quote in &defaults {
            let rebuilt = Quote::new(&quote.text, &quote.category).unwrap();
            assert_eq!(&rebuilt, quote);
        }
    }

    #[test]
    fn display_shows_text_and_category() {
        let quote = Quote::new("a", "M").unwrap();
        assert_eq!(quote.to_string(), "\"a\" (M)");
    }
}
