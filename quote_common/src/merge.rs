//! Reconciling quote lists.
//!
//! `merge` is a one-way union: remote records are appended when their text is not
//! already present locally. Nothing local is ever removed or rewritten, so applying
//! the same remote list twice changes nothing the second time. `dedupe` is the only
//! operation that shrinks a list.

use std::collections::HashSet;

use crate::quote::{Quote, QuoteList};

/// How `dedupe` compares quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseMode {
    /// Text and category must match exactly.
    #[default]
    Sensitive,
    /// Text and category are compared after lowercasing.
    Insensitive,
}

/// Append every `remote` quote whose text has no exact match in `local`.
///
/// Remote order is preserved and a text repeated inside `remote` is appended once.
pub fn merge(local: &[Quote], remote: &[Quote]) -> QuoteList {
    let mut merged = local.to_vec();
    merge_into(&mut merged, remote);
    merged
}

/// In-place variant of [`merge`]. Returns how many quotes were appended.
pub fn merge_into(local: &mut QuoteList, remote: &[Quote]) -> usize {
    let mut known: HashSet<String> = local.iter().map(|q| q.text.clone()).collect();
    let before = local.len();

    for quote in remote {
        if known.insert(quote.text.clone()) {
            local.push(quote.clone());
        }
    }
    local.len() - before
}

/// Keep the first occurrence of each (text, category) pair. Returns how many were removed.
pub fn dedupe(quotes: &mut QuoteList, mode: CaseMode) -> usize {
    let before = quotes.len();
    let mut seen: HashSet<(String, String)> = HashSet::new();

    quotes.retain(|quote| {
        let key = match mode {
            CaseMode::Sensitive => (quote.text.clone(), quote.category.clone()),
            CaseMode::Insensitive => quote.folded_key(),
        };
        seen.insert(key)
    });
    before - quotes.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(text: &str, category: &str) -> Quote {
        Quote::new(text, category).unwrap()
    }

    #[test]
    fn merge_appends_only_unknown_texts() {
        let local = vec![q("a", "M")];
        let remote = vec![q("a", "M"), q("b", "S")];
        assert_eq!(merge(&local, &remote), vec![q("a", "M"), q("b", "S")]);
    }

    #[test]
    fn merge_matches_on_text_alone() {
        let local = vec![q("a", "M")];
        let remote = vec![q("a", "Server")];
        assert_eq!(merge(&local, &remote), local);
    }

    #[test]
    fn merge_is_idempotent() {
        let local = vec![q("a", "M"), q("c", "X")];
        let remote = vec![q("b", "S"), q("a", "M"), q("d", "S"), q("b", "S")];
        let once = merge(&local, &remote);
        assert_eq!(merge(&once, &remote), once);
        assert_eq!(once, vec![q("a", "M"), q("c", "X"), q("b", "S"), q("d", "S")]);
    }

    #[test]
    fn merge_never_removes_local_quotes() {
        let local = vec![q("a", "M"), q("a", "M"), q("z", "Z")];
        let merged = merge(&local, &[q("y", "Y")]);
        assert_eq!(&merged[..local.len()], &local[..]);
    }

    #[test]
    fn merge_into_counts_appended() {
        let mut local = vec![q("a", "M")];
        assert_eq!(merge_into(&mut local, &[q("b", "S"), q("a", "X")]), 1);
        assert_eq!(merge_into(&mut local, &[q("b", "S")]), 0);
    }

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let mut quotes = vec![q("a", "M"), q("b", "M"), q("a", "M"), q("a", "N")];
        assert_eq!(dedupe(&mut quotes, CaseMode::Sensitive), 1);
        assert_eq!(quotes, vec![q("a", "M"), q("b", "M"), q("a", "N")]);
    }

    #[test]
    fn dedupe_can_ignore_case() {
        let mut quotes = vec![q("Hello", "Greeting"), q("hello", "GREETING")];
        assert_eq!(dedupe(&mut quotes.clone(), CaseMode::Sensitive), 0);
        assert_eq!(dedupe(&mut quotes, CaseMode::Insensitive), 1);
        assert_eq!(quotes, vec![q("Hello", "Greeting")]);
    }
}
