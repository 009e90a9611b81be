//! Category resolution
//!
//! Maps a free-text transaction description to a category name using a
//! layered rule: exact match against the normalized description first, then
//! a prefix scan over the rules in declaration order. Exact matching runs
//! first so a short keyword can never shadow a longer keyword that names the
//! description exactly; the prefix scan then picks up descriptions that
//! carry trailing detail (a store number, a transaction id) after the
//! keyword.

use std::collections::HashMap;

use crate::rules::RuleSet;

/// Resolves transaction descriptions to category names
///
/// Holds the immutable rule table for the lifetime of a run. Safe to share
/// read-only across any number of concurrent summarization runs.
#[derive(Debug, Clone)]
pub struct CategoryResolver {
    rules: RuleSet,
    /// Exact-lookup index over the rule keywords (first declared wins)
    exact: HashMap<String, String>,
}

impl CategoryResolver {
    /// Create a resolver over a loaded rule set
    pub fn new(rules: RuleSet) -> Self {
        let mut exact: HashMap<String, String> = HashMap::new();
        for rule in rules.iter() {
            // First declaration wins on duplicate keywords
            exact
                .entry(rule.keyword.clone())
                .or_insert_with(|| rule.category.clone());
        }

        CategoryResolver { rules, exact }
    }

    /// Resolve a description to a category name
    ///
    /// Returns `None` when the description is empty after normalization or
    /// when no rule matches. Normalization is trim + Unicode lowercasing,
    /// which covers the Cyrillic keywords in the default rule table.
    pub fn resolve(&self, description: &str) -> Option<&str> {
        let normalized = description.trim().to_lowercase();
        if normalized.is_empty() {
            return None;
        }

        // Exact match short-circuits the prefix scan
        if let Some(category) = self.exact.get(&normalized) {
            return Some(category);
        }

        self.rules
            .iter()
            .find(|rule| normalized.starts_with(&rule.keyword))
            .map(|rule| rule.category.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleSet;

    fn resolver_from_toml(toml: &str) -> CategoryResolver {
        CategoryResolver::new(RuleSet::from_toml(toml).unwrap())
    }

    #[test]
    fn test_exact_match_beats_prefix_order() {
        // "ab" is declared before "a"; "a" still resolves exactly to X
        let resolver = resolver_from_toml(
            r#"
            [[rule]]
            keyword = "ab"
            category = "Y"

            [[rule]]
            keyword = "a"
            category = "X"
            "#,
        );

        assert_eq!(resolver.resolve("ab"), Some("Y"));
        assert_eq!(resolver.resolve("a"), Some("X"));
    }

    #[test]
    fn test_prefix_match_uses_declaration_order() {
        let resolver = resolver_from_toml(
            r#"
            [[rule]]
            keyword = "ab"
            category = "Y"

            [[rule]]
            keyword = "a"
            category = "X"
            "#,
        );

        // Both "ab" and "a" prefix "abc"; the first declared rule wins
        assert_eq!(resolver.resolve("abc"), Some("Y"));
    }

    #[test]
    fn test_normalizes_case_and_whitespace() {
        let resolver = resolver_from_toml(
            r#"
            [[rule]]
            keyword = "лукойл"
            category = "бензин"
            "#,
        );

        assert_eq!(resolver.resolve("  ЛУКОЙЛ АЗС 123  "), Some("бензин"));
    }

    #[test]
    fn test_empty_and_blank_descriptions_are_unresolved() {
        let resolver = resolver_from_toml(
            r#"
            [[rule]]
            keyword = "a"
            category = "X"
            "#,
        );

        assert_eq!(resolver.resolve(""), None);
        assert_eq!(resolver.resolve("   "), None);
    }

    #[test]
    fn test_unknown_description_is_unresolved() {
        let resolver = resolver_from_toml(
            r#"
            [[rule]]
            keyword = "пятёрочка"
            category = "продукты"
            "#,
        );

        assert_eq!(resolver.resolve("unknown shop"), None);
    }

    #[test]
    fn test_keyword_mid_string_does_not_match() {
        // Prefix matching only; a keyword inside the description is not a hit
        let resolver = resolver_from_toml(
            r#"
            [[rule]]
            keyword = "такси"
            category = "такси"
            "#,
        );

        assert_eq!(resolver.resolve("яндекс такси"), None);
    }

    #[test]
    fn test_duplicate_keyword_first_declaration_wins_exact() {
        let resolver = resolver_from_toml(
            r#"
            [[rule]]
            keyword = "shop"
            category = "first"

            [[rule]]
            keyword = "shop"
            category = "second"
            "#,
        );

        assert_eq!(resolver.resolve("shop"), Some("first"));
    }
}
