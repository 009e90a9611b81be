//! Category rule table
//!
//! The rule table maps description keywords to category labels. It is
//! configuration data, not code: a default table ships embedded in the
//! binary and a user-supplied TOML file can replace it per run. Once loaded
//! the table is immutable, so it is safe to share read-only across any
//! number of summarization runs.
//!
//! Declaration order is significant for prefix matching (the first declared
//! keyword that prefixes a description wins) and irrelevant for exact
//! lookup, which is why the table is an ordered list rather than a map.

use std::path::Path;

use serde::Deserialize;

use crate::types::SummaryError;

/// The embedded default rule table
pub const DEFAULT_RULES_TOML: &str = include_str!("../rules.toml");

/// One keyword → category mapping
///
/// Keywords are stored normalized (trimmed, lowercased) so resolution never
/// has to re-normalize the rule side.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryRule {
    pub keyword: String,
    pub category: String,
}

/// TOML document shape: a `[[rule]]` array of tables
///
/// An array of tables preserves declaration order through deserialization,
/// which a TOML map would not guarantee.
#[derive(Debug, Deserialize)]
struct RulesFile {
    #[serde(rename = "rule", default)]
    rules: Vec<CategoryRule>,
}

/// An ordered, immutable set of category rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<CategoryRule>,
}

impl RuleSet {
    /// Parse a rule set from TOML text
    ///
    /// Keywords are normalized (trimmed, lowercased) on load; declaration
    /// order is preserved. An empty rule list is rejected: a run with no
    /// rules would silently route every row to the passthrough block.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::RulesLoad` for malformed TOML or an empty
    /// rule list.
    pub fn from_toml(text: &str) -> Result<Self, SummaryError> {
        let parsed: RulesFile =
            toml::from_str(text).map_err(|e| SummaryError::rules_load(e.to_string()))?;

        if parsed.rules.is_empty() {
            return Err(SummaryError::rules_load("no rules defined"));
        }

        let rules = parsed
            .rules
            .into_iter()
            .map(|rule| CategoryRule {
                keyword: rule.keyword.trim().to_lowercase(),
                category: rule.category,
            })
            .collect();

        Ok(RuleSet { rules })
    }

    /// Load a rule set from a TOML file
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::RulesLoad` if the file cannot be read or does
    /// not parse as a valid rule table.
    pub fn from_file(path: &Path) -> Result<Self, SummaryError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            SummaryError::rules_load(format!("cannot read '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&text)
    }

    /// Load the embedded default rule table
    pub fn built_in() -> Result<Self, SummaryError> {
        Self::from_toml(DEFAULT_RULES_TOML)
    }

    /// Iterate rules in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &CategoryRule> {
        self.rules.iter()
    }

    /// Number of rules in the set
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the set contains no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_built_in_rules_parse() {
        let rules = RuleSet::built_in().unwrap();
        assert!(!rules.is_empty());

        // The default table starts with the delivery variant of the merchant
        // so prefix matching prefers it over the bare merchant name.
        let first = rules.iter().next().unwrap();
        assert_eq!(first.keyword, "перекрёсток доставка");
        assert_eq!(first.category, "продукты");
    }

    #[test]
    fn test_from_toml_preserves_declaration_order() {
        let toml = r#"
            [[rule]]
            keyword = "ab"
            category = "Y"

            [[rule]]
            keyword = "a"
            category = "X"
        "#;

        let rules = RuleSet::from_toml(toml).unwrap();
        let keywords: Vec<&str> = rules.iter().map(|r| r.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["ab", "a"]);
    }

    #[test]
    fn test_from_toml_normalizes_keywords() {
        let toml = r#"
            [[rule]]
            keyword = "  Coffee Shop  "
            category = "eating out"
        "#;

        let rules = RuleSet::from_toml(toml).unwrap();
        assert_eq!(rules.iter().next().unwrap().keyword, "coffee shop");
    }

    #[test]
    fn test_from_toml_rejects_empty_rule_list() {
        let result = RuleSet::from_toml("");
        assert!(matches!(result, Err(SummaryError::RulesLoad { .. })));
    }

    #[test]
    fn test_from_toml_rejects_malformed_toml() {
        let result = RuleSet::from_toml("[[rule]]\nkeyword = ");
        assert!(matches!(result, Err(SummaryError::RulesLoad { .. })));
    }

    #[test]
    fn test_from_file_missing_path() {
        let result = RuleSet::from_file(Path::new("nonexistent-rules.toml"));
        assert!(matches!(result, Err(SummaryError::RulesLoad { .. })));
    }
}
