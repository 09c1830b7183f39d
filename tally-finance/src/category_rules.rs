//! Deterministic keyword rules mapping statement descriptions to
//! auto-categories.
//!
//! Rules run in order and every matching rule overrides the previous
//! result: the last match wins. Vendor rules go last so that
//! "AMAZON FRESH - TRADER JOE PICKUP" lands in Amazon, not Groceries.

use std::collections::BTreeSet;

pub const EATING_OUT: &str = "Eating Out";
pub const GROCERIES: &str = "Groceries";
pub const AMAZON: &str = "Amazon";

const FOOD_KEYWORDS: &[&str] = &[
    "restaurant", "cafe", "coffee", "bar", "grill", "eat", "food", "dining",
    "pizza", "burger", "starbucks", "peets", "egg", "thai", "panda",
];

const GROCERY_KEYWORDS: &[&str] = &["wholefds", "trader joe", "king soopers"];

const VENDOR_KEYWORDS: &[&str] = &["amazon"];

/// Case-insensitive substring rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRule {
    label: String,
    keywords: BTreeSet<String>,
    flags_review: bool,
}

impl KeywordRule {
    pub fn new<I, S>(label: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            label: label.into(),
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            flags_review: false,
        }
    }

    /// Matches of this rule are marked for manual review.
    pub fn flag_for_review(mut self) -> Self {
        self.flags_review = true;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn flags_review(&self) -> bool {
        self.flags_review
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    /// `desc` must already be lowercased.
    fn matches(&self, desc: &str) -> bool {
        self.keywords.iter().any(|k| desc.contains(k.as_str()))
    }
}

/// Result of categorization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Categorized {
    pub category: String,
    pub needs_review: bool,
}

/// Ordered rule set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRules {
    rules: Vec<KeywordRule>,
}

impl CategoryRules {
    pub fn new(rules: Vec<KeywordRule>) -> Self {
        Self { rules }
    }

    /// Food, then groceries, then the Amazon vendor rule.
    pub fn standard() -> Self {
        Self::new(vec![
            KeywordRule::new(EATING_OUT, FOOD_KEYWORDS),
            KeywordRule::new(GROCERIES, GROCERY_KEYWORDS),
            KeywordRule::new(AMAZON, VENDOR_KEYWORDS).flag_for_review(),
        ])
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    /// Categorize a description starting from `seed` (the bank label or
    /// "Uncategorized"). Review is flagged only by a matching review rule.
    pub fn categorize(&self, description: &str, seed: &str) -> Categorized {
        let desc = description.to_lowercase();
        let mut out = Categorized {
            category: seed.to_string(),
            needs_review: false,
        };

        for rule in &self.rules {
            if rule.matches(&desc) {
                out.category = rule.label.clone();
                out.needs_review |= rule.flags_review;
            }
        }

        out
    }
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::UNCATEGORIZED;

    fn cat(description: &str) -> Categorized {
        CategoryRules::standard().categorize(description, UNCATEGORIZED)
    }

    #[test]
    fn test_starbucks_is_eating_out() {
        let c = cat("STARBUCKS #123");
        assert_eq!(c.category, EATING_OUT);
        assert!(!c.needs_review);
    }

    #[test]
    fn test_grocery_overrides_food() {
        assert_eq!(cat("WHOLEFDS PRL #1234").category, GROCERIES);
        assert_eq!(cat("TRADER JOE S #552").category, GROCERIES);
        assert_eq!(cat("KING SOOPERS FOOD & DELI").category, GROCERIES);
    }

    #[test]
    fn test_amazon_wins_over_everything() {
        let c = cat("AMAZON FRESH - TRADER JOE PICKUP");
        assert_eq!(c.category, AMAZON);
        assert!(c.needs_review);

        let c = cat("Amazon.com*Coffee Beans");
        assert_eq!(c.category, AMAZON);
        assert!(c.needs_review);
    }

    #[test]
    fn test_seed_kept_without_match() {
        let rules = CategoryRules::standard();
        let c = rules.categorize("SHELL OIL 5744", "Gas");
        assert_eq!(c.category, "Gas");
        assert!(!c.needs_review);
        assert_eq!(cat("SHELL OIL 5744").category, UNCATEGORIZED);
    }

    #[test]
    fn test_plain_substring_semantics() {
        // No word boundaries: "bar" inside "BARNES" counts
        assert_eq!(cat("BARNES & NOBLE").category, EATING_OUT);
    }

    #[test]
    fn test_keywords_are_a_set() {
        let rule = KeywordRule::new("X", ["Grill", "grill", "", "egg"]);
        let kws: Vec<_> = rule.keywords().collect();
        assert_eq!(kws, vec!["egg", "grill"]);
    }

    #[test]
    fn test_standard_rule_order() {
        let rules = CategoryRules::standard();
        let labels: Vec<_> = rules.rules().iter().map(|r| (r.label(), r.flags_review())).collect();
        assert_eq!(
            labels,
            vec![(EATING_OUT, false), (GROCERIES, false), (AMAZON, true)]
        );
    }

    #[test]
    fn test_custom_rule_order() {
        let rules = CategoryRules::new(vec![
            KeywordRule::new("Transport", ["uber"]),
            KeywordRule::new(EATING_OUT, ["eats"]),
        ]);
        assert_eq!(rules.categorize("UBER EATS", UNCATEGORIZED).category, EATING_OUT);
        assert_eq!(rules.categorize("UBER TRIP", UNCATEGORIZED).category, "Transport");
    }
}
