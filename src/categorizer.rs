use rust_decimal::Decimal;

use crate::models::Category;

/// Keyword lists driving default categorization. These are policy, not fact:
/// callers can supply their own lists, and the defaults below come from the
/// descriptions Nigerian banks actually print.
#[derive(Debug, Clone)]
pub struct CategoryRules {
    pub operating: Vec<String>,
    pub direct: Vec<String>,
    pub capital: Vec<String>,
    pub non_deductible: Vec<String>,
}

fn keywords(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self {
            operating: keywords(&[
                "electricity",
                "utility",
                "internet",
                "phone",
                "rent",
                "office",
                "stationery",
                "maintenance",
                "cleaning",
                "security",
                "insurance",
                "subscription",
                "software",
                "cloud",
                "hosting",
                "airtime",
            ]),
            direct: keywords(&[
                "inventory",
                "stock",
                "goods",
                "materials",
                "supplies",
                "shipping",
                "freight",
                "logistics",
                "delivery",
            ]),
            capital: keywords(&[
                "equipment",
                "machinery",
                "vehicle",
                "furniture",
                "computer",
                "laptop",
                "phone purchase",
                "asset",
                "renovation",
            ]),
            non_deductible: keywords(&[
                "fine",
                "penalty",
                "personal",
                "donation",
                "gift",
                "entertainment",
            ]),
        }
    }
}

impl CategoryRules {
    /// Assign a default category from the sign of the amount and the
    /// description text alone. Pure: same input, same output, no state.
    ///
    /// Inflows default to Income. Outflows only get an expense category when
    /// a keyword actually matches; anything else stays Uncategorized so a
    /// human confirms it instead of a wrong guess distorting the tax figures.
    pub fn categorize(&self, amount: Decimal, description: &str) -> Category {
        if amount > Decimal::ZERO {
            return Category::Income;
        }
        let description = description.to_lowercase();
        let hit = |list: &[String]| list.iter().any(|k| description.contains(k.as_str()));
        if hit(&self.non_deductible) {
            Category::NonDeductible
        } else if hit(&self.capital) {
            Category::CapitalExpenses
        } else if hit(&self.direct) {
            Category::DirectExpenses
        } else if hit(&self.operating) {
            Category::OperatingExpenses
        } else {
            Category::Uncategorized
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_positive_amounts_default_to_income() {
        let rules = CategoryRules::default();
        assert_eq!(
            rules.categorize(dec!(5000.00), "RANDOM NARRATION"),
            Category::Income
        );
        // Even when an expense keyword appears in the text.
        assert_eq!(
            rules.categorize(dec!(5000.00), "RENT REFUND"),
            Category::Income
        );
    }

    #[test]
    fn test_expense_keywords_map_to_categories() {
        let rules = CategoryRules::default();
        assert_eq!(
            rules.categorize(dec!(-20000.00), "OFFICE RENT JANUARY"),
            Category::OperatingExpenses
        );
        assert_eq!(
            rules.categorize(dec!(-8000.00), "SHIPPING FEE LAGOS"),
            Category::DirectExpenses
        );
        assert_eq!(
            rules.categorize(dec!(-150000.00), "LAPTOP FOR DESIGN TEAM"),
            Category::CapitalExpenses
        );
        assert_eq!(
            rules.categorize(dec!(-5000.00), "PARKING FINE"),
            Category::NonDeductible
        );
    }

    #[test]
    fn test_non_deductible_outranks_other_matches() {
        let rules = CategoryRules::default();
        // "gift" (non-deductible) and "delivery" (direct) both match.
        assert_eq!(
            rules.categorize(dec!(-3000.00), "GIFT DELIVERY"),
            Category::NonDeductible
        );
    }

    #[test]
    fn test_unmatched_expense_stays_uncategorized() {
        let rules = CategoryRules::default();
        assert_eq!(
            rules.categorize(dec!(-999.00), "NIP TRANSFER OUT 0123"),
            Category::Uncategorized
        );
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let rules = CategoryRules::default();
        assert_eq!(
            rules.categorize(dec!(-100.00), "Airtime Top-Up"),
            Category::OperatingExpenses
        );
    }

    #[test]
    fn test_custom_rules_replace_defaults() {
        let rules = CategoryRules {
            operating: keywords(&["generator diesel"]),
            direct: vec![],
            capital: vec![],
            non_deductible: vec![],
        };
        assert_eq!(
            rules.categorize(dec!(-100.00), "GENERATOR DIESEL SUPPLY"),
            Category::OperatingExpenses
        );
        assert_eq!(
            rules.categorize(dec!(-100.00), "OFFICE RENT"),
            Category::Uncategorized
        );
    }

    #[test]
    fn test_deterministic_across_calls() {
        let rules = CategoryRules::default();
        let first = rules.categorize(dec!(-42.00), "security services");
        for _ in 0..5 {
            assert_eq!(rules.categorize(dec!(-42.00), "security services"), first);
        }
    }
}
