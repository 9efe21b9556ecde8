//! "Already taking" exclusion.
//!
//! Containment is checked as a case-insensitive substring in both
//! directions after replacing underscores with spaces, so the tag
//! `vitamin_d` still excludes a product named "Витамин D3 / Vitamin D
//! 2000 IU". The looseness is deliberate and known to over-match short
//! tokens; every caller goes through these two functions so the rule
//! can be tightened in one place.

use crate::domain::product::Product;

fn normalize(token: &str) -> String {
    token.trim().to_lowercase().replace('_', " ")
}

/// Substring containment in either direction on normalized tokens.
pub fn tokens_overlap(left: &str, right: &str) -> bool {
    let left = normalize(left);
    let right = normalize(right);
    if left.is_empty() || right.is_empty() {
        return false;
    }
    left.contains(&right) || right.contains(&left)
}

/// Deterministic-path filter: a product is considered taken when its
/// name or any benefit string overlaps a currently-taken vitamin entry.
pub fn taken_by_name_or_benefit(product: &Product, vitamins_current: &[String]) -> bool {
    vitamins_current.iter().any(|current| {
        tokens_overlap(&product.name, current)
            || product.benefits.iter().any(|benefit| tokens_overlap(benefit, current))
    })
}

/// Weighted-path filter: overlap between the product's vitamin-type
/// tags and the currently-taken vitamin entries.
pub fn taken_by_vitamin_type(product: &Product, vitamins_current: &[String]) -> bool {
    vitamins_current.iter().any(|current| {
        product.vitamin_type.iter().any(|vitamin_type| tokens_overlap(vitamin_type, current))
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::product::{Product, ProductId};

    fn product(name: &str, vitamin_type: &[&str], benefits: &[&str]) -> Product {
        Product {
            id: ProductId("prod-1".to_owned()),
            sku: "SKU-1".to_owned(),
            name: name.to_owned(),
            description: None,
            price: Decimal::new(99_900, 2),
            restrictions: vec![],
            target_complaints: vec![],
            target_goals: vec![],
            vitamin_type: vitamin_type.iter().map(|t| (*t).to_owned()).collect(),
            benefits: benefits.iter().map(|b| (*b).to_owned()).collect(),
            dosage: None,
            active: true,
        }
    }

    #[test]
    fn underscores_normalize_before_comparison() {
        assert!(tokens_overlap("vitamin_d", "Vitamin D3 2000IU"));
        assert!(tokens_overlap("Омега-3 Premium", "омега-3"));
    }

    #[test]
    fn containment_works_in_both_directions() {
        assert!(tokens_overlap("magnesium", "magnesium citrate"));
        assert!(tokens_overlap("magnesium citrate", "magnesium"));
        assert!(!tokens_overlap("zinc", "iron"));
    }

    #[test]
    fn empty_tokens_never_overlap() {
        assert!(!tokens_overlap("", "magnesium"));
        assert!(!tokens_overlap("magnesium", "  "));
    }

    #[test]
    fn name_and_benefit_filter_consults_both_fields() {
        let by_name = product("Магний B6", &[], &[]);
        assert!(taken_by_name_or_benefit(&by_name, &["магний".to_owned()]));

        let by_benefit = product("Calm Complex", &[], &["contains magnesium"]);
        assert!(taken_by_name_or_benefit(&by_benefit, &["magnesium".to_owned()]));

        let unrelated = product("Probiotic Forte", &[], &["gut flora"]);
        assert!(!taken_by_name_or_benefit(&unrelated, &["magnesium".to_owned()]));
    }

    #[test]
    fn vitamin_type_filter_ignores_name() {
        let typed = product("Sleep Formula", &["magnesium"], &[]);
        assert!(taken_by_vitamin_type(&typed, &["Magnesium Citrate".to_owned()]));
        assert!(!taken_by_name_or_benefit(&typed, &["magnesium".to_owned()]));
    }
}
