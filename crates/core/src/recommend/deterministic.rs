//! Rule-driven recommender: accumulates rule urgency across matches.

use crate::domain::product::Product;
use crate::domain::recommendation::{ProductRecommendation, RecommendationScore};
use crate::domain::rule::{ConditionKey, ConditionValue, RuleId, VitaminRule};
use crate::domain::survey::{ActivityLevel, StressLevel, SurveyProfile};

use super::exclusion::taken_by_name_or_benefit;
use super::matcher::rule_matches;
use super::{Recommender, DEFAULT_MAX_RECOMMENDATIONS};

#[derive(Clone, Copy, Debug)]
pub struct DeterministicRecommender {
    max_recommendations: usize,
}

impl DeterministicRecommender {
    pub fn new(max_recommendations: usize) -> Self {
        Self { max_recommendations: max_recommendations.max(1) }
    }

    /// Rank catalog products by the rules that match the profile.
    ///
    /// Products referenced by several matching rules accumulate the
    /// priorities of all of them; the merged entry keeps one reason and
    /// one rule id per contributing rule. Lower accumulated rank means
    /// more urgent and is shown first. No matching rule is a normal
    /// outcome and yields an empty list.
    pub fn recommend(
        &self,
        profile: &SurveyProfile,
        catalog: &[Product],
        rules: &[VitaminRule],
    ) -> Vec<ProductRecommendation> {
        let mut ordered: Vec<&VitaminRule> = rules.iter().filter(|rule| rule.active).collect();
        // Stable: rules with equal priority keep their creation order.
        ordered.sort_by_key(|rule| rule.priority);

        let mut merged: Vec<MergedEntry<'_>> = Vec::new();
        for rule in ordered.into_iter().filter(|rule| rule_matches(&rule.condition, profile)) {
            for product in products_for_rule(rule, catalog) {
                match merged.iter().position(|entry| entry.product.id == product.id) {
                    Some(index) => {
                        let entry = &mut merged[index];
                        entry.rank += rule.priority;
                        entry.matched_rules.push(rule.id.clone());
                        entry.reasons.push(match_reason(rule, profile));
                    }
                    None => merged.push(MergedEntry {
                        product,
                        rank: rule.priority,
                        matched_rules: vec![rule.id.clone()],
                        reasons: vec![match_reason(rule, profile)],
                    }),
                }
            }
        }

        merged.retain(|entry| !taken_by_name_or_benefit(entry.product, &profile.vitamins_current));
        merged.sort_by_key(|entry| entry.rank);
        merged.truncate(self.max_recommendations);

        merged
            .into_iter()
            .map(|entry| ProductRecommendation {
                product: entry.product.clone(),
                reasons: entry.reasons,
                score: RecommendationScore::Urgency { rank: entry.rank },
                matched_rules: entry.matched_rules,
            })
            .collect()
    }
}

impl Default for DeterministicRecommender {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RECOMMENDATIONS)
    }
}

impl Recommender for DeterministicRecommender {
    fn name(&self) -> &'static str {
        "deterministic"
    }

    fn recommend(
        &self,
        profile: &SurveyProfile,
        catalog: &[Product],
        rules: &[VitaminRule],
    ) -> Vec<ProductRecommendation> {
        DeterministicRecommender::recommend(self, profile, catalog, rules)
    }
}

struct MergedEntry<'a> {
    product: &'a Product,
    rank: i64,
    matched_rules: Vec<RuleId>,
    reasons: Vec<String>,
}

/// Resolve a rule's vitamin entries against the catalog snapshot. An
/// entry selects active products by exact id or by vitamin-type tag,
/// preserving the order of the entries; a product is taken once per
/// rule even if several entries select it.
fn products_for_rule<'a>(rule: &VitaminRule, catalog: &'a [Product]) -> Vec<&'a Product> {
    let mut selected: Vec<&'a Product> = Vec::new();
    for entry in &rule.vitamins {
        for product in catalog.iter().filter(|product| product.active) {
            let hit = product.id.0 == *entry
                || product.vitamin_type.iter().any(|vitamin_type| vitamin_type == entry);
            if hit && !selected.iter().any(|existing| existing.id == product.id) {
                selected.push(product);
            }
        }
    }
    selected
}

fn condition_covers(rule: &VitaminRule, key: ConditionKey, token: &str) -> bool {
    match rule.condition.get(key) {
        Some(ConditionValue::One(expected)) => expected == token,
        Some(ConditionValue::AnyOf(expected)) => expected.iter().any(|value| value == token),
        None => false,
    }
}

fn intersecting_tags<'a>(
    rule: &'a VitaminRule,
    key: ConditionKey,
    profile_tags: &[String],
) -> Vec<&'a str> {
    match rule.condition.get(key) {
        Some(ConditionValue::AnyOf(expected)) => expected
            .iter()
            .filter(|token| profile_tags.iter().any(|tag| tag == *token))
            .map(String::as_str)
            .collect(),
        Some(ConditionValue::One(expected)) if profile_tags.iter().any(|tag| tag == expected) => {
            vec![expected.as_str()]
        }
        _ => Vec::new(),
    }
}

/// Natural-language justification for one rule match, built from the
/// condition fields that actually intersect the profile.
fn match_reason(rule: &VitaminRule, profile: &SurveyProfile) -> String {
    let mut fragments: Vec<String> = Vec::new();

    if condition_covers(rule, ConditionKey::StressLevel, profile.stress_level.as_str())
        && matches!(profile.stress_level, StressLevel::High | StressLevel::Constant)
    {
        fragments.push("высокий уровень стресса".to_owned());
    }

    if condition_covers(rule, ConditionKey::ActivityLevel, profile.activity_level.as_str()) {
        match profile.activity_level {
            ActivityLevel::None => fragments.push("низкая физическая активность".to_owned()),
            ActivityLevel::Daily => fragments.push("высокая физическая активность".to_owned()),
            _ => {}
        }
    }

    let complaints = intersecting_tags(rule, ConditionKey::Complaints, &profile.complaints);
    if !complaints.is_empty() {
        fragments.push(format!("жалобы: {}", complaints.join(", ")));
    }

    let goals = intersecting_tags(rule, ConditionKey::Goals, &profile.goals);
    if !goals.is_empty() {
        fragments.push(format!("цели: {}", goals.join(", ")));
    }

    if fragments.is_empty() {
        "Рекомендовано для вашего профиля".to_owned()
    } else {
        format!("Рекомендовано на основе: {}", fragments.join(", "))
    }
}
