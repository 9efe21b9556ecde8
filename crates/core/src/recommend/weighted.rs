//! Heuristic scorer: additive points per matching attribute dimension,
//! with a hard veto for restriction conflicts.

use crate::domain::product::Product;
use crate::domain::recommendation::{
    PriorityTier, ProductRecommendation, RecommendationScore, WeightedRecommendationOutcome,
};
use crate::domain::rule::VitaminRule;
use crate::domain::survey::{ActivityLevel, AgeGroup, Gender, Nutrition, StressLevel, SurveyProfile};

use super::exclusion::taken_by_vitamin_type;
use super::report;
use super::{Recommender, DEFAULT_MAX_RECOMMENDATIONS};

const COMPLAINT_MATCH_POINTS: i32 = 15;
const GOAL_MATCH_POINTS: i32 = 12;
const REPRODUCTIVE_AGE_IRON_POINTS: i32 = 10;
const SENIOR_SUPPORT_POINTS: i32 = 8;
const STRESS_SUPPORT_POINTS: i32 = 10;
const ACTIVE_LIFESTYLE_POINTS: i32 = 8;
const LOW_ACTIVITY_POINTS: i32 = 6;
const POOR_NUTRITION_POINTS: i32 = 12;

/// Final score forced onto any product whose contraindications overlap
/// the profile's restrictions. The value is negative so the `> 0`
/// output filter can never surface a vetoed product, whatever the other
/// dimensions contributed.
pub const RESTRICTION_PENALTY: i32 = -50;

#[derive(Clone, Copy, Debug)]
pub struct WeightedScorer {
    max_recommendations: usize,
}

impl WeightedScorer {
    pub fn new(max_recommendations: usize) -> Self {
        Self { max_recommendations: max_recommendations.max(1) }
    }

    /// Score every active product against the profile and return the
    /// full outcome: ranked recommendations, their summed score, the
    /// names excluded as already taken, and the analysis text.
    pub fn recommend_full(
        &self,
        profile: &SurveyProfile,
        catalog: &[Product],
    ) -> WeightedRecommendationOutcome {
        let mut excluded_products = Vec::new();
        let mut scored: Vec<(i32, &Product, Vec<String>)> = Vec::new();

        for product in catalog.iter().filter(|product| product.active) {
            if taken_by_vitamin_type(product, &profile.vitamins_current) {
                excluded_products.push(product.name.clone());
                continue;
            }

            let (points, reasons) = score_product(product, profile);
            if points > 0 {
                scored.push((points, product, reasons));
            }
        }

        // Stable: equal scores keep catalog order.
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.truncate(self.max_recommendations);

        let total_score = scored.iter().map(|(points, _, _)| points).sum();
        let recommendations: Vec<ProductRecommendation> = scored
            .into_iter()
            .map(|(points, product, reasons)| ProductRecommendation {
                product: product.clone(),
                reasons,
                score: RecommendationScore::Weighted {
                    points,
                    tier: PriorityTier::from_points(points),
                },
                matched_rules: Vec::new(),
            })
            .collect();

        let analysis_report = report::analysis_report(profile, &recommendations);

        WeightedRecommendationOutcome {
            recommendations,
            total_score,
            excluded_products,
            analysis_report,
        }
    }
}

impl Default for WeightedScorer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RECOMMENDATIONS)
    }
}

impl Recommender for WeightedScorer {
    fn name(&self) -> &'static str {
        "weighted"
    }

    fn recommend(
        &self,
        profile: &SurveyProfile,
        catalog: &[Product],
        _rules: &[VitaminRule],
    ) -> Vec<ProductRecommendation> {
        self.recommend_full(profile, catalog).recommendations
    }
}

fn has_vitamin_type(product: &Product, tag: &str) -> bool {
    product.vitamin_type.iter().any(|vitamin_type| vitamin_type == tag)
}

fn score_product(product: &Product, profile: &SurveyProfile) -> (i32, Vec<String>) {
    let mut points = 0;
    let mut reasons = Vec::new();

    points += score_complaints(product, profile, &mut reasons);
    points += score_goals(product, profile, &mut reasons);
    points += score_demographics(product, profile, &mut reasons);
    points += score_lifestyle(product, profile, &mut reasons);
    points += score_nutrition(product, profile, &mut reasons);

    if has_restriction_conflict(product, profile) {
        return (RESTRICTION_PENALTY, reasons);
    }

    (points, reasons)
}

fn score_complaints(product: &Product, profile: &SurveyProfile, reasons: &mut Vec<String>) -> i32 {
    let mut points = 0;
    for complaint in &profile.complaints {
        if product.target_complaints.iter().any(|target| target == complaint) {
            points += COMPLAINT_MATCH_POINTS;
            reasons.push(format!("Помогает при {}", report::translate_complaint(complaint)));
        }
    }
    points
}

fn score_goals(product: &Product, profile: &SurveyProfile, reasons: &mut Vec<String>) -> i32 {
    let mut points = 0;
    for goal in &profile.goals {
        if product.target_goals.iter().any(|target| target == goal) {
            points += GOAL_MATCH_POINTS;
            reasons.push(format!("Поддерживает цель: {}", report::translate_goal(goal)));
        }
    }
    points
}

fn score_demographics(product: &Product, profile: &SurveyProfile, reasons: &mut Vec<String>) -> i32 {
    let mut points = 0;

    if profile.gender == Gender::Female
        && matches!(profile.age_group, AgeGroup::From18To30 | AgeGroup::From31To45)
        && has_vitamin_type(product, "iron")
    {
        points += REPRODUCTIVE_AGE_IRON_POINTS;
        reasons.push("Рекомендуется женщинам репродуктивного возраста".to_owned());
    }

    if profile.age_group == AgeGroup::Plus60
        && (has_vitamin_type(product, "vitamin_d") || has_vitamin_type(product, "omega_3"))
    {
        points += SENIOR_SUPPORT_POINTS;
        reasons.push("Важно для людей старшего возраста".to_owned());
    }

    points
}

// The three lifestyle checks are independent and may all fire for one
// product.
fn score_lifestyle(product: &Product, profile: &SurveyProfile, reasons: &mut Vec<String>) -> i32 {
    let mut points = 0;

    if matches!(profile.stress_level, StressLevel::High | StressLevel::Constant)
        && (has_vitamin_type(product, "magnesium") || has_vitamin_type(product, "b_complex"))
    {
        points += STRESS_SUPPORT_POINTS;
        reasons.push("Помогает справляться со стрессом".to_owned());
    }

    if profile.activity_level == ActivityLevel::Daily
        && (has_vitamin_type(product, "magnesium") || has_vitamin_type(product, "omega_3"))
    {
        points += ACTIVE_LIFESTYLE_POINTS;
        reasons.push("Поддерживает активный образ жизни".to_owned());
    }

    if profile.activity_level == ActivityLevel::None
        && (has_vitamin_type(product, "vitamin_d") || has_vitamin_type(product, "b_complex"))
    {
        points += LOW_ACTIVITY_POINTS;
        reasons.push("Компенсирует низкую активность".to_owned());
    }

    points
}

fn score_nutrition(product: &Product, profile: &SurveyProfile, reasons: &mut Vec<String>) -> i32 {
    if profile.nutrition == Nutrition::Rare
        && (has_vitamin_type(product, "multivitamin") || has_vitamin_type(product, "b_complex"))
    {
        reasons.push("Компенсирует недостатки питания".to_owned());
        return POOR_NUTRITION_POINTS;
    }
    0
}

fn has_restriction_conflict(product: &Product, profile: &SurveyProfile) -> bool {
    profile
        .restrictions
        .iter()
        .any(|restriction| product.restrictions.iter().any(|tag| tag == restriction))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::product::ProductId;
    use crate::domain::survey::UserId;

    fn profile() -> SurveyProfile {
        SurveyProfile {
            user_id: UserId("user-1".to_owned()),
            age_group: AgeGroup::From31To45,
            gender: Gender::Male,
            activity_level: ActivityLevel::None,
            stress_level: StressLevel::High,
            nutrition: Nutrition::Daily,
            restrictions: vec![],
            complaints: vec![],
            goals: vec![],
            vitamins_current: vec![],
            completed: true,
            completed_at: None,
        }
    }

    fn product(id: &str, name: &str) -> Product {
        Product {
            id: ProductId(id.to_owned()),
            sku: format!("SKU-{id}"),
            name: name.to_owned(),
            description: None,
            price: Decimal::new(79_900, 2),
            restrictions: vec![],
            target_complaints: vec![],
            target_goals: vec![],
            vitamin_type: vec![],
            benefits: vec![],
            dosage: None,
            active: true,
        }
    }

    #[test]
    fn stress_and_low_activity_products_both_surface_with_reasons() {
        let mut magnesium = product("prod-mg", "Магний B6");
        magnesium.vitamin_type = vec!["magnesium".to_owned()];
        let mut vitamin_d = product("prod-d3", "Витамин D3");
        vitamin_d.vitamin_type = vec!["vitamin_d".to_owned()];

        let outcome =
            WeightedScorer::default().recommend_full(&profile(), &[magnesium, vitamin_d]);

        assert_eq!(outcome.recommendations.len(), 2);
        for recommendation in &outcome.recommendations {
            match &recommendation.score {
                RecommendationScore::Weighted { points, .. } => assert!(*points >= 6),
                other => panic!("unexpected score variant: {other:?}"),
            }
        }
        let all_reasons: Vec<&String> =
            outcome.recommendations.iter().flat_map(|rec| rec.reasons.iter()).collect();
        assert!(all_reasons.iter().any(|reason| reason.contains("справляться со стрессом")));
        assert!(all_reasons.iter().any(|reason| reason.contains("Компенсирует низкую активность")));
    }

    #[test]
    fn restriction_conflict_forces_the_penalty_and_never_surfaces() {
        let mut conflicted = product("prod-om", "Омега-3 Premium");
        conflicted.vitamin_type = vec!["omega_3".to_owned()];
        conflicted.restrictions = vec!["diabetic".to_owned()];
        // Would otherwise earn goal and complaint points.
        conflicted.target_complaints = vec!["fatigue".to_owned()];
        conflicted.target_goals = vec!["heart_health".to_owned(), "energy".to_owned()];

        let mut profile = profile();
        profile.restrictions = vec!["diabetic".to_owned()];
        profile.complaints = vec!["fatigue".to_owned()];
        profile.goals = vec!["heart_health".to_owned(), "energy".to_owned()];

        let (points, _) = score_product(&conflicted, &profile);
        assert_eq!(points, RESTRICTION_PENALTY);

        let outcome = WeightedScorer::default().recommend_full(&profile, &[conflicted]);
        assert!(outcome.recommendations.is_empty());
        assert_eq!(outcome.total_score, 0);
    }

    #[test]
    fn already_taken_products_are_excluded_before_scoring() {
        let mut magnesium = product("prod-mg", "Sleep Formula");
        magnesium.vitamin_type = vec!["magnesium".to_owned()];
        magnesium.target_complaints = vec!["sleep_problems".to_owned()];

        let mut profile = profile();
        profile.vitamins_current = vec!["magnesium".to_owned()];
        profile.complaints = vec!["sleep_problems".to_owned()];

        let outcome = WeightedScorer::default().recommend_full(&profile, &[magnesium]);
        assert!(outcome.recommendations.is_empty());
        assert_eq!(outcome.excluded_products, vec!["Sleep Formula".to_owned()]);
    }

    #[test]
    fn scores_are_non_increasing_and_capped() {
        let mut catalog = Vec::new();
        for index in 0..12 {
            let mut entry = product(&format!("prod-{index}"), &format!("Продукт {index}"));
            entry.vitamin_type = vec!["b_complex".to_owned()];
            if index % 2 == 0 {
                entry.target_complaints = vec!["fatigue".to_owned()];
            }
            catalog.push(entry);
        }

        let mut profile = profile();
        profile.complaints = vec!["fatigue".to_owned()];

        let outcome = WeightedScorer::default().recommend_full(&profile, &catalog);
        assert_eq!(outcome.recommendations.len(), DEFAULT_MAX_RECOMMENDATIONS);

        let points: Vec<i32> = outcome
            .recommendations
            .iter()
            .map(|rec| match rec.score {
                RecommendationScore::Weighted { points, .. } => points,
                _ => unreachable!("weighted scorer emits weighted scores"),
            })
            .collect();
        assert!(points.windows(2).all(|pair| pair[0] >= pair[1]));
        assert!(points.iter().all(|value| *value > 0));
        assert_eq!(outcome.total_score, points.iter().sum::<i32>());
    }

    #[test]
    fn demographic_dimensions_follow_age_and_gender() {
        let mut iron = product("prod-fe", "Железо Хелат");
        iron.vitamin_type = vec!["iron".to_owned()];

        let mut young_female = profile();
        young_female.gender = Gender::Female;
        young_female.age_group = AgeGroup::From18To30;
        let (points, reasons) = score_product(&iron, &young_female);
        assert_eq!(points, REPRODUCTIVE_AGE_IRON_POINTS);
        assert!(reasons[0].contains("репродуктивного возраста"));

        let mut senior = profile();
        senior.age_group = AgeGroup::Plus60;
        senior.activity_level = ActivityLevel::OneToTwoPerWeek;
        senior.stress_level = StressLevel::Low;
        let mut omega = product("prod-om", "Омега-3");
        omega.vitamin_type = vec!["omega_3".to_owned()];
        let (points, reasons) = score_product(&omega, &senior);
        assert_eq!(points, SENIOR_SUPPORT_POINTS);
        assert!(reasons[0].contains("старшего возраста"));
    }

    #[test]
    fn lifestyle_rules_accumulate_independently() {
        let mut magnesium = product("prod-mg", "Магний");
        magnesium.vitamin_type = vec!["magnesium".to_owned()];

        let mut active_and_stressed = profile();
        active_and_stressed.activity_level = ActivityLevel::Daily;
        active_and_stressed.stress_level = StressLevel::Constant;

        let (points, reasons) = score_product(&magnesium, &active_and_stressed);
        assert_eq!(points, STRESS_SUPPORT_POINTS + ACTIVE_LIFESTYLE_POINTS);
        assert_eq!(reasons.len(), 2);
    }

    #[test]
    fn poor_nutrition_boosts_multivitamins() {
        let mut multivitamin = product("prod-multi", "Мультивитамин");
        multivitamin.vitamin_type = vec!["multivitamin".to_owned()];

        let mut rare_meals = profile();
        rare_meals.nutrition = Nutrition::Rare;
        rare_meals.stress_level = StressLevel::Low;
        rare_meals.activity_level = ActivityLevel::Daily;

        let (points, reasons) = score_product(&multivitamin, &rare_meals);
        assert_eq!(points, POOR_NUTRITION_POINTS);
        assert_eq!(reasons, vec!["Компенсирует недостатки питания".to_owned()]);
    }

    #[test]
    fn same_snapshot_yields_identical_outcome() {
        let mut magnesium = product("prod-mg", "Магний B6");
        magnesium.vitamin_type = vec!["magnesium".to_owned()];
        let catalog = vec![magnesium];

        let scorer = WeightedScorer::default();
        let first = scorer.recommend_full(&profile(), &catalog);
        let second = scorer.recommend_full(&profile(), &catalog);
        assert_eq!(first, second);
    }
}
