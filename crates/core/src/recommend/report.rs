//! Russian-language translation helpers and the profile analysis text
//! attached to weighted recommendation outcomes.

use crate::domain::recommendation::{ProductRecommendation, RecommendationScore};
use crate::domain::survey::{ActivityLevel, AgeGroup, Gender, Nutrition, StressLevel, SurveyProfile};

/// Unknown tags fall through untranslated so new vocabulary degrades
/// to its raw token instead of disappearing from the report.
pub fn translate_complaint(tag: &str) -> &str {
    match tag {
        "fatigue" => "усталости",
        "low_immunity" => "сниженном иммунитете",
        "sleep_problems" => "проблемах со сном",
        "stress" => "стрессе",
        "skin_issues" => "проблемах с кожей",
        "joint_pain" => "болях в суставах",
        "digestive_issues" => "проблемах с пищеварением",
        "memory_issues" => "проблемах с памятью",
        other => other,
    }
}

pub fn translate_goal(tag: &str) -> &str {
    match tag {
        "general_wellness" => "общее самочувствие",
        "immunity" => "укрепление иммунитета",
        "energy" => "повышение энергии",
        "skin_health" => "здоровье кожи",
        "heart_health" => "здоровье сердца",
        "memory" => "улучшение памяти",
        "stress_relief" => "снятие стресса",
        "better_sleep" => "улучшение сна",
        other => other,
    }
}

pub fn translate_age_group(age_group: AgeGroup) -> &'static str {
    match age_group {
        AgeGroup::Under18 => "до 18 лет",
        AgeGroup::From18To30 => "18-30 лет",
        AgeGroup::From31To45 => "31-45 лет",
        AgeGroup::From46To60 => "46-60 лет",
        AgeGroup::Plus60 => "старше 60 лет",
    }
}

pub fn translate_gender(gender: Gender) -> &'static str {
    match gender {
        Gender::Female => "женщина",
        Gender::Male => "мужчина",
        Gender::Other => "не указан",
    }
}

pub fn translate_activity_level(level: ActivityLevel) -> &'static str {
    match level {
        ActivityLevel::None => "почти нет",
        ActivityLevel::OneToTwoPerWeek => "1-2 раза в неделю",
        ActivityLevel::ThreeToFivePerWeek => "3-5 раз в неделю",
        ActivityLevel::Daily => "ежедневно",
    }
}

pub fn translate_stress_level(level: StressLevel) -> &'static str {
    match level {
        StressLevel::Low => "низкий",
        StressLevel::Medium => "умеренный",
        StressLevel::High => "высокий",
        StressLevel::Constant => "постоянный",
    }
}

pub fn translate_nutrition(nutrition: Nutrition) -> &'static str {
    match nutrition {
        Nutrition::Daily => "ежедневно",
        Nutrition::ThreeToFourPerWeek => "3-4 раза в неделю",
        Nutrition::Rare => "редко",
    }
}

/// Multi-line summary of the profile translation and the ranked list.
/// Purely descriptive output; nothing downstream parses it.
pub fn analysis_report(profile: &SurveyProfile, recommendations: &[ProductRecommendation]) -> String {
    let mut lines = vec![
        format!(
            "Анализ профиля: {}, {}",
            translate_gender(profile.gender),
            translate_age_group(profile.age_group)
        ),
        format!("Уровень активности: {}", translate_activity_level(profile.activity_level)),
        format!("Уровень стресса: {}", translate_stress_level(profile.stress_level)),
        format!("Качество питания: {}", translate_nutrition(profile.nutrition)),
        String::new(),
        format!("Найдено {} персональных рекомендаций:", recommendations.len()),
    ];

    for (index, recommendation) in recommendations.iter().enumerate() {
        let line = match &recommendation.score {
            RecommendationScore::Weighted { points, tier } => format!(
                "{}. {} (приоритет: {}, балл: {})",
                index + 1,
                recommendation.product.name,
                tier.as_str(),
                points
            ),
            RecommendationScore::Urgency { rank } => {
                format!("{}. {} (ранг: {})", index + 1, recommendation.product.name, rank)
            }
        };
        lines.push(line);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tags_translate_and_unknown_pass_through() {
        assert_eq!(translate_complaint("fatigue"), "усталости");
        assert_eq!(translate_complaint("tinnitus"), "tinnitus");
        assert_eq!(translate_goal("energy"), "повышение энергии");
        assert_eq!(translate_goal("longevity"), "longevity");
    }

    #[test]
    fn report_header_reflects_profile_translation() {
        use crate::domain::survey::UserId;

        let profile = SurveyProfile {
            user_id: UserId("user-1".to_owned()),
            age_group: AgeGroup::From18To30,
            gender: Gender::Female,
            activity_level: ActivityLevel::None,
            stress_level: StressLevel::High,
            nutrition: Nutrition::Rare,
            restrictions: vec![],
            complaints: vec![],
            goals: vec![],
            vitamins_current: vec![],
            completed: true,
            completed_at: None,
        };

        let report = analysis_report(&profile, &[]);
        assert!(report.starts_with("Анализ профиля: женщина, 18-30 лет"));
        assert!(report.contains("Уровень стресса: высокий"));
        assert!(report.contains("Найдено 0 персональных рекомендаций:"));
    }
}
