//! Rule condition evaluation against a survey profile.

use crate::domain::rule::{ConditionKey, ConditionValue, RuleCondition};
use crate::domain::survey::SurveyProfile;

/// A profile attribute as seen by the matcher: either a single token
/// or a set of tags.
enum FieldValue<'a> {
    Scalar(&'a str),
    Set(&'a [String]),
}

fn profile_field(profile: &SurveyProfile, key: ConditionKey) -> FieldValue<'_> {
    match key {
        ConditionKey::AgeGroup => FieldValue::Scalar(profile.age_group.as_str()),
        ConditionKey::Gender => FieldValue::Scalar(profile.gender.as_str()),
        ConditionKey::ActivityLevel => FieldValue::Scalar(profile.activity_level.as_str()),
        ConditionKey::StressLevel => FieldValue::Scalar(profile.stress_level.as_str()),
        ConditionKey::Nutrition => FieldValue::Scalar(profile.nutrition.as_str()),
        ConditionKey::Restrictions => FieldValue::Set(&profile.restrictions),
        ConditionKey::Complaints => FieldValue::Set(&profile.complaints),
        ConditionKey::Goals => FieldValue::Set(&profile.goals),
        ConditionKey::VitaminsCurrent => FieldValue::Set(&profile.vitamins_current),
    }
}

/// True iff every entry of the condition is satisfied by the profile.
/// An empty condition matches every profile.
pub fn rule_matches(condition: &RuleCondition, profile: &SurveyProfile) -> bool {
    condition.entries().iter().all(|(key, expected)| {
        entry_matches(profile_field(profile, *key), expected)
    })
}

fn entry_matches(actual: FieldValue<'_>, expected: &ConditionValue) -> bool {
    match (actual, expected) {
        // Set of acceptable tokens vs single answer: member test.
        (FieldValue::Scalar(value), ConditionValue::AnyOf(tokens)) => {
            tokens.iter().any(|token| token == value)
        }
        // Set vs set: any overlap counts (OR within the field).
        (FieldValue::Set(values), ConditionValue::AnyOf(tokens)) => {
            tokens.iter().any(|token| values.iter().any(|value| value == token))
        }
        (FieldValue::Set(values), ConditionValue::One(token)) => {
            values.iter().any(|value| value == token)
        }
        (FieldValue::Scalar(value), ConditionValue::One(token)) => token == value,
    }
}
