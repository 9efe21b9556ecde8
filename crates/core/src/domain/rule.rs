use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleId(pub String);

/// A named condition set plus the vitamins it recommends when matched.
///
/// `priority` is an urgency rank: lower numbers are more urgent. The
/// deterministic recommender sums ranks when several rules recommend
/// the same product. `vitamins` entries name either a product id or a
/// vitamin-type tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitaminRule {
    pub id: RuleId,
    pub name: String,
    pub condition: RuleCondition,
    pub vitamins: Vec<String>,
    pub priority: i64,
    pub active: bool,
}

/// Closed set of profile attributes a rule condition may reference.
///
/// Conditions arrive as JSON maps; constructing a `RuleCondition` from
/// a map with a key outside this set is an error, so a misspelled key
/// fails at load time instead of silently never matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKey {
    AgeGroup,
    Gender,
    ActivityLevel,
    StressLevel,
    Nutrition,
    Restrictions,
    Complaints,
    Goals,
    VitaminsCurrent,
}

impl ConditionKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AgeGroup => "age_group",
            Self::Gender => "gender",
            Self::ActivityLevel => "activity_level",
            Self::StressLevel => "stress_level",
            Self::Nutrition => "nutrition",
            Self::Restrictions => "restrictions",
            Self::Complaints => "complaints",
            Self::Goals => "goals",
            Self::VitaminsCurrent => "vitamins_current",
        }
    }
}

impl std::str::FromStr for ConditionKey {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "age_group" => Ok(Self::AgeGroup),
            "gender" => Ok(Self::Gender),
            "activity_level" => Ok(Self::ActivityLevel),
            "stress_level" => Ok(Self::StressLevel),
            "nutrition" => Ok(Self::Nutrition),
            "restrictions" => Ok(Self::Restrictions),
            "complaints" => Ok(Self::Complaints),
            "goals" => Ok(Self::Goals),
            "vitamins_current" => Ok(Self::VitaminsCurrent),
            unknown => Err(DomainError::UnknownConditionKey { key: unknown.to_owned() }),
        }
    }
}

/// Expected value for one condition entry: a single token or a set of
/// acceptable tokens (OR semantics within the field).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    One(String),
    AnyOf(Vec<String>),
}

/// Ordered condition entries of a rule. An empty condition matches
/// every profile; rules stored that way apply universally.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCondition {
    entries: Vec<(ConditionKey, ConditionValue)>,
}

impl RuleCondition {
    pub fn new(entries: Vec<(ConditionKey, ConditionValue)>) -> Self {
        Self { entries }
    }

    /// Parse a stored JSON condition map, rejecting unknown keys and
    /// non-string values.
    pub fn from_json(raw: &Value) -> Result<Self, DomainError> {
        let map = raw.as_object().ok_or_else(|| DomainError::MalformedCondition {
            detail: format!("expected a JSON object, got {raw}"),
        })?;

        let mut entries = Vec::with_capacity(map.len());
        for (key, value) in map {
            let key: ConditionKey = key.parse()?;
            let expected = match value {
                Value::String(token) => ConditionValue::One(token.clone()),
                Value::Array(tokens) => {
                    let mut collected = Vec::with_capacity(tokens.len());
                    for token in tokens {
                        let token =
                            token.as_str().ok_or_else(|| DomainError::MalformedCondition {
                                detail: format!(
                                    "condition `{}` contains a non-string entry: {token}",
                                    key.as_str()
                                ),
                            })?;
                        collected.push(token.to_owned());
                    }
                    ConditionValue::AnyOf(collected)
                }
                other => {
                    return Err(DomainError::MalformedCondition {
                        detail: format!(
                            "condition `{}` must be a string or array of strings, got {other}",
                            key.as_str()
                        ),
                    })
                }
            };
            entries.push((key, expected));
        }

        Ok(Self { entries })
    }

    pub fn to_json(&self) -> Value {
        let mut map = serde_json::Map::with_capacity(self.entries.len());
        for (key, expected) in &self.entries {
            let value = match expected {
                ConditionValue::One(token) => Value::String(token.clone()),
                ConditionValue::AnyOf(tokens) => {
                    Value::Array(tokens.iter().cloned().map(Value::String).collect())
                }
            };
            map.insert(key.as_str().to_owned(), value);
        }
        Value::Object(map)
    }

    pub fn entries(&self) -> &[(ConditionKey, ConditionValue)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: ConditionKey) -> Option<&ConditionValue> {
        self.entries.iter().find(|(candidate, _)| *candidate == key).map(|(_, value)| value)
    }
}
