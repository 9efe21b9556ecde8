use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Age bracket reported in the questionnaire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "under_18")]
    Under18,
    #[serde(rename = "18_30")]
    From18To30,
    #[serde(rename = "31_45")]
    From31To45,
    #[serde(rename = "46_60")]
    From46To60,
    #[serde(rename = "60_plus")]
    Plus60,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityLevel {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "1_2_week")]
    OneToTwoPerWeek,
    #[serde(rename = "3_5_week")]
    ThreeToFivePerWeek,
    #[serde(rename = "daily")]
    Daily,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StressLevel {
    Low,
    Medium,
    High,
    Constant,
}

/// How often the user eats full, balanced meals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Nutrition {
    #[serde(rename = "daily")]
    Daily,
    #[serde(rename = "3_4_week")]
    ThreeToFourPerWeek,
    #[serde(rename = "rare")]
    Rare,
}

impl AgeGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Under18 => "under_18",
            Self::From18To30 => "18_30",
            Self::From31To45 => "31_45",
            Self::From46To60 => "46_60",
            Self::Plus60 => "60_plus",
        }
    }
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::OneToTwoPerWeek => "1_2_week",
            Self::ThreeToFivePerWeek => "3_5_week",
            Self::Daily => "daily",
        }
    }
}

impl StressLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Constant => "constant",
        }
    }
}

impl Nutrition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::ThreeToFourPerWeek => "3_4_week",
            Self::Rare => "rare",
        }
    }
}

impl std::str::FromStr for AgeGroup {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "under_18" => Ok(Self::Under18),
            "18_30" => Ok(Self::From18To30),
            "31_45" => Ok(Self::From31To45),
            "46_60" => Ok(Self::From46To60),
            "60_plus" => Ok(Self::Plus60),
            unknown => Err(DomainError::InvalidFieldValue {
                field: "age_group",
                value: unknown.to_owned(),
            }),
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            unknown => Err(DomainError::InvalidFieldValue {
                field: "gender",
                value: unknown.to_owned(),
            }),
        }
    }
}

impl std::str::FromStr for ActivityLevel {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "none" => Ok(Self::None),
            "1_2_week" => Ok(Self::OneToTwoPerWeek),
            "3_5_week" => Ok(Self::ThreeToFivePerWeek),
            "daily" => Ok(Self::Daily),
            unknown => Err(DomainError::InvalidFieldValue {
                field: "activity_level",
                value: unknown.to_owned(),
            }),
        }
    }
}

impl std::str::FromStr for StressLevel {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "constant" => Ok(Self::Constant),
            unknown => Err(DomainError::InvalidFieldValue {
                field: "stress_level",
                value: unknown.to_owned(),
            }),
        }
    }
}

impl std::str::FromStr for Nutrition {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "daily" => Ok(Self::Daily),
            "3_4_week" => Ok(Self::ThreeToFourPerWeek),
            "rare" => Ok(Self::Rare),
            unknown => Err(DomainError::InvalidFieldValue {
                field: "nutrition",
                value: unknown.to_owned(),
            }),
        }
    }
}

/// Normalized questionnaire answers for one user. Exactly one profile
/// exists per user; resubmission replaces every field, no merging.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyProfile {
    pub user_id: UserId,
    pub age_group: AgeGroup,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub stress_level: StressLevel,
    pub nutrition: Nutrition,
    pub restrictions: Vec<String>,
    pub complaints: Vec<String>,
    pub goals: Vec<String>,
    pub vitamins_current: Vec<String>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}
