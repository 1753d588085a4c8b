//! Maintenance-calorie estimation (Mifflin-St Jeor) and goal adjustment.

use std::fmt;
use std::str::FromStr;

/// Calories added or removed from maintenance for weight goals.
pub const GOAL_ADJUSTMENT_KCAL: i32 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityLevel {
    Sedentary,
    Moderate,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    WeightLoss,
    WeightGain,
    Maintenance,
}

/// Rejected free-text value for one of the closed vocabularies above.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported {field} '{value}', expected one of: {expected}")]
pub struct UnknownValue {
    pub field: &'static str,
    pub value: String,
    pub expected: &'static str,
}

/// Lowercases and collapses `_`, `-` and repeated whitespace into single spaces.
fn normalize(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl FromStr for Gender {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            _ => Err(UnknownValue {
                field: "gender",
                value: s.to_string(),
                expected: "male, female",
            }),
        }
    }
}

impl ActivityLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "moderate" => Ok(ActivityLevel::Moderate),
            "active" => Ok(ActivityLevel::Active),
            _ => Err(UnknownValue {
                field: "activity level",
                value: s.to_string(),
                expected: "sedentary, moderate, active",
            }),
        }
    }
}

impl Goal {
    /// Label stored on plans and assignments; plan types are matched against it.
    pub fn as_str(self) -> &'static str {
        match self {
            Goal::WeightLoss => "weight loss",
            Goal::WeightGain => "weight gain",
            Goal::Maintenance => "maintenance",
        }
    }

    pub fn adjust(self, maintenance: i32) -> i32 {
        match self {
            Goal::WeightLoss => maintenance - GOAL_ADJUSTMENT_KCAL,
            Goal::WeightGain => maintenance + GOAL_ADJUSTMENT_KCAL,
            Goal::Maintenance => maintenance,
        }
    }
}

impl FromStr for Goal {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "weight loss" | "lose weight" => Ok(Goal::WeightLoss),
            "weight gain" | "gain weight" => Ok(Goal::WeightGain),
            "maintenance" | "maintain" => Ok(Goal::Maintenance),
            _ => Err(UnknownValue {
                field: "goal",
                value: s.to_string(),
                expected: "weight loss, weight gain, maintenance",
            }),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Basal metabolic rate in kcal/day.
pub fn bmr(weight_kg: f64, height_cm: f64, age_years: u32, gender: Gender) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age_years);
    match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

/// Maintenance calories: BMR scaled by the activity multiplier, rounded.
pub fn estimate(
    weight_kg: f64,
    height_cm: f64,
    age_years: u32,
    gender: Gender,
    activity: ActivityLevel,
) -> i32 {
    (bmr(weight_kg, height_cm, age_years, gender) * activity.multiplier()).round() as i32
}
