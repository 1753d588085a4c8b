use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::calories::{ActivityLevel, Gender, Goal};
use super::error::DietError;
use super::matcher::MatchKind;
use super::repo_types::{DietPlan, NewDietPlan, PlanAssignment};

pub const AGE_RANGE: std::ops::RangeInclusive<i32> = 1..=120;
pub const HEIGHT_RANGE_CM: std::ops::RangeInclusive<f64> = 50.0..=280.0;
pub const WEIGHT_RANGE_KG: std::ops::RangeInclusive<f64> = 20.0..=400.0;

/// Body metrics and goal as posted by the client. Every field is required.
#[derive(Debug, Default, Deserialize)]
pub struct MatchRequest {
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub goal: Option<String>,
    #[serde(alias = "activityLevel")]
    pub activity_level: Option<String>,
}

/// Validated, typed form of [`MatchRequest`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchInput {
    pub age: u32,
    pub gender: Gender,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub goal: Goal,
    pub activity: ActivityLevel,
}

fn present(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl MatchRequest {
    pub fn validate(&self) -> Result<MatchInput, DietError> {
        let gender = present(&self.gender);
        let goal = present(&self.goal);
        let activity = present(&self.activity_level);

        let missing: Vec<&str> = [
            ("age", self.age.is_none()),
            ("gender", gender.is_none()),
            ("height", self.height.is_none()),
            ("weight", self.weight.is_none()),
            ("goal", goal.is_none()),
            ("activity_level", activity.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();

        let (Some(age), Some(gender), Some(height), Some(weight), Some(goal), Some(activity)) =
            (self.age, gender, self.height, self.weight, goal, activity)
        else {
            return Err(DietError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        };

        if !AGE_RANGE.contains(&age) {
            return Err(DietError::Validation(format!(
                "age must be between {} and {}",
                AGE_RANGE.start(),
                AGE_RANGE.end()
            )));
        }
        if !height.is_finite() || !HEIGHT_RANGE_CM.contains(&height) {
            return Err(DietError::Validation(format!(
                "height must be between {} and {} cm",
                HEIGHT_RANGE_CM.start(),
                HEIGHT_RANGE_CM.end()
            )));
        }
        if !weight.is_finite() || !WEIGHT_RANGE_KG.contains(&weight) {
            return Err(DietError::Validation(format!(
                "weight must be between {} and {} kg",
                WEIGHT_RANGE_KG.start(),
                WEIGHT_RANGE_KG.end()
            )));
        }

        Ok(MatchInput {
            age: age as u32,
            gender: gender.parse()?,
            height_cm: height,
            weight_kg: weight,
            goal: goal.parse()?,
            activity: activity.parse()?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CalorieResponse {
    pub maintenance_calories: i32,
    pub target_calories: i32,
    pub goal: &'static str,
    pub activity_level: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub success: bool,
    pub message: &'static str,
    pub match_kind: MatchKind,
    pub is_exact_match: bool,
    pub calculated_calories: i32,
    pub assignment: PlanAssignment,
    pub plan: DietPlan,
}

/// Assignment with its plan expanded. `plan` is `None` only if the plan row is gone.
#[derive(Debug, Serialize)]
pub struct AssignmentDetails {
    #[serde(flatten)]
    pub assignment: PlanAssignment,
    pub plan: Option<DietPlan>,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 {
    20
}

impl Pagination {
    /// Limit clamped to 1..=100, offset to >= 0.
    pub fn clamped(&self) -> (i64, i64) {
        (self.limit.clamp(1, 100), self.offset.max(0))
    }
}

#[derive(Debug, Deserialize)]
pub struct PlanFilter {
    pub active: Option<bool>,
}

/// Body for creating or fully replacing a plan.
#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(alias = "type")]
    pub plan_type: String,
    #[serde(alias = "activityLevel")]
    pub activity_level: String,
    pub calorie_min: i32,
    pub calorie_max: i32,
    #[serde(default = "default_active", alias = "isActive")]
    pub is_active: bool,
    #[serde(default)]
    pub meals: Option<serde_json::Value>,
    #[serde(default)]
    pub macros: Option<serde_json::Value>,
}
fn default_active() -> bool {
    true
}

impl PlanRequest {
    /// Checks the range invariant and stores type and activity under their canonical labels.
    pub fn validate(self) -> Result<NewDietPlan, DietError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(DietError::Validation("name is required".into()));
        }
        let goal: Goal = self.plan_type.parse()?;
        let activity: ActivityLevel = self.activity_level.parse()?;
        if self.calorie_min < 0 {
            return Err(DietError::Validation("calorie_min must not be negative".into()));
        }
        if self.calorie_min > self.calorie_max {
            return Err(DietError::Validation(
                "calorie_min must not exceed calorie_max".into(),
            ));
        }
        Ok(NewDietPlan {
            name,
            description: self.description.filter(|d| !d.trim().is_empty()),
            plan_type: goal.as_str().to_string(),
            activity_level: activity.as_str().to_string(),
            calorie_min: self.calorie_min,
            calorie_max: self.calorie_max,
            is_active: self.is_active,
            meals: self.meals.unwrap_or_else(|| serde_json::json!([])),
            macros: self.macros.unwrap_or_else(|| serde_json::json!({})),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub success: bool,
    pub id: Uuid,
}
