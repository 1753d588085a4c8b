use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Admin-curated diet plan.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DietPlan {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub plan_type: String,      // goal label, e.g. "weight loss"
    pub activity_level: String, // "sedentary" | "moderate" | "active"
    pub calorie_min: i32,
    pub calorie_max: i32,
    pub is_active: bool,
    pub meals: serde_json::Value,
    pub macros: serde_json::Value,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl DietPlan {
    /// Whether `calories` falls inside the inclusive calorie range.
    pub fn contains(&self, calories: i32) -> bool {
        self.calorie_min <= calories && calories <= self.calorie_max
    }

    /// Twice the distance between the range midpoint and `calories`.
    ///
    /// Doubling keeps half-kcal midpoints exact in integer arithmetic.
    pub fn midpoint_distance_x2(&self, calories: i32) -> i64 {
        (i64::from(self.calorie_min) + i64::from(self.calorie_max) - 2 * i64::from(calories)).abs()
    }
}

/// Fields an admin supplies when creating or replacing a plan.
#[derive(Debug, Clone)]
pub struct NewDietPlan {
    pub name: String,
    pub description: Option<String>,
    pub plan_type: String,
    pub activity_level: String,
    pub calorie_min: i32,
    pub calorie_max: i32,
    pub is_active: bool,
    pub meals: serde_json::Value,
    pub macros: serde_json::Value,
}

/// A plan handed to a user, with the inputs it was computed from.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlanAssignment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub diet_plan_id: Uuid,
    pub age: i32,
    pub gender: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub goal: String,
    pub activity_level: String,
    pub calculated_calories: i32,
    pub active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub user_id: Uuid,
    pub diet_plan_id: Uuid,
    pub age: i32,
    pub gender: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub goal: String,
    pub activity_level: String,
    pub calculated_calories: i32,
}
