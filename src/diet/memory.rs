//! In-memory stores for tests.

use std::sync::Arc;

use axum::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::calories::{ActivityLevel, Goal};
use super::repo_types::{DietPlan, NewAssignment, NewDietPlan, PlanAssignment};
use super::store::{AssignmentStore, PlanDeletion, PlanStore};

pub fn plan_fixture(plan_type: &str, activity_level: &str, min: i32, max: i32) -> DietPlan {
    let now = OffsetDateTime::now_utc();
    DietPlan {
        id: Uuid::new_v4(),
        name: format!("{plan_type} {activity_level} {min}-{max}"),
        description: None,
        plan_type: plan_type.into(),
        activity_level: activity_level.into(),
        calorie_min: min,
        calorie_max: max,
        is_active: true,
        meals: serde_json::json!([]),
        macros: serde_json::json!({}),
        created_at: now,
        updated_at: now,
    }
}

fn matches_text(field: &str, label: &str) -> bool {
    field.to_lowercase().contains(label)
}

type AssignmentRows = Arc<RwLock<Vec<PlanAssignment>>>;

#[derive(Default)]
pub struct MemoryPlanStore {
    plans: RwLock<Vec<DietPlan>>,
    // rows of the paired assignment store, checked on delete like the FK
    assignments: AssignmentRows,
}

impl MemoryPlanStore {
    /// Plan store that refuses to delete plans `assignments` still points at.
    pub fn referenced_by(assignments: &MemoryAssignmentStore) -> Self {
        Self {
            plans: RwLock::default(),
            assignments: Arc::clone(&assignments.rows),
        }
    }

    pub async fn with_plans(plans: Vec<DietPlan>) -> Self {
        let store = Self::default();
        store.plans.write().await.extend(plans);
        store
    }

    async fn matching(&self, goal: Goal, activity: ActivityLevel) -> Vec<DietPlan> {
        self.plans
            .read()
            .await
            .iter()
            .filter(|p| {
                p.is_active
                    && matches_text(&p.plan_type, goal.as_str())
                    && matches_text(&p.activity_level, activity.as_str())
            })
            .cloned()
            .collect()
    }
}

#[async_trait]
impl PlanStore for MemoryPlanStore {
    async fn find_in_range(
        &self,
        goal: Goal,
        activity: ActivityLevel,
        calories: i32,
    ) -> anyhow::Result<Vec<DietPlan>> {
        let mut plans = self.matching(goal, activity).await;
        plans.retain(|p| p.contains(calories));
        Ok(plans)
    }

    async fn find_candidates(
        &self,
        goal: Goal,
        activity: ActivityLevel,
    ) -> anyhow::Result<Vec<DietPlan>> {
        Ok(self.matching(goal, activity).await)
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<DietPlan>> {
        Ok(self.plans.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn list(&self, active: Option<bool>) -> anyhow::Result<Vec<DietPlan>> {
        Ok(self
            .plans
            .read()
            .await
            .iter()
            .filter(|p| active.map_or(true, |a| p.is_active == a))
            .cloned()
            .collect())
    }

    async fn create(&self, plan: NewDietPlan) -> anyhow::Result<DietPlan> {
        let now = OffsetDateTime::now_utc();
        let row = DietPlan {
            id: Uuid::new_v4(),
            name: plan.name,
            description: plan.description,
            plan_type: plan.plan_type,
            activity_level: plan.activity_level,
            calorie_min: plan.calorie_min,
            calorie_max: plan.calorie_max,
            is_active: plan.is_active,
            meals: plan.meals,
            macros: plan.macros,
            created_at: now,
            updated_at: now,
        };
        self.plans.write().await.push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: Uuid, plan: NewDietPlan) -> anyhow::Result<Option<DietPlan>> {
        let mut plans = self.plans.write().await;
        let Some(row) = plans.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        row.name = plan.name;
        row.description = plan.description;
        row.plan_type = plan.plan_type;
        row.activity_level = plan.activity_level;
        row.calorie_min = plan.calorie_min;
        row.calorie_max = plan.calorie_max;
        row.is_active = plan.is_active;
        row.meals = plan.meals;
        row.macros = plan.macros;
        row.updated_at = OffsetDateTime::now_utc();
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<PlanDeletion> {
        let mut plans = self.plans.write().await;
        let Some(pos) = plans.iter().position(|p| p.id == id) else {
            return Ok(PlanDeletion::NotFound);
        };
        if self
            .assignments
            .read()
            .await
            .iter()
            .any(|a| a.diet_plan_id == id)
        {
            return Ok(PlanDeletion::InUse);
        }
        plans.remove(pos);
        Ok(PlanDeletion::Deleted)
    }
}

#[derive(Default)]
pub struct MemoryAssignmentStore {
    rows: AssignmentRows,
}

#[async_trait]
impl AssignmentStore for MemoryAssignmentStore {
    async fn insert(&self, a: NewAssignment) -> anyhow::Result<PlanAssignment> {
        let row = PlanAssignment {
            id: Uuid::new_v4(),
            user_id: a.user_id,
            diet_plan_id: a.diet_plan_id,
            age: a.age,
            gender: a.gender,
            height_cm: a.height_cm,
            weight_kg: a.weight_kg,
            goal: a.goal,
            activity_level: a.activity_level,
            calculated_calories: a.calculated_calories,
            active: true,
            created_at: OffsetDateTime::now_utc(),
        };
        self.rows.write().await.push(row.clone());
        Ok(row)
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<PlanAssignment>> {
        // newest first; insertion order stands in for created_at
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<PlanAssignment>> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .find(|r| r.id == id && r.user_id == user_id)
            .cloned())
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| !(r.id == id && r.user_id == user_id));
        Ok(rows.len() < before)
    }
}
