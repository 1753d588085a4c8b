use axum::async_trait;
use uuid::Uuid;

use super::calories::{ActivityLevel, Goal};
use super::repo_types::{DietPlan, NewAssignment, NewDietPlan, PlanAssignment};

/// Read/write access to diet plans.
///
/// Goal and activity filters match the plan's text fields case-insensitively
/// as substrings. Only active plans are returned by the two lookup methods.
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Active plans for the goal/activity whose range contains `calories`.
    async fn find_in_range(
        &self,
        goal: Goal,
        activity: ActivityLevel,
        calories: i32,
    ) -> anyhow::Result<Vec<DietPlan>>;

    /// Active plans for the goal/activity, ignoring calories.
    async fn find_candidates(
        &self,
        goal: Goal,
        activity: ActivityLevel,
    ) -> anyhow::Result<Vec<DietPlan>>;

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<DietPlan>>;
    async fn list(&self, active: Option<bool>) -> anyhow::Result<Vec<DietPlan>>;
    async fn create(&self, plan: NewDietPlan) -> anyhow::Result<DietPlan>;
    async fn update(&self, id: Uuid, plan: NewDietPlan) -> anyhow::Result<Option<DietPlan>>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<PlanDeletion>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanDeletion {
    Deleted,
    NotFound,
    /// Assignments still reference the plan.
    InUse,
}

/// Per-user assignment history. Every lookup is scoped to the owner.
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    async fn insert(&self, assignment: NewAssignment) -> anyhow::Result<PlanAssignment>;
    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<PlanAssignment>>;
    async fn get(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<PlanAssignment>>;
    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool>;
}
