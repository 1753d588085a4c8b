use anyhow::Context;
use axum::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::calories::{ActivityLevel, Goal};
use super::repo_types::{DietPlan, NewAssignment, NewDietPlan, PlanAssignment};
use super::store::{AssignmentStore, PlanDeletion, PlanStore};

const PLAN_COLUMNS: &str = "id, name, description, plan_type, activity_level, calorie_min, \
     calorie_max, is_active, meals, macros, created_at, updated_at";

const ASSIGNMENT_COLUMNS: &str = "id, user_id, diet_plan_id, age, gender, height_cm, weight_kg, \
     goal, activity_level, calculated_calories, active, created_at";

#[derive(Clone)]
pub struct PgPlanStore {
    db: PgPool,
}

impl PgPlanStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PlanStore for PgPlanStore {
    async fn find_in_range(
        &self,
        goal: Goal,
        activity: ActivityLevel,
        calories: i32,
    ) -> anyhow::Result<Vec<DietPlan>> {
        let sql = format!(
            r#"
            SELECT {PLAN_COLUMNS}
              FROM diet_plans
             WHERE is_active
               AND plan_type ILIKE '%' || $1 || '%'
               AND activity_level ILIKE '%' || $2 || '%'
               AND calorie_min <= $3
               AND calorie_max >= $3
             ORDER BY calorie_min ASC, created_at ASC, id ASC
            "#
        );
        let rows = sqlx::query_as::<_, DietPlan>(&sql)
            .bind(goal.as_str())
            .bind(activity.as_str())
            .bind(calories)
            .fetch_all(&self.db)
            .await
            .context("find plans in range")?;
        Ok(rows)
    }

    async fn find_candidates(
        &self,
        goal: Goal,
        activity: ActivityLevel,
    ) -> anyhow::Result<Vec<DietPlan>> {
        let sql = format!(
            r#"
            SELECT {PLAN_COLUMNS}
              FROM diet_plans
             WHERE is_active
               AND plan_type ILIKE '%' || $1 || '%'
               AND activity_level ILIKE '%' || $2 || '%'
             ORDER BY calorie_min ASC, created_at ASC, id ASC
            "#
        );
        let rows = sqlx::query_as::<_, DietPlan>(&sql)
            .bind(goal.as_str())
            .bind(activity.as_str())
            .fetch_all(&self.db)
            .await
            .context("find candidate plans")?;
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<DietPlan>> {
        let sql = format!("SELECT {PLAN_COLUMNS} FROM diet_plans WHERE id = $1");
        let row = sqlx::query_as::<_, DietPlan>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .context("get plan")?;
        Ok(row)
    }

    async fn list(&self, active: Option<bool>) -> anyhow::Result<Vec<DietPlan>> {
        let sql = format!(
            r#"
            SELECT {PLAN_COLUMNS}
              FROM diet_plans
             WHERE ($1::boolean IS NULL OR is_active = $1)
             ORDER BY plan_type ASC, activity_level ASC, calorie_min ASC
            "#
        );
        let rows = sqlx::query_as::<_, DietPlan>(&sql)
            .bind(active)
            .fetch_all(&self.db)
            .await
            .context("list plans")?;
        Ok(rows)
    }

    async fn create(&self, plan: NewDietPlan) -> anyhow::Result<DietPlan> {
        let sql = format!(
            r#"
            INSERT INTO diet_plans
                (name, description, plan_type, activity_level, calorie_min, calorie_max,
                 is_active, meals, macros)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {PLAN_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, DietPlan>(&sql)
            .bind(plan.name)
            .bind(plan.description)
            .bind(plan.plan_type)
            .bind(plan.activity_level)
            .bind(plan.calorie_min)
            .bind(plan.calorie_max)
            .bind(plan.is_active)
            .bind(plan.meals)
            .bind(plan.macros)
            .fetch_one(&self.db)
            .await
            .context("insert plan")?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, plan: NewDietPlan) -> anyhow::Result<Option<DietPlan>> {
        let sql = format!(
            r#"
            UPDATE diet_plans
               SET name = $2, description = $3, plan_type = $4, activity_level = $5,
                   calorie_min = $6, calorie_max = $7, is_active = $8, meals = $9,
                   macros = $10, updated_at = now()
             WHERE id = $1
            RETURNING {PLAN_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, DietPlan>(&sql)
            .bind(id)
            .bind(plan.name)
            .bind(plan.description)
            .bind(plan.plan_type)
            .bind(plan.activity_level)
            .bind(plan.calorie_min)
            .bind(plan.calorie_max)
            .bind(plan.is_active)
            .bind(plan.meals)
            .bind(plan.macros)
            .fetch_optional(&self.db)
            .await
            .context("update plan")?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<PlanDeletion> {
        let res = sqlx::query("DELETE FROM diet_plans WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await;
        match res {
            Ok(r) if r.rows_affected() > 0 => Ok(PlanDeletion::Deleted),
            Ok(_) => Ok(PlanDeletion::NotFound),
            // user_diet_plans still references the plan
            Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
                Ok(PlanDeletion::InUse)
            }
            Err(e) => Err(e).context("delete plan"),
        }
    }
}

#[derive(Clone)]
pub struct PgAssignmentStore {
    db: PgPool,
}

impl PgAssignmentStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AssignmentStore for PgAssignmentStore {
    async fn insert(&self, a: NewAssignment) -> anyhow::Result<PlanAssignment> {
        let sql = format!(
            r#"
            INSERT INTO user_diet_plans
                (user_id, diet_plan_id, age, gender, height_cm, weight_kg, goal,
                 activity_level, calculated_calories)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {ASSIGNMENT_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, PlanAssignment>(&sql)
            .bind(a.user_id)
            .bind(a.diet_plan_id)
            .bind(a.age)
            .bind(a.gender)
            .bind(a.height_cm)
            .bind(a.weight_kg)
            .bind(a.goal)
            .bind(a.activity_level)
            .bind(a.calculated_calories)
            .fetch_one(&self.db)
            .await
            .context("insert assignment")?;
        Ok(row)
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<PlanAssignment>> {
        let sql = format!(
            r#"
            SELECT {ASSIGNMENT_COLUMNS}
              FROM user_diet_plans
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3
            "#
        );
        let rows = sqlx::query_as::<_, PlanAssignment>(&sql)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.db)
            .await
            .context("list assignments")?;
        Ok(rows)
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<PlanAssignment>> {
        let sql = format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM user_diet_plans WHERE id = $1 AND user_id = $2"
        );
        let row = sqlx::query_as::<_, PlanAssignment>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await
            .context("get assignment")?;
        Ok(row)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM user_diet_plans WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.db)
            .await
            .context("delete assignment")?;
        Ok(res.rows_affected() > 0)
    }
}
