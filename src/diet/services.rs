use tracing::{info, warn};
use uuid::Uuid;

use super::calories::estimate;
use super::dto::{AssignmentDetails, MatchInput};
use super::error::DietError;
use super::matcher::{PlanMatch, PlanMatcher};
use super::repo_types::{NewAssignment, PlanAssignment};
use super::store::{AssignmentStore, PlanStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalorieTarget {
    pub maintenance: i32,
    pub target: i32,
}

pub fn calculate(input: &MatchInput) -> CalorieTarget {
    let maintenance = estimate(
        input.weight_kg,
        input.height_cm,
        input.age,
        input.gender,
        input.activity,
    );
    CalorieTarget {
        maintenance,
        target: input.goal.adjust(maintenance),
    }
}

/// Estimates calories, matches a plan and records it for `user_id`.
///
/// Every call writes a new assignment; earlier ones are left untouched.
pub async fn assign(
    plans: &dyn PlanStore,
    assignments: &dyn AssignmentStore,
    user_id: Uuid,
    input: &MatchInput,
) -> Result<(PlanAssignment, PlanMatch), DietError> {
    let calories = calculate(input);

    let Some(found) = PlanMatcher::new(plans)
        .find_plan(calories.target, input.goal, input.activity)
        .await?
    else {
        warn!(
            %user_id,
            target = calories.target,
            goal = %input.goal,
            activity = %input.activity,
            "no diet plan for goal/activity"
        );
        return Err(DietError::NoSuitablePlan);
    };

    let assignment = assignments
        .insert(NewAssignment {
            user_id,
            diet_plan_id: found.plan.id,
            age: input.age as i32,
            gender: input.gender.as_str().to_string(),
            height_cm: input.height_cm,
            weight_kg: input.weight_kg,
            goal: input.goal.as_str().to_string(),
            activity_level: input.activity.as_str().to_string(),
            calculated_calories: calories.target,
        })
        .await?;

    info!(
        %user_id,
        assignment_id = %assignment.id,
        plan_id = %found.plan.id,
        kind = ?found.kind,
        target = calories.target,
        "diet plan assigned"
    );
    Ok((assignment, found))
}

async fn populate(
    plans: &dyn PlanStore,
    assignment: PlanAssignment,
) -> Result<AssignmentDetails, DietError> {
    let plan = plans.get(assignment.diet_plan_id).await?;
    Ok(AssignmentDetails { assignment, plan })
}

pub async fn list_assignments(
    plans: &dyn PlanStore,
    assignments: &dyn AssignmentStore,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<AssignmentDetails>, DietError> {
    let rows = assignments.list_by_user(user_id, limit, offset).await?;
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        out.push(populate(plans, row).await?);
    }
    Ok(out)
}

pub async fn get_assignment(
    plans: &dyn PlanStore,
    assignments: &dyn AssignmentStore,
    user_id: Uuid,
    id: Uuid,
) -> Result<AssignmentDetails, DietError> {
    let row = assignments
        .get(user_id, id)
        .await?
        .ok_or(DietError::NotFound("Assignment"))?;
    populate(plans, row).await
}

pub async fn delete_assignment(
    assignments: &dyn AssignmentStore,
    user_id: Uuid,
    id: Uuid,
) -> Result<(), DietError> {
    if assignments.delete(user_id, id).await? {
        info!(%user_id, assignment_id = %id, "assignment deleted");
        Ok(())
    } else {
        Err(DietError::NotFound("Assignment"))
    }
}
