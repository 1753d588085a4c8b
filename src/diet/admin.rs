use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::{
    auth::{AdminUser, Principal, Role},
    state::AppState,
};

use super::dto::{Deleted, PlanFilter, PlanRequest};
use super::error::DietError;
use super::extract::JsonBody;
use super::repo_types::DietPlan;
use super::store::PlanDeletion;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/diet-plans", get(list_plans).post(create_plan))
        .route(
            "/diet-plans/:id",
            get(get_plan).put(update_plan).delete(delete_plan),
        )
}

/// GET /diet-plans: members see active plans only; `?active=` is honoured for admins.
#[instrument(skip(state, caller))]
pub async fn list_plans(
    State(state): State<AppState>,
    caller: Principal,
    Query(filter): Query<PlanFilter>,
) -> Result<Json<Vec<DietPlan>>, DietError> {
    let active = if caller.role == Role::Admin {
        filter.active
    } else {
        Some(true)
    };
    let plans = state.plans.list(active).await?;
    debug!(
        user_id = %caller.user_id,
        role = ?caller.role,
        count = plans.len(),
        "diet plans listed"
    );
    Ok(Json(plans))
}

#[instrument(skip(state, caller))]
pub async fn get_plan(
    State(state): State<AppState>,
    caller: Principal,
    Path(id): Path<Uuid>,
) -> Result<Json<DietPlan>, DietError> {
    let plan = state
        .plans
        .get(id)
        .await?
        .filter(|p| p.is_active || caller.role == Role::Admin)
        .ok_or(DietError::NotFound("Diet plan"))?;
    debug!(user_id = %caller.user_id, plan_id = %id, "diet plan fetched");
    Ok(Json(plan))
}

#[instrument(skip(state, body))]
pub async fn create_plan(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    JsonBody(body): JsonBody<PlanRequest>,
) -> Result<(StatusCode, Json<DietPlan>), DietError> {
    let plan = state.plans.create(body.validate()?).await?;
    info!(%admin_id, plan_id = %plan.id, "diet plan created");
    Ok((StatusCode::CREATED, Json(plan)))
}

#[instrument(skip(state, body))]
pub async fn update_plan(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    Path(id): Path<Uuid>,
    JsonBody(body): JsonBody<PlanRequest>,
) -> Result<Json<DietPlan>, DietError> {
    let plan = state
        .plans
        .update(id, body.validate()?)
        .await?
        .ok_or(DietError::NotFound("Diet plan"))?;
    info!(%admin_id, plan_id = %plan.id, "diet plan updated");
    Ok(Json(plan))
}

#[instrument(skip(state))]
pub async fn delete_plan(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Deleted>, DietError> {
    match state.plans.delete(id).await? {
        PlanDeletion::Deleted => {
            info!(%admin_id, plan_id = %id, "diet plan deleted");
            Ok(Json(Deleted { success: true, id }))
        }
        PlanDeletion::NotFound => Err(DietError::NotFound("Diet plan")),
        PlanDeletion::InUse => Err(DietError::Conflict(
            "Diet plan is referenced by user assignments; deactivate it instead".into(),
        )),
    }
}
