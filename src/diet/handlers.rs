use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::{auth::AuthUser, state::AppState};

use super::dto::{
    AssignmentDetails, CalorieResponse, Deleted, MatchRequest, MatchResponse, Pagination,
};
use super::error::DietError;
use super::extract::JsonBody;
use super::services;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/diet/calculate", post(calculate))
        .route("/diet/match", post(match_plan))
        .route("/diet/assignments", get(list_assignments))
        .route(
            "/diet/assignments/:id",
            get(get_assignment).delete(delete_assignment),
        )
}

/// POST /diet/calculate: calorie preview, nothing is stored.
#[instrument(skip(body))]
pub async fn calculate(
    AuthUser(user_id): AuthUser,
    JsonBody(body): JsonBody<MatchRequest>,
) -> Result<Json<CalorieResponse>, DietError> {
    let input = body.validate().inspect_err(|e| {
        warn!(%user_id, error = %e, "calculate rejected");
    })?;
    let calories = services::calculate(&input);
    Ok(Json(CalorieResponse {
        maintenance_calories: calories.maintenance,
        target_calories: calories.target,
        goal: input.goal.as_str(),
        activity_level: input.activity.as_str(),
    }))
}

/// POST /diet/match: estimate, match and record a plan for the caller.
#[instrument(skip(state, body))]
pub async fn match_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    JsonBody(body): JsonBody<MatchRequest>,
) -> Result<(StatusCode, Json<MatchResponse>), DietError> {
    let input = body.validate().inspect_err(|e| {
        warn!(%user_id, error = %e, "match rejected");
    })?;

    let (assignment, found) = services::assign(
        state.plans.as_ref(),
        state.assignments.as_ref(),
        user_id,
        &input,
    )
    .await?;

    let is_exact_match = found.plan.contains(assignment.calculated_calories);
    Ok((
        StatusCode::CREATED,
        Json(MatchResponse {
            success: true,
            message: if is_exact_match {
                "Exact match found"
            } else {
                "Closest matching plan found"
            },
            match_kind: found.kind,
            is_exact_match,
            calculated_calories: assignment.calculated_calories,
            assignment,
            plan: found.plan,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_assignments(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<AssignmentDetails>>, DietError> {
    let (limit, offset) = p.clamped();
    let items = services::list_assignments(
        state.plans.as_ref(),
        state.assignments.as_ref(),
        user_id,
        limit,
        offset,
    )
    .await?;
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn get_assignment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AssignmentDetails>, DietError> {
    let details =
        services::get_assignment(state.plans.as_ref(), state.assignments.as_ref(), user_id, id)
            .await?;
    Ok(Json(details))
}

#[instrument(skip(state))]
pub async fn delete_assignment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Deleted>, DietError> {
    services::delete_assignment(state.assignments.as_ref(), user_id, id).await?;
    Ok(Json(Deleted { success: true, id }))
}
