//! HTTP API handlers

use super::error::ApiResult;
use super::state::AppState;
use super::types::*;
use crate::core_space::{Space, SpaceId};
use crate::health::HealthCheck;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

// ============================================================================
// Service Handlers
// ============================================================================

/// GET / - Service banner
pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to Kitaverse Backend".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /health - Component health report
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthCheck>) {
    let report = state.refresh_health().await;
    let status = StatusCode::from_u16(report.status.to_http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(report))
}

/// GET /ready - Whether the service can take traffic
pub async fn ready(State(state): State<Arc<AppState>>) -> (StatusCode, Json<ReadinessResponse>) {
    let ready = state.refresh_readiness().await;
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(ReadinessResponse { ready }))
}

/// GET /metrics - Prometheus exposition
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        ),
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain")],
            "metrics disabled".to_string(),
        ),
    }
}

// ============================================================================
// Space Handlers
// ============================================================================

/// GET /spaces - List all spaces
pub async fn list_spaces(State(state): State<Arc<AppState>>) -> Json<SpaceListResponse> {
    Json(SpaceListResponse {
        spaces: state.spaces.list_spaces().await,
    })
}

/// GET /spaces/:id - Get one space
pub async fn get_space(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Space>> {
    let Path(space_id) = path?;
    let space = state.spaces.get_space(SpaceId(space_id)).await?;
    Ok(Json(space))
}

/// POST /spaces/:id/enter - Enter a space
pub async fn enter_space(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<EnterSpaceRequest>, JsonRejection>,
) -> ApiResult<Json<MembershipResponse>> {
    let Path(space_id) = path?;
    let Json(req) = body?;
    req.validate().map_err(super::error::ApiError::InvalidRequest)?;

    let change = state
        .spaces
        .enter_space(SpaceId(space_id), req.into_profile())
        .await?;

    Ok(Json(MembershipResponse {
        message: format!("User {} entered {}", change.user.name, change.space.name),
        space: change.space,
    }))
}

/// POST /spaces/:id/leave?user_id= - Leave a space
pub async fn leave_space(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
    query: Result<Query<LeaveSpaceQuery>, QueryRejection>,
) -> ApiResult<Json<MembershipResponse>> {
    let Path(space_id) = path?;
    let Query(query) = query?;

    let change = state
        .spaces
        .leave_space(SpaceId(space_id), query.user_id)
        .await?;

    Ok(Json(MembershipResponse {
        message: format!("User {} left {}", change.user.name, change.space.name),
        space: change.space,
    }))
}

/// GET /spaces/:id/users - List the users in a space
pub async fn list_occupants(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<OccupantListResponse>> {
    let Path(space_id) = path?;
    let users = state.spaces.list_occupants(SpaceId(space_id)).await?;
    Ok(Json(OccupantListResponse { users }))
}
