use crate::dtos::enrollment::{RegistrationResponse, RosterEntryResponse};
use crate::error::ApiError;
use crate::identity;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use database::services::catalog::CatalogService;
use database::services::enrollment::EnrollmentService;
use sea_orm::prelude::Uuid;

/// Register the calling student into a section
#[utoipa::path(
    post,
    path = "/sections/{id}/register",
    params(
        ("id" = Uuid, Path, description = "Section ID")
    ),
    responses(
        (status = 201, description = "Registration created or reactivated", body = RegistrationResponse),
        (status = 401, description = "Missing or unknown X-User-Id header"),
        (status = 403, description = "Caller's role cannot register"),
        (status = 404, description = "Section not found"),
        (status = 409, description = "Already registered, already completed, or section full"),
        (status = 422, description = "Prerequisites not met or registration window closed")
    ),
    tag = "Enrollment"
)]
pub async fn register(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<RegistrationResponse>), ApiError> {
    let actor = identity::load_actor(&state.db, &headers).await?;
    if !actor.role.can_register() {
        return Err(ApiError::Forbidden("registering for sections"));
    }

    let row = EnrollmentService::register(&state.db, actor.id, id).await?;
    Ok((StatusCode::CREATED, Json(row.into())))
}

/// Drop the calling student's active registration
#[utoipa::path(
    post,
    path = "/sections/{id}/drop",
    params(
        ("id" = Uuid, Path, description = "Section ID")
    ),
    responses(
        (status = 200, description = "Registration dropped", body = RegistrationResponse),
        (status = 401, description = "Missing or unknown X-User-Id header"),
        (status = 403, description = "Caller's role cannot register"),
        (status = 409, description = "No active registration for this section")
    ),
    tag = "Enrollment"
)]
pub async fn drop_registration(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<RegistrationResponse>, ApiError> {
    let actor = identity::load_actor(&state.db, &headers).await?;
    if !actor.role.can_register() {
        return Err(ApiError::Forbidden("registering for sections"));
    }

    let row = EnrollmentService::drop_registration(&state.db, actor.id, id).await?;
    Ok(Json(row.into()))
}

/// The section's roster of registered and completed students
#[utoipa::path(
    get,
    path = "/sections/{id}/roster",
    params(
        ("id" = Uuid, Path, description = "Section ID")
    ),
    responses(
        (status = 200, description = "Roster retrieved", body = [RosterEntryResponse]),
        (status = 401, description = "Missing or unknown X-User-Id header"),
        (status = 403, description = "Caller is not this section's staff"),
        (status = 404, description = "Section not found")
    ),
    tag = "Enrollment"
)]
pub async fn roster(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<Vec<RosterEntryResponse>>, ApiError> {
    let actor = identity::load_actor(&state.db, &headers).await?;
    let section = CatalogService::get_section(&state.db, id).await?;
    identity::ensure_section_staff(&actor, &section)?;

    let roster = EnrollmentService::roster(&state.db, id).await?;
    Ok(Json(roster.into_iter().map(Into::into).collect()))
}
