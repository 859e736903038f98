use crate::dtos::gradebook::{GradeSheetResponse, SaveScoresRequest};
use crate::error::ApiError;
use crate::identity;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use database::services::catalog::CatalogService;
use database::services::gradebook::GradebookService;
use sea_orm::prelude::Uuid;

/// Persist a batch of raw scores and optionally finalize registrations.
/// The whole batch commits or rolls back as one unit.
#[utoipa::path(
    put,
    path = "/sections/{id}/grades",
    params(
        ("id" = Uuid, Path, description = "Section ID")
    ),
    request_body = SaveScoresRequest,
    responses(
        (status = 204, description = "Scores and final grades persisted"),
        (status = 401, description = "Missing or unknown X-User-Id header"),
        (status = 403, description = "Caller is not this section's staff"),
        (status = 404, description = "Section, registration, or assessment not found"),
        (status = 409, description = "Finalize targeted a dropped registration"),
        (status = 422, description = "A score is outside its assessment's range")
    ),
    tag = "Gradebook"
)]
pub async fn put_grades(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(request): Json<SaveScoresRequest>,
) -> Result<StatusCode, ApiError> {
    let actor = identity::load_actor(&state.db, &headers).await?;
    let section = CatalogService::get_section(&state.db, id).await?;
    identity::ensure_section_staff(&actor, &section)?;

    let entries = request.scores.into_iter().map(Into::into).collect();
    GradebookService::save_scores(&state.db, id, entries, request.finalize).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// The section's grade sheet: assessments plus each roster student's
/// stored scores
#[utoipa::path(
    get,
    path = "/sections/{id}/grades",
    params(
        ("id" = Uuid, Path, description = "Section ID")
    ),
    responses(
        (status = 200, description = "Grade sheet retrieved", body = GradeSheetResponse),
        (status = 401, description = "Missing or unknown X-User-Id header"),
        (status = 403, description = "Caller is not this section's staff"),
        (status = 404, description = "Section not found")
    ),
    tag = "Gradebook"
)]
pub async fn get_grades(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<GradeSheetResponse>, ApiError> {
    let actor = identity::load_actor(&state.db, &headers).await?;
    let section = CatalogService::get_section(&state.db, id).await?;
    identity::ensure_section_staff(&actor, &section)?;

    let sheet = GradebookService::grade_sheet(&state.db, id).await?;
    Ok(Json(sheet.into()))
}
