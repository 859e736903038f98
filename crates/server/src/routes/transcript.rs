use crate::dtos::transcript::{SgpaQueryParams, SgpaResponse, TranscriptResponse};
use crate::error::ApiError;
use crate::identity;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use database::entities::user;
use database::services::transcript::TranscriptService;
use sea_orm::prelude::Uuid;

fn ensure_transcript_access(actor: &user::Model, student_id: Uuid) -> Result<(), ApiError> {
    if actor.id != student_id && !actor.role.can_view_any_transcript() {
        return Err(ApiError::Forbidden("viewing another student's transcript"));
    }
    Ok(())
}

/// A student's completed courses and cumulative GPA
#[utoipa::path(
    get,
    path = "/students/{id}/transcript",
    params(
        ("id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Transcript retrieved", body = TranscriptResponse),
        (status = 401, description = "Missing or unknown X-User-Id header"),
        (status = 403, description = "Caller may not view this transcript"),
        (status = 404, description = "Student not found")
    ),
    tag = "Transcript"
)]
pub async fn get_transcript(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<TranscriptResponse>, ApiError> {
    let actor = identity::load_actor(&state.db, &headers).await?;
    ensure_transcript_access(&actor, id)?;

    let transcript = TranscriptService::transcript(&state.db, id).await?;
    Ok(Json(TranscriptResponse::new(id, transcript)))
}

/// A student's GPA restricted to one semester
#[utoipa::path(
    get,
    path = "/students/{id}/sgpa",
    params(
        ("id" = Uuid, Path, description = "Student ID"),
        SgpaQueryParams
    ),
    responses(
        (status = 200, description = "Semester GPA computed", body = SgpaResponse),
        (status = 401, description = "Missing or unknown X-User-Id header"),
        (status = 403, description = "Caller may not view this transcript"),
        (status = 404, description = "Student or semester not found")
    ),
    tag = "Transcript"
)]
pub async fn get_sgpa(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<SgpaQueryParams>,
    headers: HeaderMap,
) -> Result<Json<SgpaResponse>, ApiError> {
    let actor = identity::load_actor(&state.db, &headers).await?;
    ensure_transcript_access(&actor, id)?;

    let sgpa = TranscriptService::sgpa(&state.db, id, params.semester_id).await?;
    Ok(Json(SgpaResponse {
        student_id: id,
        semester_id: params.semester_id,
        sgpa,
    }))
}
