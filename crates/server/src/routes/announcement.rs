use crate::dtos::announcement::{
    AnnouncementQueryParams, AnnouncementResponse, PostAnnouncementRequest,
};
use crate::error::ApiError;
use crate::identity;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use database::services::announcement::AnnouncementService;
use database::services::catalog::CatalogService;
use models::role::Role;

/// Post an announcement, either for one section or campus-wide
#[utoipa::path(
    post,
    path = "/announcements",
    request_body = PostAnnouncementRequest,
    responses(
        (status = 201, description = "Announcement posted", body = AnnouncementResponse),
        (status = 401, description = "Missing or unknown X-User-Id header"),
        (status = 403, description = "Caller's role may not post here"),
        (status = 404, description = "Section not found")
    ),
    tag = "Announcements"
)]
pub async fn post_announcement(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<PostAnnouncementRequest>,
) -> Result<(StatusCode, Json<AnnouncementResponse>), ApiError> {
    let actor = identity::load_actor(&state.db, &headers).await?;
    if !actor.role.can_announce() {
        return Err(ApiError::Forbidden("posting announcements"));
    }

    match request.section_id {
        // Campus-wide posts are reserved for administrators
        None => {
            if actor.role != Role::Admin {
                return Err(ApiError::Forbidden("posting campus-wide announcements"));
            }
        }
        Some(section_id) => {
            let section = CatalogService::get_section(&state.db, section_id).await?;
            identity::ensure_section_staff(&actor, &section)?;
        }
    }

    let announcement = AnnouncementService::post(
        &state.db,
        actor.id,
        request.section_id,
        &request.title,
        &request.body,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(announcement.into())))
}

/// List announcements: a section's feed (including campus-wide posts) or
/// campus-wide posts only
#[utoipa::path(
    get,
    path = "/announcements",
    params(AnnouncementQueryParams),
    responses(
        (status = 200, description = "Announcements retrieved", body = [AnnouncementResponse]),
        (status = 404, description = "Section not found")
    ),
    tag = "Announcements"
)]
pub async fn list_announcements(
    State(state): State<AppState>,
    Query(params): Query<AnnouncementQueryParams>,
) -> Result<Json<Vec<AnnouncementResponse>>, ApiError> {
    let announcements = match params.section_id {
        Some(section_id) => AnnouncementService::for_section(&state.db, section_id).await?,
        None => AnnouncementService::campus_wide(&state.db).await?,
    };

    Ok(Json(announcements.into_iter().map(Into::into).collect()))
}
