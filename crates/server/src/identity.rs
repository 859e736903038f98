use crate::error::ApiError;
use axum::http::HeaderMap;
use database::entities::{section, user};
use database::error::RegistrarError;
use models::role::Role;
use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

/// Header carrying the authenticated caller's id, asserted by the
/// upstream identity provider. This service trusts the value and only
/// applies role checks on top of it.
pub const USER_ID_HEADER: &str = "x-user-id";

pub async fn load_actor(
    db: &DatabaseConnection,
    headers: &HeaderMap,
) -> Result<user::Model, ApiError> {
    let raw = headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(ApiError::MissingIdentity)?;
    let id = Uuid::parse_str(raw).map_err(|_| ApiError::MissingIdentity)?;

    user::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ApiError::Registrar(RegistrarError::Persistence(e)))?
        .ok_or(ApiError::MissingIdentity)
}

/// Grading staff check: teachers may only act on their own sections,
/// admins on any
pub fn ensure_section_staff(
    actor: &user::Model,
    section: &section::Model,
) -> Result<(), ApiError> {
    if !actor.role.can_grade() {
        return Err(ApiError::Forbidden("managing this section's roster and grades"));
    }
    if actor.role != Role::Admin && section.teacher_id != Some(actor.id) {
        return Err(ApiError::Forbidden(
            "managing a section assigned to another teacher",
        ));
    }
    Ok(())
}
