use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use database::error::RegistrarError;
use log::error;
use serde_json::json;

/// Handler-level error: identity / role failures plus everything the
/// registrar core reports. Converted into a JSON body with a stable
/// `error` code so the presentation layer can render a specific message.
#[derive(Debug)]
pub enum ApiError {
    MissingIdentity,
    Forbidden(&'static str),
    Registrar(RegistrarError),
}

impl From<RegistrarError> for ApiError {
    fn from(err: RegistrarError) -> Self {
        Self::Registrar(err)
    }
}

fn registrar_status(err: &RegistrarError) -> (StatusCode, &'static str) {
    match err {
        RegistrarError::AlreadyRegistered => (StatusCode::CONFLICT, "already_registered"),
        RegistrarError::AlreadyCompleted => (StatusCode::CONFLICT, "already_completed"),
        RegistrarError::SectionFull => (StatusCode::CONFLICT, "section_full"),
        RegistrarError::NotRegistered => (StatusCode::CONFLICT, "not_registered"),
        RegistrarError::DependencyConflict(_) => (StatusCode::CONFLICT, "dependency_conflict"),
        RegistrarError::PrerequisiteNotMet { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "prerequisite_not_met")
        }
        RegistrarError::RegistrationClosed => {
            (StatusCode::UNPROCESSABLE_ENTITY, "registration_closed")
        }
        RegistrarError::ScoreOutOfRange { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "score_out_of_range")
        }
        RegistrarError::SectionNotFound(_)
        | RegistrarError::SemesterNotFound(_)
        | RegistrarError::CourseNotFound(_)
        | RegistrarError::DepartmentNotFound(_)
        | RegistrarError::UserNotFound(_)
        | RegistrarError::RegistrationNotFound(_)
        | RegistrarError::AssessmentNotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        RegistrarError::Persistence(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "persistence_failure")
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, body) = match self {
            Self::MissingIdentity => (
                StatusCode::UNAUTHORIZED,
                "missing_identity",
                json!({ "message": "a valid X-User-Id header is required" }),
            ),
            Self::Forbidden(action) => (
                StatusCode::FORBIDDEN,
                "forbidden",
                json!({ "message": format!("the caller's role does not permit {action}") }),
            ),
            Self::Registrar(err) => {
                let (status, code) = registrar_status(&err);

                let body = match &err {
                    RegistrarError::PrerequisiteNotMet { missing } => json!({
                        "message": err.to_string(),
                        "missing_courses": missing,
                    }),
                    // Store failures roll back the whole transaction;
                    // report a generic body and keep the detail in the log
                    RegistrarError::Persistence(inner) => {
                        error!("persistence failure: {inner}");
                        json!({ "message": "persistence failure" })
                    }
                    _ => json!({ "message": err.to_string() }),
                };

                (status, code, body)
            }
        };

        let mut payload = body;
        payload["error"] = json!(code);

        (status, Json(payload)).into_response()
    }
}
