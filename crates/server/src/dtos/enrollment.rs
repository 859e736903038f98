use chrono::NaiveDateTime;
use database::entities::{registration, user};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct RegistrationResponse {
    pub id: Uuid,
    pub student_id: Uuid,
    pub section_id: Uuid,
    pub status: String,
    pub overall_percentage: Option<f64>,
    pub final_letter_grade: Option<String>,
    pub registered_at: NaiveDateTime,
}

impl From<registration::Model> for RegistrationResponse {
    fn from(row: registration::Model) -> Self {
        Self {
            id: row.id,
            student_id: row.student_id,
            section_id: row.section_id,
            status: row.status.as_str().to_string(),
            overall_percentage: row.overall_percentage,
            final_letter_grade: row.final_letter_grade.map(|g| g.as_str().to_string()),
            registered_at: row.registered_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RosterEntryResponse {
    pub student_name: String,
    pub student_email: String,
    pub registration: RegistrationResponse,
}

impl From<(registration::Model, user::Model)> for RosterEntryResponse {
    fn from((row, student): (registration::Model, user::Model)) -> Self {
        Self {
            student_name: student.full_name,
            student_email: student.email,
            registration: row.into(),
        }
    }
}
