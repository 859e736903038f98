use chrono::NaiveDateTime;
use database::entities::assessment;
use database::services::gradebook::{GradeSheet, GradeSheetRow, ScoreEntry};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ScoreEntryRequest {
    pub registration_id: Uuid,
    pub assessment_id: Uuid,
    /// A null score clears any previously stored value for the pair
    pub score: Option<f64>,
}

impl From<ScoreEntryRequest> for ScoreEntry {
    fn from(entry: ScoreEntryRequest) -> Self {
        Self {
            registration_id: entry.registration_id,
            assessment_id: entry.assessment_id,
            score: entry.score,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveScoresRequest {
    #[serde(default)]
    pub scores: Vec<ScoreEntryRequest>,
    /// Registration ids to finalize: their percentage and letter grade
    /// are recomputed from the stored scores and the row is completed
    #[serde(default)]
    pub finalize: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AssessmentResponse {
    pub id: Uuid,
    pub title: String,
    pub max_score: f64,
}

impl From<assessment::Model> for AssessmentResponse {
    fn from(row: assessment::Model) -> Self {
        Self {
            id: row.id,
            title: row.title,
            max_score: row.max_score,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScoreResponse {
    pub assessment_id: Uuid,
    pub score: Option<f64>,
    pub graded_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GradeSheetRowResponse {
    pub registration_id: Uuid,
    pub student_id: Uuid,
    pub student_name: String,
    pub status: String,
    pub overall_percentage: Option<f64>,
    pub final_letter_grade: Option<String>,
    pub scores: Vec<ScoreResponse>,
}

impl From<GradeSheetRow> for GradeSheetRowResponse {
    fn from(row: GradeSheetRow) -> Self {
        Self {
            registration_id: row.registration.id,
            student_id: row.student.id,
            student_name: row.student.full_name,
            status: row.registration.status.as_str().to_string(),
            overall_percentage: row.registration.overall_percentage,
            final_letter_grade: row
                .registration
                .final_letter_grade
                .map(|g| g.as_str().to_string()),
            scores: row
                .scores
                .into_iter()
                .map(|score| ScoreResponse {
                    assessment_id: score.assessment_id,
                    score: score.score_achieved,
                    graded_at: score.graded_at,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GradeSheetResponse {
    pub assessments: Vec<AssessmentResponse>,
    pub rows: Vec<GradeSheetRowResponse>,
}

impl From<GradeSheet> for GradeSheetResponse {
    fn from(sheet: GradeSheet) -> Self {
        Self {
            assessments: sheet.assessments.into_iter().map(Into::into).collect(),
            rows: sheet.rows.into_iter().map(Into::into).collect(),
        }
    }
}
