use database::services::transcript::{Transcript, TranscriptLine};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct TranscriptLineResponse {
    pub course_code: String,
    pub course_title: String,
    pub credits: i32,
    pub semester: String,
    pub overall_percentage: Option<f64>,
    pub letter_grade: String,
}

impl From<TranscriptLine> for TranscriptLineResponse {
    fn from(line: TranscriptLine) -> Self {
        Self {
            course_code: line.course_code,
            course_title: line.course_title,
            credits: line.credits,
            semester: line.semester_name,
            overall_percentage: line.overall_percentage,
            letter_grade: line.letter_grade.as_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TranscriptResponse {
    pub student_id: Uuid,
    pub lines: Vec<TranscriptLineResponse>,
    pub cgpa: Option<f64>,
}

impl TranscriptResponse {
    pub fn new(student_id: Uuid, transcript: Transcript) -> Self {
        Self {
            student_id,
            lines: transcript.lines.into_iter().map(Into::into).collect(),
            cgpa: transcript.cgpa,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct SgpaQueryParams {
    pub semester_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SgpaResponse {
    pub student_id: Uuid,
    pub semester_id: Uuid,
    pub sgpa: Option<f64>,
}
