use chrono::{NaiveDate, NaiveDateTime};
use database::entities::{course, department, section, semester};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDepartmentRequest {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DepartmentResponse {
    pub id: Uuid,
    pub code: String,
    pub name: String,
}

impl From<department::Model> for DepartmentResponse {
    fn from(row: department::Model) -> Self {
        Self {
            id: row.id,
            code: row.code,
            name: row.name,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCourseRequest {
    pub code: String,
    pub title: String,
    pub credits: i32,
    pub department_id: Uuid,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseResponse {
    pub id: Uuid,
    pub code: String,
    pub title: String,
    pub credits: i32,
    pub department_id: Uuid,
    pub description: Option<String>,
}

impl From<course::Model> for CourseResponse {
    fn from(row: course::Model) -> Self {
        Self {
            id: row.id,
            code: row.code,
            title: row.title,
            credits: row.credits,
            department_id: row.department_id,
            description: row.description,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseDetailResponse {
    #[serde(flatten)]
    pub course: CourseResponse,
    pub sections: Vec<SectionResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedCoursesResponse {
    pub courses: Vec<CourseResponse>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct CourseQueryParams {
    #[serde(default = "default_page")]
    pub page: u64,

    #[serde(default = "default_per_page")]
    pub per_page: u64,

    pub search: Option<String>,
    pub department: Option<Vec<String>>,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    20
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddPrerequisiteRequest {
    pub required_course_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSemesterRequest {
    pub name: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub registration_start_date: NaiveDateTime,
    pub registration_end_date: NaiveDateTime,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SemesterResponse {
    pub id: Uuid,
    pub name: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub registration_start_date: NaiveDateTime,
    pub registration_end_date: NaiveDateTime,
}

impl From<semester::Model> for SemesterResponse {
    fn from(row: semester::Model) -> Self {
        Self {
            id: row.id,
            name: row.name,
            starts_on: row.starts_on,
            ends_on: row.ends_on,
            registration_start_date: row.registration_start_date,
            registration_end_date: row.registration_end_date,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSectionRequest {
    pub course_id: Uuid,
    pub semester_id: Uuid,
    pub code: String,
    pub teacher_id: Option<Uuid>,
    pub max_capacity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SectionResponse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub semester_id: Uuid,
    pub code: String,
    pub teacher_id: Option<Uuid>,
    pub max_capacity: i32,
    pub current_enrollment: i32,
}

impl From<section::Model> for SectionResponse {
    fn from(row: section::Model) -> Self {
        Self {
            id: row.id,
            course_id: row.course_id,
            semester_id: row.semester_id,
            code: row.code,
            teacher_id: row.teacher_id,
            max_capacity: row.max_capacity,
            current_enrollment: row.current_enrollment,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct SectionQueryParams {
    pub course_id: Option<Uuid>,
    pub semester_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAssessmentRequest {
    pub title: String,
    pub max_score: f64,
}
