use crate::dtos::catalog::{
    AddPrerequisiteRequest, CourseDetailResponse, CourseQueryParams, CourseResponse,
    CreateAssessmentRequest, CreateCourseRequest, CreateDepartmentRequest, CreateSectionRequest,
    CreateSemesterRequest, DepartmentResponse, PaginatedCoursesResponse, PaginationMeta,
    SectionQueryParams, SectionResponse, SemesterResponse,
};
use crate::dtos::gradebook::AssessmentResponse;
use crate::error::ApiError;
use crate::identity;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use database::entities::user;
use database::services::catalog::{CatalogService, NewCourse, NewSection, NewSemester};
use sea_orm::prelude::Uuid;

async fn load_catalog_admin(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<user::Model, ApiError> {
    let actor = identity::load_actor(&state.db, headers).await?;
    if !actor.role.can_manage_catalog() {
        return Err(ApiError::Forbidden("managing the course catalog"));
    }
    Ok(actor)
}

/// Get paginated list of courses
#[utoipa::path(
    get,
    path = "/courses",
    params(CourseQueryParams),
    responses(
        (status = 200, description = "List of courses retrieved successfully", body = PaginatedCoursesResponse)
    ),
    tag = "Catalog"
)]
pub async fn get_courses(
    State(state): State<AppState>,
    Query(params): Query<CourseQueryParams>,
) -> Result<Json<PaginatedCoursesResponse>, ApiError> {
    let (courses, total_items) = CatalogService::get_courses_paginated(
        &state.db,
        params.page,
        params.per_page,
        params.search,
        params.department,
    )
    .await?;

    let total_pages = total_items.div_ceil(params.per_page.max(1));
    let pagination = PaginationMeta {
        page: params.page,
        per_page: params.per_page,
        total_pages,
        total_items,
        has_next: params.page < total_pages,
        has_prev: params.page > 1,
    };

    Ok(Json(PaginatedCoursesResponse {
        courses: courses.into_iter().map(Into::into).collect(),
        pagination,
    }))
}

/// Get a specific course with its sections
#[utoipa::path(
    get,
    path = "/courses/{id}",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course found", body = CourseDetailResponse),
        (status = 404, description = "Course not found")
    ),
    tag = "Catalog"
)]
pub async fn get_course_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CourseDetailResponse>, ApiError> {
    let Some((course, sections)) = CatalogService::get_course_by_id(&state.db, id).await? else {
        return Err(ApiError::Registrar(
            database::error::RegistrarError::CourseNotFound(id),
        ));
    };

    Ok(Json(CourseDetailResponse {
        course: course.into(),
        sections: sections.into_iter().map(Into::into).collect(),
    }))
}

/// Create a course
#[utoipa::path(
    post,
    path = "/courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = CourseResponse),
        (status = 403, description = "Caller may not manage the catalog"),
        (status = 404, description = "Department not found")
    ),
    tag = "Catalog"
)]
pub async fn create_course(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CourseResponse>), ApiError> {
    load_catalog_admin(&state, &headers).await?;

    let course = CatalogService::create_course(
        &state.db,
        NewCourse {
            code: request.code,
            title: request.title,
            credits: request.credits,
            department_id: request.department_id,
            description: request.description,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(course.into())))
}

/// Add a prerequisite edge to a course
#[utoipa::path(
    post,
    path = "/courses/{id}/prerequisites",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    request_body = AddPrerequisiteRequest,
    responses(
        (status = 204, description = "Prerequisite added"),
        (status = 403, description = "Caller may not manage the catalog"),
        (status = 404, description = "Course not found"),
        (status = 409, description = "Self-referential or duplicate edge")
    ),
    tag = "Catalog"
)]
pub async fn add_prerequisite(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(request): Json<AddPrerequisiteRequest>,
) -> Result<StatusCode, ApiError> {
    load_catalog_admin(&state, &headers).await?;
    CatalogService::add_prerequisite(&state.db, id, request.required_course_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Create a department
#[utoipa::path(
    post,
    path = "/departments",
    request_body = CreateDepartmentRequest,
    responses(
        (status = 201, description = "Department created", body = DepartmentResponse),
        (status = 403, description = "Caller may not manage the catalog")
    ),
    tag = "Catalog"
)]
pub async fn create_department(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateDepartmentRequest>,
) -> Result<(StatusCode, Json<DepartmentResponse>), ApiError> {
    load_catalog_admin(&state, &headers).await?;
    let department =
        CatalogService::create_department(&state.db, &request.code, &request.name).await?;
    Ok((StatusCode::CREATED, Json(department.into())))
}

/// List semesters in chronological order
#[utoipa::path(
    get,
    path = "/semesters",
    responses(
        (status = 200, description = "Semesters retrieved", body = [SemesterResponse])
    ),
    tag = "Catalog"
)]
pub async fn list_semesters(
    State(state): State<AppState>,
) -> Result<Json<Vec<SemesterResponse>>, ApiError> {
    let semesters = CatalogService::list_semesters(&state.db).await?;
    Ok(Json(semesters.into_iter().map(Into::into).collect()))
}

/// Create a semester with its registration window
#[utoipa::path(
    post,
    path = "/semesters",
    request_body = CreateSemesterRequest,
    responses(
        (status = 201, description = "Semester created", body = SemesterResponse),
        (status = 403, description = "Caller may not manage the catalog")
    ),
    tag = "Catalog"
)]
pub async fn create_semester(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateSemesterRequest>,
) -> Result<(StatusCode, Json<SemesterResponse>), ApiError> {
    load_catalog_admin(&state, &headers).await?;

    let semester = CatalogService::create_semester(
        &state.db,
        NewSemester {
            name: request.name,
            starts_on: request.starts_on,
            ends_on: request.ends_on,
            registration_start_date: request.registration_start_date,
            registration_end_date: request.registration_end_date,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(semester.into())))
}

/// List sections, optionally filtered by course and semester
#[utoipa::path(
    get,
    path = "/sections",
    params(SectionQueryParams),
    responses(
        (status = 200, description = "Sections retrieved", body = [SectionResponse])
    ),
    tag = "Catalog"
)]
pub async fn list_sections(
    State(state): State<AppState>,
    Query(params): Query<SectionQueryParams>,
) -> Result<Json<Vec<SectionResponse>>, ApiError> {
    let sections =
        CatalogService::list_sections(&state.db, params.course_id, params.semester_id).await?;
    Ok(Json(sections.into_iter().map(Into::into).collect()))
}

/// Create a scheduled section of a course
#[utoipa::path(
    post,
    path = "/sections",
    request_body = CreateSectionRequest,
    responses(
        (status = 201, description = "Section created", body = SectionResponse),
        (status = 403, description = "Caller may not manage the catalog"),
        (status = 404, description = "Course, semester, or teacher not found")
    ),
    tag = "Catalog"
)]
pub async fn create_section(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateSectionRequest>,
) -> Result<(StatusCode, Json<SectionResponse>), ApiError> {
    load_catalog_admin(&state, &headers).await?;

    let section = CatalogService::create_section(
        &state.db,
        NewSection {
            course_id: request.course_id,
            semester_id: request.semester_id,
            code: request.code,
            teacher_id: request.teacher_id,
            max_capacity: request.max_capacity,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(section.into())))
}

/// Delete a section. Refused while any registrations reference it.
#[utoipa::path(
    delete,
    path = "/sections/{id}",
    params(
        ("id" = Uuid, Path, description = "Section ID")
    ),
    responses(
        (status = 204, description = "Section deleted"),
        (status = 403, description = "Caller may not manage the catalog"),
        (status = 404, description = "Section not found"),
        (status = 409, description = "Section still has registrations")
    ),
    tag = "Catalog"
)]
pub async fn delete_section(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    load_catalog_admin(&state, &headers).await?;
    CatalogService::delete_section(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Define an assessment for a section
#[utoipa::path(
    post,
    path = "/sections/{id}/assessments",
    params(
        ("id" = Uuid, Path, description = "Section ID")
    ),
    request_body = CreateAssessmentRequest,
    responses(
        (status = 201, description = "Assessment created", body = AssessmentResponse),
        (status = 403, description = "Caller may not manage the catalog"),
        (status = 404, description = "Section not found")
    ),
    tag = "Catalog"
)]
pub async fn create_assessment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(request): Json<CreateAssessmentRequest>,
) -> Result<(StatusCode, Json<AssessmentResponse>), ApiError> {
    load_catalog_admin(&state, &headers).await?;
    let assessment =
        CatalogService::create_assessment(&state.db, id, &request.title, request.max_score)
            .await?;
    Ok((StatusCode::CREATED, Json(assessment.into())))
}
