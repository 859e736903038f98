use crate::routes::{announcement, catalog, enrollment, gradebook, health, transcript};
use utoipa::OpenApi;

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        catalog::get_courses,
        catalog::get_course_by_id,
        catalog::create_course,
        catalog::add_prerequisite,
        catalog::create_department,
        catalog::list_semesters,
        catalog::create_semester,
        catalog::list_sections,
        catalog::create_section,
        catalog::delete_section,
        catalog::create_assessment,
        enrollment::register,
        enrollment::drop_registration,
        enrollment::roster,
        gradebook::put_grades,
        gradebook::get_grades,
        transcript::get_transcript,
        transcript::get_sgpa,
        announcement::post_announcement,
        announcement::list_announcements
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Catalog", description = "Departments, courses, semesters, sections, prerequisites, assessments"),
        (name = "Enrollment", description = "Registration ledger operations"),
        (name = "Gradebook", description = "Score entry and grade finalization"),
        (name = "Transcript", description = "GPA and transcript reads"),
        (name = "Announcements", description = "Section and campus-wide announcements"),
    ),
    info(
        title = "Registrar API",
        version = "1.0.0",
        description = "University registrar backend: enrollment ledger, gradebook, and catalog",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;
