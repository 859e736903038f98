//! Shared fixtures for service tests: a migrated sqlite-in-memory store
//! plus seed helpers for the reference data owned by the catalog.

use crate::entities::{course, department, prerequisite, registration, section, semester, user};
use chrono::{Days, Utc};
use migration::{Migrator, MigratorTrait};
use models::grade::LetterGrade;
use models::role::Role;
use models::status::RegistrationStatus;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection};
use uuid::Uuid;

/// A fresh in-memory database with the real migrations applied. The pool
/// is capped at one connection so every query sees the same memory store.
pub async fn connect() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);

    let db = Database::connect(options)
        .await
        .expect("failed to open sqlite in-memory database");
    Migrator::up(&db, None).await.expect("migrations failed");
    db
}

pub async fn seed_user(db: &DatabaseConnection, name: &str, role: Role) -> user::Model {
    let now = Utc::now().naive_utc();
    let id = Uuid::new_v4();
    user::ActiveModel {
        id: Set(id),
        full_name: Set(name.to_string()),
        email: Set(format!("{id}@example.edu")),
        role: Set(role),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("seed user")
}

pub async fn seed_student(db: &DatabaseConnection, name: &str) -> user::Model {
    seed_user(db, name, Role::Student).await
}

pub async fn seed_department(db: &DatabaseConnection, code: &str) -> department::Model {
    department::ActiveModel {
        id: Set(Uuid::new_v4()),
        code: Set(code.to_string()),
        name: Set(format!("Department of {code}")),
    }
    .insert(db)
    .await
    .expect("seed department")
}

pub async fn seed_course(
    db: &DatabaseConnection,
    dept: &department::Model,
    code: &str,
    credits: i32,
) -> course::Model {
    let now = Utc::now().naive_utc();
    course::ActiveModel {
        id: Set(Uuid::new_v4()),
        code: Set(code.to_string()),
        title: Set(format!("Course {code}")),
        credits: Set(credits),
        department_id: Set(dept.id),
        description: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("seed course")
}

/// A semester whose registration window is currently open
pub async fn open_semester(db: &DatabaseConnection) -> semester::Model {
    let now = Utc::now();
    semester::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Fall 2026".to_string()),
        starts_on: Set(now.date_naive()),
        ends_on: Set(now.checked_add_days(Days::new(120)).unwrap().date_naive()),
        registration_start_date: Set(now.checked_sub_days(Days::new(7)).unwrap().naive_utc()),
        registration_end_date: Set(now.checked_add_days(Days::new(7)).unwrap().naive_utc()),
    }
    .insert(db)
    .await
    .expect("seed semester")
}

/// A semester whose registration window closed in the past
pub async fn closed_semester(db: &DatabaseConnection) -> semester::Model {
    let now = Utc::now();
    semester::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Spring 2026".to_string()),
        starts_on: Set(now.checked_sub_days(Days::new(120)).unwrap().date_naive()),
        ends_on: Set(now.date_naive()),
        registration_start_date: Set(now.checked_sub_days(Days::new(120)).unwrap().naive_utc()),
        registration_end_date: Set(now.checked_sub_days(Days::new(90)).unwrap().naive_utc()),
    }
    .insert(db)
    .await
    .expect("seed semester")
}

pub async fn seed_section(
    db: &DatabaseConnection,
    course: &course::Model,
    semester: &semester::Model,
    max_capacity: i32,
) -> section::Model {
    let now = Utc::now().naive_utc();
    section::ActiveModel {
        id: Set(Uuid::new_v4()),
        course_id: Set(course.id),
        semester_id: Set(semester.id),
        code: Set("A".to_string()),
        teacher_id: Set(None),
        max_capacity: Set(max_capacity),
        current_enrollment: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("seed section")
}

pub async fn seed_prerequisite(
    db: &DatabaseConnection,
    course: &course::Model,
    required: &course::Model,
) -> prerequisite::Model {
    prerequisite::ActiveModel {
        id: Set(Uuid::new_v4()),
        course_id: Set(course.id),
        required_course_id: Set(required.id),
    }
    .insert(db)
    .await
    .expect("seed prerequisite")
}

pub async fn seed_assessment(
    db: &DatabaseConnection,
    section: &section::Model,
    title: &str,
    max_score: f64,
) -> crate::entities::assessment::Model {
    crate::entities::assessment::ActiveModel {
        id: Set(Uuid::new_v4()),
        section_id: Set(section.id),
        title: Set(title.to_string()),
        max_score: Set(max_score),
        created_at: Set(Utc::now().naive_utc()),
    }
    .insert(db)
    .await
    .expect("seed assessment")
}

/// A finished registration for `course` in its own past section, as left
/// behind by a prior semester's grading
pub async fn seed_completed_registration(
    db: &DatabaseConnection,
    student: &user::Model,
    course: &course::Model,
    semester: &semester::Model,
) -> registration::Model {
    let past_section = seed_section(db, course, semester, 30).await;
    let now = Utc::now().naive_utc();
    registration::ActiveModel {
        id: Set(Uuid::new_v4()),
        student_id: Set(student.id),
        section_id: Set(past_section.id),
        status: Set(RegistrationStatus::Completed),
        overall_percentage: Set(Some(91.0)),
        final_letter_grade: Set(Some(LetterGrade::A)),
        registered_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("seed completed registration")
}
