use crate::entities::{course, prerequisite, registration, section, semester, user};
use crate::error::{RegistrarError, Result};
use chrono::Utc;
use models::status::RegistrationStatus;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use std::collections::HashSet;
use uuid::Uuid;

pub struct EnrollmentService;

impl EnrollmentService {
    /// Register a student into a section.
    ///
    /// Preconditions are checked in a fixed order, first failure wins:
    /// duplicate registration, prerequisites, capacity, registration
    /// window. The counter increment and the registration row are written
    /// inside one transaction; the capacity check is re-validated by the
    /// guarded increment at write time, so concurrent registrations for
    /// one section serialize on the section row.
    pub async fn register<C>(
        db: &C,
        student_id: Uuid,
        section_id: Uuid,
    ) -> Result<registration::Model>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        db.transaction::<_, registration::Model, RegistrarError>(|txn| {
            Box::pin(async move {
                let section = section::Entity::find_by_id(section_id)
                    .one(txn)
                    .await?
                    .ok_or(RegistrarError::SectionNotFound(section_id))?;

                let existing = registration::Entity::find()
                    .filter(registration::Column::StudentId.eq(student_id))
                    .filter(registration::Column::SectionId.eq(section_id))
                    .one(txn)
                    .await?;

                if let Some(existing) = &existing {
                    match existing.status {
                        RegistrationStatus::Registered => {
                            return Err(RegistrarError::AlreadyRegistered);
                        }
                        RegistrationStatus::Completed => {
                            return Err(RegistrarError::AlreadyCompleted);
                        }
                        RegistrationStatus::Dropped => {}
                    }
                }

                let missing =
                    Self::missing_prerequisites(txn, student_id, section.course_id).await?;
                if !missing.is_empty() {
                    return Err(RegistrarError::PrerequisiteNotMet { missing });
                }

                if section.current_enrollment >= section.max_capacity {
                    return Err(RegistrarError::SectionFull);
                }

                let semester = semester::Entity::find_by_id(section.semester_id)
                    .one(txn)
                    .await?
                    .ok_or(RegistrarError::SemesterNotFound(section.semester_id))?;

                let now = Utc::now().naive_utc();
                if now < semester.registration_start_date || now > semester.registration_end_date {
                    return Err(RegistrarError::RegistrationClosed);
                }

                // Guarded increment: capacity is re-checked at the moment of
                // the write, so a racing registration that claims the last
                // seat first makes this update match zero rows.
                let claimed = section::Entity::update_many()
                    .col_expr(
                        section::Column::CurrentEnrollment,
                        Expr::col(section::Column::CurrentEnrollment).add(1),
                    )
                    .filter(section::Column::Id.eq(section_id))
                    .filter(
                        Expr::col(section::Column::CurrentEnrollment)
                            .lt(Expr::col(section::Column::MaxCapacity)),
                    )
                    .exec(txn)
                    .await?;

                if claimed.rows_affected == 0 {
                    return Err(RegistrarError::SectionFull);
                }

                let row = match existing {
                    // A dropped pair is reactivated in place, keeping its id
                    Some(dropped) => {
                        let mut active: registration::ActiveModel = dropped.into();
                        active.status = Set(RegistrationStatus::Registered);
                        active.updated_at = Set(now);
                        active.update(txn).await?
                    }
                    None => {
                        registration::ActiveModel {
                            id: Set(Uuid::new_v4()),
                            student_id: Set(student_id),
                            section_id: Set(section_id),
                            status: Set(RegistrationStatus::Registered),
                            overall_percentage: Set(None),
                            final_letter_grade: Set(None),
                            registered_at: Set(now),
                            updated_at: Set(now),
                        }
                        .insert(txn)
                        .await?
                    }
                };

                Ok(row)
            })
        })
        .await
        .map_err(RegistrarError::from)
    }

    /// Drop a student's active registration.
    ///
    /// Requires a row with status exactly `Registered`. The decrement is
    /// guarded so a stale row can never drive the counter negative.
    pub async fn drop_registration<C>(
        db: &C,
        student_id: Uuid,
        section_id: Uuid,
    ) -> Result<registration::Model>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        db.transaction::<_, registration::Model, RegistrarError>(|txn| {
            Box::pin(async move {
                let existing = registration::Entity::find()
                    .filter(registration::Column::StudentId.eq(student_id))
                    .filter(registration::Column::SectionId.eq(section_id))
                    .one(txn)
                    .await?
                    .filter(|row| row.status == RegistrationStatus::Registered)
                    .ok_or(RegistrarError::NotRegistered)?;

                section::Entity::update_many()
                    .col_expr(
                        section::Column::CurrentEnrollment,
                        Expr::col(section::Column::CurrentEnrollment).sub(1),
                    )
                    .filter(section::Column::Id.eq(section_id))
                    .filter(section::Column::CurrentEnrollment.gt(0))
                    .exec(txn)
                    .await?;

                let now = Utc::now().naive_utc();
                let mut active: registration::ActiveModel = existing.into();
                active.status = Set(RegistrationStatus::Dropped);
                active.updated_at = Set(now);

                Ok(active.update(txn).await?)
            })
        })
        .await
        .map_err(RegistrarError::from)
    }

    /// The section's roster: `Registered` and `Completed` registrations
    /// joined with their students, in registration order
    pub async fn roster<C>(
        db: &C,
        section_id: Uuid,
    ) -> Result<Vec<(registration::Model, user::Model)>>
    where
        C: ConnectionTrait,
    {
        let rows = registration::Entity::find()
            .filter(registration::Column::SectionId.eq(section_id))
            .filter(registration::Column::Status.is_in([
                RegistrationStatus::Registered,
                RegistrationStatus::Completed,
            ]))
            .order_by_asc(registration::Column::RegisteredAt)
            .find_also_related(user::Entity)
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(row, student)| student.map(|s| (row, s)))
            .collect())
    }

    /// Course ids the student has completed, derived by joining their
    /// `Completed` registrations through sections
    pub async fn completed_course_ids<C>(db: &C, student_id: Uuid) -> Result<HashSet<Uuid>>
    where
        C: ConnectionTrait,
    {
        let rows = registration::Entity::find()
            .filter(registration::Column::StudentId.eq(student_id))
            .filter(registration::Column::Status.eq(RegistrationStatus::Completed))
            .find_also_related(section::Entity)
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(_, sec)| sec.map(|s| s.course_id))
            .collect())
    }

    /// Codes of the prerequisite courses the student has not completed,
    /// sorted for stable reporting
    async fn missing_prerequisites<C>(
        db: &C,
        student_id: Uuid,
        course_id: Uuid,
    ) -> Result<Vec<String>>
    where
        C: ConnectionTrait,
    {
        let required: Vec<Uuid> = prerequisite::Entity::find()
            .filter(prerequisite::Column::CourseId.eq(course_id))
            .all(db)
            .await?
            .into_iter()
            .map(|edge| edge.required_course_id)
            .collect();

        if required.is_empty() {
            return Ok(Vec::new());
        }

        let completed = Self::completed_course_ids(db, student_id).await?;
        let unmet: Vec<Uuid> = required
            .into_iter()
            .filter(|id| !completed.contains(id))
            .collect();

        if unmet.is_empty() {
            return Ok(Vec::new());
        }

        let mut codes: Vec<String> = course::Entity::find()
            .filter(course::Column::Id.is_in(unmet))
            .all(db)
            .await?
            .into_iter()
            .map(|c| c.code)
            .collect();
        codes.sort();

        Ok(codes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use sea_orm::PaginatorTrait;

    async fn registered_count(db: &sea_orm::DatabaseConnection, section_id: Uuid) -> u64 {
        registration::Entity::find()
            .filter(registration::Column::SectionId.eq(section_id))
            .filter(registration::Column::Status.eq(RegistrationStatus::Registered))
            .count(db)
            .await
            .unwrap()
    }

    async fn enrollment_counter(db: &sea_orm::DatabaseConnection, section_id: Uuid) -> i32 {
        section::Entity::find_by_id(section_id)
            .one(db)
            .await
            .unwrap()
            .unwrap()
            .current_enrollment
    }

    #[tokio::test]
    async fn test_register_inserts_row_and_increments_counter() {
        let db = test_support::connect().await;
        let student = test_support::seed_student(&db, "Ada Lovelace").await;
        let dept = test_support::seed_department(&db, "CS").await;
        let course = test_support::seed_course(&db, &dept, "CS1000", 4).await;
        let semester = test_support::open_semester(&db).await;
        let section = test_support::seed_section(&db, &course, &semester, 30).await;

        let row = EnrollmentService::register(&db, student.id, section.id)
            .await
            .unwrap();

        assert_eq!(row.status, RegistrationStatus::Registered);
        assert_eq!(enrollment_counter(&db, section.id).await, 1);
        assert_eq!(registered_count(&db, section.id).await, 1);
    }

    #[tokio::test]
    async fn test_register_twice_is_rejected_without_write() {
        let db = test_support::connect().await;
        let student = test_support::seed_student(&db, "Ada Lovelace").await;
        let dept = test_support::seed_department(&db, "CS").await;
        let course = test_support::seed_course(&db, &dept, "CS1000", 4).await;
        let semester = test_support::open_semester(&db).await;
        let section = test_support::seed_section(&db, &course, &semester, 30).await;

        EnrollmentService::register(&db, student.id, section.id)
            .await
            .unwrap();
        let err = EnrollmentService::register(&db, student.id, section.id)
            .await
            .unwrap_err();

        assert!(matches!(err, RegistrarError::AlreadyRegistered));
        assert_eq!(enrollment_counter(&db, section.id).await, 1);
    }

    #[tokio::test]
    async fn test_full_section_rejects_registration() {
        let db = test_support::connect().await;
        let dept = test_support::seed_department(&db, "CS").await;
        let course = test_support::seed_course(&db, &dept, "CS1000", 4).await;
        let semester = test_support::open_semester(&db).await;
        let section = test_support::seed_section(&db, &course, &semester, 2).await;

        for name in ["First Student", "Second Student"] {
            let student = test_support::seed_student(&db, name).await;
            EnrollmentService::register(&db, student.id, section.id)
                .await
                .unwrap();
        }

        let late = test_support::seed_student(&db, "Third Student").await;
        let err = EnrollmentService::register(&db, late.id, section.id)
            .await
            .unwrap_err();

        assert!(matches!(err, RegistrarError::SectionFull));
        assert_eq!(enrollment_counter(&db, section.id).await, 2);
        assert_eq!(registered_count(&db, section.id).await, 2);
    }

    #[tokio::test]
    async fn test_capacity_failure_reported_before_closed_window() {
        // Check order is fixed: a full section reports SectionFull even
        // when the registration window has also closed.
        let db = test_support::connect().await;
        let student = test_support::seed_student(&db, "Ada Lovelace").await;
        let dept = test_support::seed_department(&db, "CS").await;
        let course = test_support::seed_course(&db, &dept, "CS1000", 4).await;
        let semester = test_support::closed_semester(&db).await;
        let section = test_support::seed_section(&db, &course, &semester, 0).await;

        let err = EnrollmentService::register(&db, student.id, section.id)
            .await
            .unwrap_err();

        assert!(matches!(err, RegistrarError::SectionFull));
    }

    #[tokio::test]
    async fn test_closed_window_rejects_registration() {
        let db = test_support::connect().await;
        let student = test_support::seed_student(&db, "Ada Lovelace").await;
        let dept = test_support::seed_department(&db, "CS").await;
        let course = test_support::seed_course(&db, &dept, "CS1000", 4).await;
        let semester = test_support::closed_semester(&db).await;
        let section = test_support::seed_section(&db, &course, &semester, 30).await;

        let err = EnrollmentService::register(&db, student.id, section.id)
            .await
            .unwrap_err();

        assert!(matches!(err, RegistrarError::RegistrationClosed));
        assert_eq!(enrollment_counter(&db, section.id).await, 0);
    }

    #[tokio::test]
    async fn test_missing_prerequisite_lists_course_codes() {
        let db = test_support::connect().await;
        let student = test_support::seed_student(&db, "Ada Lovelace").await;
        let dept = test_support::seed_department(&db, "CS").await;
        let intro = test_support::seed_course(&db, &dept, "CS1000", 4).await;
        let advanced = test_support::seed_course(&db, &dept, "CS2000", 4).await;
        test_support::seed_prerequisite(&db, &advanced, &intro).await;

        let semester = test_support::open_semester(&db).await;
        let section = test_support::seed_section(&db, &advanced, &semester, 30).await;

        let err = EnrollmentService::register(&db, student.id, section.id)
            .await
            .unwrap_err();

        match err {
            RegistrarError::PrerequisiteNotMet { missing } => {
                assert_eq!(missing, vec!["CS1000".to_string()]);
            }
            other => panic!("expected PrerequisiteNotMet, got {other:?}"),
        }
        assert_eq!(enrollment_counter(&db, section.id).await, 0);
    }

    #[tokio::test]
    async fn test_completed_prerequisite_allows_registration() {
        let db = test_support::connect().await;
        let student = test_support::seed_student(&db, "Ada Lovelace").await;
        let dept = test_support::seed_department(&db, "CS").await;
        let intro = test_support::seed_course(&db, &dept, "CS1000", 4).await;
        let advanced = test_support::seed_course(&db, &dept, "CS2000", 4).await;
        test_support::seed_prerequisite(&db, &advanced, &intro).await;

        let semester = test_support::open_semester(&db).await;
        test_support::seed_completed_registration(&db, &student, &intro, &semester).await;
        let section = test_support::seed_section(&db, &advanced, &semester, 30).await;

        let row = EnrollmentService::register(&db, student.id, section.id)
            .await
            .unwrap();
        assert_eq!(row.status, RegistrationStatus::Registered);
    }

    #[tokio::test]
    async fn test_drop_without_registration_is_rejected() {
        let db = test_support::connect().await;
        let student = test_support::seed_student(&db, "Ada Lovelace").await;
        let dept = test_support::seed_department(&db, "CS").await;
        let course = test_support::seed_course(&db, &dept, "CS1000", 4).await;
        let semester = test_support::open_semester(&db).await;
        let section = test_support::seed_section(&db, &course, &semester, 30).await;

        let err = EnrollmentService::drop_registration(&db, student.id, section.id)
            .await
            .unwrap_err();

        assert!(matches!(err, RegistrarError::NotRegistered));
    }

    #[tokio::test]
    async fn test_drop_then_reregister_reactivates_same_row() {
        let db = test_support::connect().await;
        let student = test_support::seed_student(&db, "Ada Lovelace").await;
        let dept = test_support::seed_department(&db, "CS").await;
        let course = test_support::seed_course(&db, &dept, "CS1000", 4).await;
        let semester = test_support::open_semester(&db).await;
        let section = test_support::seed_section(&db, &course, &semester, 30).await;

        let first = EnrollmentService::register(&db, student.id, section.id)
            .await
            .unwrap();
        let dropped = EnrollmentService::drop_registration(&db, student.id, section.id)
            .await
            .unwrap();
        assert_eq!(dropped.status, RegistrationStatus::Dropped);
        assert_eq!(enrollment_counter(&db, section.id).await, 0);

        let second = EnrollmentService::register(&db, student.id, section.id)
            .await
            .unwrap();

        // Same row id, exactly one row for the pair, counter net one
        assert_eq!(second.id, first.id);
        let pair_rows = registration::Entity::find()
            .filter(registration::Column::StudentId.eq(student.id))
            .filter(registration::Column::SectionId.eq(section.id))
            .count(&db)
            .await
            .unwrap();
        assert_eq!(pair_rows, 1);
        assert_eq!(enrollment_counter(&db, section.id).await, 1);
    }

    #[tokio::test]
    async fn test_drop_clamps_counter_at_zero() {
        let db = test_support::connect().await;
        let student = test_support::seed_student(&db, "Ada Lovelace").await;
        let dept = test_support::seed_department(&db, "CS").await;
        let course = test_support::seed_course(&db, &dept, "CS1000", 4).await;
        let semester = test_support::open_semester(&db).await;
        let section = test_support::seed_section(&db, &course, &semester, 30).await;

        EnrollmentService::register(&db, student.id, section.id)
            .await
            .unwrap();

        // Force a stale counter, then drop against the still-Registered row
        let mut stale: section::ActiveModel = section::Entity::find_by_id(section.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap()
            .into();
        stale.current_enrollment = Set(0);
        stale.update(&db).await.unwrap();

        let dropped = EnrollmentService::drop_registration(&db, student.id, section.id)
            .await
            .unwrap();

        assert_eq!(dropped.status, RegistrationStatus::Dropped);
        assert_eq!(enrollment_counter(&db, section.id).await, 0);
    }

    #[tokio::test]
    async fn test_roster_lists_active_registrations_only() {
        let db = test_support::connect().await;
        let dept = test_support::seed_department(&db, "CS").await;
        let course = test_support::seed_course(&db, &dept, "CS1000", 4).await;
        let semester = test_support::open_semester(&db).await;
        let section = test_support::seed_section(&db, &course, &semester, 30).await;

        let staying = test_support::seed_student(&db, "Staying Student").await;
        let leaving = test_support::seed_student(&db, "Leaving Student").await;
        EnrollmentService::register(&db, staying.id, section.id)
            .await
            .unwrap();
        EnrollmentService::register(&db, leaving.id, section.id)
            .await
            .unwrap();
        EnrollmentService::drop_registration(&db, leaving.id, section.id)
            .await
            .unwrap();

        let roster = EnrollmentService::roster(&db, section.id).await.unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].1.id, staying.id);
    }
}
