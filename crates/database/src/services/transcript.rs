use crate::entities::{course, registration, section, semester, user};
use crate::error::{RegistrarError, Result};
use models::grade::{self, LetterGrade};
use models::status::RegistrationStatus;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use std::collections::HashMap;
use uuid::Uuid;

/// One completed course on a transcript
#[derive(Clone, Debug)]
pub struct TranscriptLine {
    pub course_code: String,
    pub course_title: String,
    pub credits: i32,
    pub semester_name: String,
    pub overall_percentage: Option<f64>,
    pub letter_grade: LetterGrade,
}

#[derive(Clone, Debug)]
pub struct Transcript {
    pub lines: Vec<TranscriptLine>,
    /// Cumulative GPA over all completed credits; `None` with no credits
    pub cgpa: Option<f64>,
}

/// Read-time GPA aggregation over completed registrations. Nothing here
/// is cached or persisted; every call recomputes from the ledger.
pub struct TranscriptService;

impl TranscriptService {
    pub async fn transcript<C>(db: &C, student_id: Uuid) -> Result<Transcript>
    where
        C: ConnectionTrait,
    {
        Self::build(db, student_id, None).await
    }

    /// GPA restricted to a single semester
    pub async fn sgpa<C>(db: &C, student_id: Uuid, semester_id: Uuid) -> Result<Option<f64>>
    where
        C: ConnectionTrait,
    {
        semester::Entity::find_by_id(semester_id)
            .one(db)
            .await?
            .ok_or(RegistrarError::SemesterNotFound(semester_id))?;

        let transcript = Self::build(db, student_id, Some(semester_id)).await?;
        Ok(transcript.cgpa)
    }

    async fn build<C>(db: &C, student_id: Uuid, semester_id: Option<Uuid>) -> Result<Transcript>
    where
        C: ConnectionTrait,
    {
        user::Entity::find_by_id(student_id)
            .one(db)
            .await?
            .ok_or(RegistrarError::UserNotFound(student_id))?;

        let completed: Vec<(registration::Model, Option<section::Model>)> =
            registration::Entity::find()
                .filter(registration::Column::StudentId.eq(student_id))
                .filter(registration::Column::Status.eq(RegistrationStatus::Completed))
                .find_also_related(section::Entity)
                .all(db)
                .await?;

        let completed: Vec<(registration::Model, section::Model)> = completed
            .into_iter()
            .filter_map(|(row, sec)| sec.map(|s| (row, s)))
            .filter(|(_, sec)| semester_id.is_none_or(|id| sec.semester_id == id))
            .collect();

        // Batch fetch courses and semesters once, then join in memory
        let course_ids: Vec<Uuid> = completed.iter().map(|(_, s)| s.course_id).collect();
        let semester_ids: Vec<Uuid> = completed.iter().map(|(_, s)| s.semester_id).collect();

        let (courses, semesters) = futures::try_join!(
            course::Entity::find()
                .filter(course::Column::Id.is_in(course_ids))
                .all(db),
            semester::Entity::find()
                .filter(semester::Column::Id.is_in(semester_ids))
                .all(db),
        )?;
        let courses: HashMap<Uuid, course::Model> =
            courses.into_iter().map(|c| (c.id, c)).collect();
        let semesters: HashMap<Uuid, semester::Model> =
            semesters.into_iter().map(|s| (s.id, s)).collect();

        let mut lines = Vec::new();
        let mut graded = Vec::new();

        for (row, sec) in completed {
            let Some(letter) = row.final_letter_grade else {
                continue;
            };
            let Some(course) = courses.get(&sec.course_id) else {
                continue;
            };
            let Some(sem) = semesters.get(&sec.semester_id) else {
                continue;
            };

            graded.push((letter, course.credits));
            lines.push(TranscriptLine {
                course_code: course.code.clone(),
                course_title: course.title.clone(),
                credits: course.credits,
                semester_name: sem.name.clone(),
                overall_percentage: row.overall_percentage,
                letter_grade: letter,
            });
        }

        let cgpa = grade::grade_point_average(graded);

        Ok(Transcript { lines, cgpa })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::department;
    use crate::test_support;
    use chrono::Utc;
    use sea_orm::ActiveValue::Set;
    use sea_orm::{ActiveModelTrait, DatabaseConnection};

    async fn complete_course(
        db: &DatabaseConnection,
        student: &user::Model,
        dept: &department::Model,
        semester: &semester::Model,
        code: &str,
        credits: i32,
        letter: LetterGrade,
    ) {
        let course = test_support::seed_course(db, dept, code, credits).await;
        let section = test_support::seed_section(db, &course, semester, 30).await;
        let now = Utc::now().naive_utc();
        registration::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(student.id),
            section_id: Set(section.id),
            status: Set(RegistrationStatus::Completed),
            overall_percentage: Set(Some(90.0)),
            final_letter_grade: Set(Some(letter)),
            registered_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_cgpa_weights_by_credits() {
        let db = test_support::connect().await;
        let student = test_support::seed_student(&db, "Ada Lovelace").await;
        let dept = test_support::seed_department(&db, "CS").await;
        let semester = test_support::open_semester(&db).await;

        complete_course(&db, &student, &dept, &semester, "CS1000", 4, LetterGrade::A).await;
        complete_course(&db, &student, &dept, &semester, "CS2000", 2, LetterGrade::B).await;

        let transcript = TranscriptService::transcript(&db, student.id).await.unwrap();
        assert_eq!(transcript.lines.len(), 2);

        // (4.0 * 4 + 3.0 * 2) / 6
        let cgpa = transcript.cgpa.unwrap();
        assert!((cgpa - 22.0 / 6.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_sgpa_is_restricted_to_one_semester() {
        let db = test_support::connect().await;
        let student = test_support::seed_student(&db, "Ada Lovelace").await;
        let dept = test_support::seed_department(&db, "CS").await;
        let fall = test_support::open_semester(&db).await;
        let spring = test_support::closed_semester(&db).await;

        complete_course(&db, &student, &dept, &fall, "CS1000", 4, LetterGrade::A).await;
        complete_course(&db, &student, &dept, &spring, "CS2000", 4, LetterGrade::C).await;

        let sgpa = TranscriptService::sgpa(&db, student.id, fall.id)
            .await
            .unwrap()
            .unwrap();
        assert!((sgpa - 4.0).abs() < 1e-9);

        let cgpa = TranscriptService::transcript(&db, student.id)
            .await
            .unwrap()
            .cgpa
            .unwrap();
        assert!((cgpa - 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_empty_transcript_has_no_gpa() {
        let db = test_support::connect().await;
        let student = test_support::seed_student(&db, "Ada Lovelace").await;

        let transcript = TranscriptService::transcript(&db, student.id).await.unwrap();
        assert!(transcript.lines.is_empty());
        assert_eq!(transcript.cgpa, None);
    }

    #[tokio::test]
    async fn test_unknown_student_is_rejected() {
        let db = test_support::connect().await;
        let err = TranscriptService::transcript(&db, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrarError::UserNotFound(_)));
    }
}
