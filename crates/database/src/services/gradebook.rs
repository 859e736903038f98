use crate::entities::{assessment, assessment_score, registration, section, user};
use crate::error::{RegistrarError, Result};
use crate::services::enrollment::EnrollmentService;
use chrono::Utc;
use models::grade::{self, LetterGrade};
use models::status::RegistrationStatus;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

/// One submitted raw score. A `None` score clears any previously stored
/// value for the pair without deleting the assessment.
#[derive(Clone, Debug)]
pub struct ScoreEntry {
    pub registration_id: Uuid,
    pub assessment_id: Uuid,
    pub score: Option<f64>,
}

/// Readback of a section's grading state
#[derive(Clone, Debug)]
pub struct GradeSheet {
    pub assessments: Vec<assessment::Model>,
    pub rows: Vec<GradeSheetRow>,
}

#[derive(Clone, Debug)]
pub struct GradeSheetRow {
    pub registration: registration::Model,
    pub student: user::Model,
    pub scores: Vec<assessment_score::Model>,
}

pub struct GradebookService;

impl GradebookService {
    /// Persist a batch of raw scores for a section and optionally finalize
    /// registrations.
    ///
    /// Everything is validated before the first write, and the whole batch
    /// (score upserts plus final grades) commits or rolls back as one
    /// transaction, so a partial grade sheet is never visible.
    ///
    /// Each registration id in `finalize` gets its overall percentage
    /// recomputed from the stored scores, the letter grade derived from
    /// the fixed thresholds, and its status set to `Completed`.
    pub async fn save_scores<C>(
        db: &C,
        section_id: Uuid,
        entries: Vec<ScoreEntry>,
        finalize: Vec<Uuid>,
    ) -> Result<()>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        db.transaction::<_, (), RegistrarError>(|txn| {
            Box::pin(async move {
                section::Entity::find_by_id(section_id)
                    .one(txn)
                    .await?
                    .ok_or(RegistrarError::SectionNotFound(section_id))?;

                let assessments: HashMap<Uuid, assessment::Model> = assessment::Entity::find()
                    .filter(assessment::Column::SectionId.eq(section_id))
                    .all(txn)
                    .await?
                    .into_iter()
                    .map(|a| (a.id, a))
                    .collect();

                let registrations: HashMap<Uuid, registration::Model> =
                    registration::Entity::find()
                        .filter(registration::Column::SectionId.eq(section_id))
                        .all(txn)
                        .await?
                        .into_iter()
                        .map(|r| (r.id, r))
                        .collect();

                for entry in &entries {
                    let assessment = assessments
                        .get(&entry.assessment_id)
                        .ok_or(RegistrarError::AssessmentNotFound(entry.assessment_id))?;
                    if !registrations.contains_key(&entry.registration_id) {
                        return Err(RegistrarError::RegistrationNotFound(entry.registration_id));
                    }
                    if let Some(score) = entry.score
                        && !(0.0..=assessment.max_score).contains(&score)
                    {
                        return Err(RegistrarError::ScoreOutOfRange {
                            assessment: assessment.title.clone(),
                            score,
                            max_score: assessment.max_score,
                        });
                    }
                }

                for registration_id in &finalize {
                    let row = registrations
                        .get(registration_id)
                        .ok_or(RegistrarError::RegistrationNotFound(*registration_id))?;
                    if row.status == RegistrationStatus::Dropped {
                        return Err(RegistrarError::NotRegistered);
                    }
                }

                let now = Utc::now().naive_utc();

                for entry in entries {
                    let row = assessment_score::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        registration_id: Set(entry.registration_id),
                        assessment_id: Set(entry.assessment_id),
                        score_achieved: Set(entry.score),
                        graded_at: Set(entry.score.map(|_| now)),
                    };

                    assessment_score::Entity::insert(row)
                        .on_conflict(
                            OnConflict::columns([
                                assessment_score::Column::RegistrationId,
                                assessment_score::Column::AssessmentId,
                            ])
                            .update_columns([
                                assessment_score::Column::ScoreAchieved,
                                assessment_score::Column::GradedAt,
                            ])
                            .to_owned(),
                        )
                        .exec(txn)
                        .await?;
                }

                if !finalize.is_empty() {
                    let possible: f64 = assessments.values().map(|a| a.max_score).sum();

                    let stored = assessment_score::Entity::find()
                        .filter(
                            assessment_score::Column::RegistrationId.is_in(finalize.clone()),
                        )
                        .all(txn)
                        .await?;

                    let mut earned: HashMap<Uuid, f64> = HashMap::new();
                    for row in stored {
                        if assessments.contains_key(&row.assessment_id)
                            && let Some(score) = row.score_achieved
                        {
                            *earned.entry(row.registration_id).or_default() += score;
                        }
                    }

                    for registration_id in finalize {
                        let points = earned.get(&registration_id).copied().unwrap_or(0.0);
                        let percentage = grade::overall_percentage(points, possible);
                        let letter = LetterGrade::from_percentage(percentage);

                        let mut active: registration::ActiveModel =
                            registrations[&registration_id].clone().into();
                        active.overall_percentage = Set(Some(percentage));
                        active.final_letter_grade = Set(Some(letter));
                        active.status = Set(RegistrationStatus::Completed);
                        active.updated_at = Set(now);
                        active.update(txn).await?;
                    }
                }

                Ok(())
            })
        })
        .await
        .map_err(RegistrarError::from)
    }

    /// The section's assessments plus, for every roster registration, its
    /// stored scores. Cleared scores read back as null rows.
    pub async fn grade_sheet<C>(db: &C, section_id: Uuid) -> Result<GradeSheet>
    where
        C: ConnectionTrait,
    {
        section::Entity::find_by_id(section_id)
            .one(db)
            .await?
            .ok_or(RegistrarError::SectionNotFound(section_id))?;

        let assessments = assessment::Entity::find()
            .filter(assessment::Column::SectionId.eq(section_id))
            .order_by_asc(assessment::Column::CreatedAt)
            .all(db)
            .await?;

        let roster = EnrollmentService::roster(db, section_id).await?;
        let registration_ids: Vec<Uuid> = roster.iter().map(|(r, _)| r.id).collect();

        let mut scores_by_registration: HashMap<Uuid, Vec<assessment_score::Model>> =
            HashMap::new();
        if !registration_ids.is_empty() {
            let all_scores = assessment_score::Entity::find()
                .filter(assessment_score::Column::RegistrationId.is_in(registration_ids))
                .all(db)
                .await?;
            for score in all_scores {
                scores_by_registration
                    .entry(score.registration_id)
                    .or_default()
                    .push(score);
            }
        }

        let rows = roster
            .into_iter()
            .map(|(registration, student)| {
                let scores = scores_by_registration
                    .remove(&registration.id)
                    .unwrap_or_default();
                GradeSheetRow {
                    registration,
                    student,
                    scores,
                }
            })
            .collect();

        Ok(GradeSheet { assessments, rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    struct Fixture {
        db: sea_orm::DatabaseConnection,
        section: section::Model,
        midterm: assessment::Model,
        last: assessment::Model,
        registration: registration::Model,
    }

    async fn fixture() -> Fixture {
        let db = test_support::connect().await;
        let student = test_support::seed_student(&db, "Ada Lovelace").await;
        let dept = test_support::seed_department(&db, "CS").await;
        let course = test_support::seed_course(&db, &dept, "CS1000", 4).await;
        let semester = test_support::open_semester(&db).await;
        let section = test_support::seed_section(&db, &course, &semester, 30).await;
        let midterm = test_support::seed_assessment(&db, &section, "Midterm", 100.0).await;
        let last = test_support::seed_assessment(&db, &section, "Final", 100.0).await;
        let registration = EnrollmentService::register(&db, student.id, section.id)
            .await
            .unwrap();

        Fixture {
            db,
            section,
            midterm,
            last,
            registration,
        }
    }

    fn score_of(sheet: &GradeSheet, assessment_id: Uuid) -> Option<Option<f64>> {
        sheet.rows[0]
            .scores
            .iter()
            .find(|s| s.assessment_id == assessment_id)
            .map(|s| s.score_achieved)
    }

    #[tokio::test]
    async fn test_scores_round_trip() {
        let f = fixture().await;

        GradebookService::save_scores(
            &f.db,
            f.section.id,
            vec![
                ScoreEntry {
                    registration_id: f.registration.id,
                    assessment_id: f.midterm.id,
                    score: Some(80.0),
                },
                ScoreEntry {
                    registration_id: f.registration.id,
                    assessment_id: f.last.id,
                    score: Some(70.0),
                },
            ],
            vec![],
        )
        .await
        .unwrap();

        let sheet = GradebookService::grade_sheet(&f.db, f.section.id)
            .await
            .unwrap();
        assert_eq!(sheet.assessments.len(), 2);
        assert_eq!(score_of(&sheet, f.midterm.id), Some(Some(80.0)));
        assert_eq!(score_of(&sheet, f.last.id), Some(Some(70.0)));
    }

    #[tokio::test]
    async fn test_null_score_clears_without_deleting() {
        let f = fixture().await;

        GradebookService::save_scores(
            &f.db,
            f.section.id,
            vec![ScoreEntry {
                registration_id: f.registration.id,
                assessment_id: f.midterm.id,
                score: Some(80.0),
            }],
            vec![],
        )
        .await
        .unwrap();

        GradebookService::save_scores(
            &f.db,
            f.section.id,
            vec![ScoreEntry {
                registration_id: f.registration.id,
                assessment_id: f.midterm.id,
                score: None,
            }],
            vec![],
        )
        .await
        .unwrap();

        // The pair row still exists and reads back as null
        let sheet = GradebookService::grade_sheet(&f.db, f.section.id)
            .await
            .unwrap();
        assert_eq!(score_of(&sheet, f.midterm.id), Some(None));
    }

    #[tokio::test]
    async fn test_out_of_range_score_persists_nothing() {
        let f = fixture().await;

        let err = GradebookService::save_scores(
            &f.db,
            f.section.id,
            vec![
                ScoreEntry {
                    registration_id: f.registration.id,
                    assessment_id: f.midterm.id,
                    score: Some(80.0),
                },
                ScoreEntry {
                    registration_id: f.registration.id,
                    assessment_id: f.last.id,
                    score: Some(101.0),
                },
            ],
            vec![],
        )
        .await
        .unwrap_err();

        assert!(matches!(err, RegistrarError::ScoreOutOfRange { .. }));

        // The valid entry in the same batch must not have been written
        let sheet = GradebookService::grade_sheet(&f.db, f.section.id)
            .await
            .unwrap();
        assert_eq!(score_of(&sheet, f.midterm.id), None);
    }

    #[tokio::test]
    async fn test_unknown_assessment_is_rejected() {
        let f = fixture().await;

        let err = GradebookService::save_scores(
            &f.db,
            f.section.id,
            vec![ScoreEntry {
                registration_id: f.registration.id,
                assessment_id: Uuid::new_v4(),
                score: Some(50.0),
            }],
            vec![],
        )
        .await
        .unwrap_err();

        assert!(matches!(err, RegistrarError::AssessmentNotFound(_)));
    }

    #[tokio::test]
    async fn test_finalize_derives_percentage_and_letter() {
        let f = fixture().await;

        GradebookService::save_scores(
            &f.db,
            f.section.id,
            vec![
                ScoreEntry {
                    registration_id: f.registration.id,
                    assessment_id: f.midterm.id,
                    score: Some(80.0),
                },
                ScoreEntry {
                    registration_id: f.registration.id,
                    assessment_id: f.last.id,
                    score: Some(70.0),
                },
            ],
            vec![f.registration.id],
        )
        .await
        .unwrap();

        let row = registration::Entity::find_by_id(f.registration.id)
            .one(&f.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.status, RegistrationStatus::Completed);
        assert_eq!(row.overall_percentage, Some(75.0));
        assert_eq!(row.final_letter_grade, Some(LetterGrade::B));
    }

    #[tokio::test]
    async fn test_finalize_counts_missing_scores_as_zero() {
        let f = fixture().await;

        GradebookService::save_scores(
            &f.db,
            f.section.id,
            vec![ScoreEntry {
                registration_id: f.registration.id,
                assessment_id: f.midterm.id,
                score: Some(80.0),
            }],
            vec![f.registration.id],
        )
        .await
        .unwrap();

        let row = registration::Entity::find_by_id(f.registration.id)
            .one(&f.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.overall_percentage, Some(40.0));
        assert_eq!(row.final_letter_grade, Some(LetterGrade::F));
    }

    #[tokio::test]
    async fn test_finalize_with_no_assessments_scores_zero() {
        let db = test_support::connect().await;
        let student = test_support::seed_student(&db, "Ada Lovelace").await;
        let dept = test_support::seed_department(&db, "CS").await;
        let course = test_support::seed_course(&db, &dept, "CS1000", 4).await;
        let semester = test_support::open_semester(&db).await;
        let section = test_support::seed_section(&db, &course, &semester, 30).await;
        let registration = EnrollmentService::register(&db, student.id, section.id)
            .await
            .unwrap();

        GradebookService::save_scores(&db, section.id, vec![], vec![registration.id])
            .await
            .unwrap();

        let row = registration::Entity::find_by_id(registration.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.overall_percentage, Some(0.0));
        assert_eq!(row.final_letter_grade, Some(LetterGrade::F));
    }

    #[tokio::test]
    async fn test_finalizing_dropped_registration_is_rejected() {
        let f = fixture().await;

        EnrollmentService::drop_registration(
            &f.db,
            f.registration.student_id,
            f.registration.section_id,
        )
        .await
        .unwrap();

        let err =
            GradebookService::save_scores(&f.db, f.section.id, vec![], vec![f.registration.id])
                .await
                .unwrap_err();
        assert!(matches!(err, RegistrarError::NotRegistered));
    }
}
