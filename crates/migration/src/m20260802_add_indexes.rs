use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // At most one registration row per (student, section) pair. The
        // ledger relies on this to make re-registration a reactivation.
        manager
            .create_index(
                Index::create()
                    .name("uq_registrations_student_section")
                    .table(Registrations::Table)
                    .col(Registrations::StudentId)
                    .col(Registrations::SectionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // One score row per (registration, assessment); the gradebook
        // upsert conflicts on this pair
        manager
            .create_index(
                Index::create()
                    .name("uq_assessment_scores_registration_assessment")
                    .table(AssessmentScores::Table)
                    .col(AssessmentScores::RegistrationId)
                    .col(AssessmentScores::AssessmentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // One prerequisite edge per (course, required course) pair
        manager
            .create_index(
                Index::create()
                    .name("uq_prerequisites_course_required")
                    .table(Prerequisites::Table)
                    .col(Prerequisites::CourseId)
                    .col(Prerequisites::RequiredCourseId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Indexes for the common join paths
        manager
            .create_index(
                Index::create()
                    .name("idx_registrations_section_id")
                    .table(Registrations::Table)
                    .col(Registrations::SectionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sections_course_id")
                    .table(Sections::Table)
                    .col(Sections::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sections_semester_id")
                    .table(Sections::Table)
                    .col(Sections::SemesterId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_assessments_section_id")
                    .table(Assessments::Table)
                    .col(Assessments::SectionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_announcements_section_id")
                    .table(Announcements::Table)
                    .col(Announcements::SectionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop indexes in reverse order
        manager
            .drop_index(
                Index::drop()
                    .name("idx_announcements_section_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(Index::drop().name("idx_assessments_section_id").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_sections_semester_id").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_sections_course_id").to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_registrations_section_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("uq_prerequisites_course_required")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("uq_assessment_scores_registration_assessment")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("uq_registrations_student_section")
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Registrations {
    Table,
    StudentId,
    SectionId,
}

#[derive(Iden)]
enum AssessmentScores {
    Table,
    RegistrationId,
    AssessmentId,
}

#[derive(Iden)]
enum Prerequisites {
    Table,
    CourseId,
    RequiredCourseId,
}

#[derive(Iden)]
enum Sections {
    Table,
    CourseId,
    SemesterId,
}

#[derive(Iden)]
enum Assessments {
    Table,
    SectionId,
}

#[derive(Iden)]
enum Announcements {
    Table,
    SectionId,
}
