use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::FullName).string().not_null())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        // Create departments table
        manager
            .create_table(
                Table::create()
                    .table(Departments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Departments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Departments::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Departments::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Create courses table
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Courses::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Courses::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Courses::Title).string().not_null())
                    .col(ColumnDef::new(Courses::Credits).integer().not_null())
                    .col(ColumnDef::new(Courses::DepartmentId).uuid().not_null())
                    .col(ColumnDef::new(Courses::Description).text())
                    .col(ColumnDef::new(Courses::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Courses::UpdatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-courses-department_id")
                            .from(Courses::Table, Courses::DepartmentId)
                            .to(Departments::Table, Departments::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Create semesters table
        manager
            .create_table(
                Table::create()
                    .table(Semesters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Semesters::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Semesters::Name).string().not_null())
                    .col(ColumnDef::new(Semesters::StartsOn).date().not_null())
                    .col(ColumnDef::new(Semesters::EndsOn).date().not_null())
                    .col(
                        ColumnDef::new(Semesters::RegistrationStartDate)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Semesters::RegistrationEndDate)
                            .date_time()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create sections table
        manager
            .create_table(
                Table::create()
                    .table(Sections::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sections::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Sections::CourseId).uuid().not_null())
                    .col(ColumnDef::new(Sections::SemesterId).uuid().not_null())
                    .col(ColumnDef::new(Sections::Code).string().not_null())
                    .col(ColumnDef::new(Sections::TeacherId).uuid())
                    .col(ColumnDef::new(Sections::MaxCapacity).integer().not_null())
                    .col(
                        ColumnDef::new(Sections::CurrentEnrollment)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Sections::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Sections::UpdatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sections-course_id")
                            .from(Sections::Table, Sections::CourseId)
                            .to(Courses::Table, Courses::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sections-semester_id")
                            .from(Sections::Table, Sections::SemesterId)
                            .to(Semesters::Table, Semesters::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sections-teacher_id")
                            .from(Sections::Table, Sections::TeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create prerequisites table (directed course -> required course edges)
        manager
            .create_table(
                Table::create()
                    .table(Prerequisites::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Prerequisites::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Prerequisites::CourseId).uuid().not_null())
                    .col(
                        ColumnDef::new(Prerequisites::RequiredCourseId)
                            .uuid()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-prerequisites-course_id")
                            .from(Prerequisites::Table, Prerequisites::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-prerequisites-required_course_id")
                            .from(Prerequisites::Table, Prerequisites::RequiredCourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create registrations table (the ledger rows)
        manager
            .create_table(
                Table::create()
                    .table(Registrations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Registrations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Registrations::StudentId).uuid().not_null())
                    .col(ColumnDef::new(Registrations::SectionId).uuid().not_null())
                    .col(ColumnDef::new(Registrations::Status).string().not_null())
                    .col(ColumnDef::new(Registrations::OverallPercentage).double())
                    .col(ColumnDef::new(Registrations::FinalLetterGrade).string())
                    .col(
                        ColumnDef::new(Registrations::RegisteredAt)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Registrations::UpdatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-registrations-student_id")
                            .from(Registrations::Table, Registrations::StudentId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-registrations-section_id")
                            .from(Registrations::Table, Registrations::SectionId)
                            .to(Sections::Table, Sections::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Create assessments table
        manager
            .create_table(
                Table::create()
                    .table(Assessments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assessments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Assessments::SectionId).uuid().not_null())
                    .col(ColumnDef::new(Assessments::Title).string().not_null())
                    .col(ColumnDef::new(Assessments::MaxScore).double().not_null())
                    .col(
                        ColumnDef::new(Assessments::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-assessments-section_id")
                            .from(Assessments::Table, Assessments::SectionId)
                            .to(Sections::Table, Sections::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create assessment_scores table
        manager
            .create_table(
                Table::create()
                    .table(AssessmentScores::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AssessmentScores::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AssessmentScores::RegistrationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AssessmentScores::AssessmentId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AssessmentScores::ScoreAchieved).double())
                    .col(ColumnDef::new(AssessmentScores::GradedAt).date_time())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-assessment_scores-registration_id")
                            .from(AssessmentScores::Table, AssessmentScores::RegistrationId)
                            .to(Registrations::Table, Registrations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-assessment_scores-assessment_id")
                            .from(AssessmentScores::Table, AssessmentScores::AssessmentId)
                            .to(Assessments::Table, Assessments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create announcements table
        manager
            .create_table(
                Table::create()
                    .table(Announcements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Announcements::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Announcements::SectionId).uuid())
                    .col(ColumnDef::new(Announcements::AuthorId).uuid().not_null())
                    .col(ColumnDef::new(Announcements::Title).string().not_null())
                    .col(ColumnDef::new(Announcements::Body).text().not_null())
                    .col(
                        ColumnDef::new(Announcements::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-announcements-section_id")
                            .from(Announcements::Table, Announcements::SectionId)
                            .to(Sections::Table, Sections::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-announcements-author_id")
                            .from(Announcements::Table, Announcements::AuthorId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(Announcements::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(AssessmentScores::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Assessments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Registrations::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Prerequisites::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Sections::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Semesters::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Departments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    FullName,
    Email,
    Role,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Departments {
    Table,
    Id,
    Code,
    Name,
}

#[derive(Iden)]
enum Courses {
    Table,
    Id,
    Code,
    Title,
    Credits,
    DepartmentId,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Semesters {
    Table,
    Id,
    Name,
    StartsOn,
    EndsOn,
    RegistrationStartDate,
    RegistrationEndDate,
}

#[derive(Iden)]
enum Sections {
    Table,
    Id,
    CourseId,
    SemesterId,
    Code,
    TeacherId,
    MaxCapacity,
    CurrentEnrollment,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Prerequisites {
    Table,
    Id,
    CourseId,
    RequiredCourseId,
}

#[derive(Iden)]
enum Registrations {
    Table,
    Id,
    StudentId,
    SectionId,
    Status,
    OverallPercentage,
    FinalLetterGrade,
    RegisteredAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Assessments {
    Table,
    Id,
    SectionId,
    Title,
    MaxScore,
    CreatedAt,
}

#[derive(Iden)]
enum AssessmentScores {
    Table,
    Id,
    RegistrationId,
    AssessmentId,
    ScoreAchieved,
    GradedAt,
}

#[derive(Iden)]
enum Announcements {
    Table,
    Id,
    SectionId,
    AuthorId,
    Title,
    Body,
    CreatedAt,
}
