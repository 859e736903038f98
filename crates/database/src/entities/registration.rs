use models::grade::LetterGrade;
use models::status::RegistrationStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One student's relationship to one section. At most one row exists per
/// (student, section) pair; rows are reactivated on re-registration and
/// never physically deleted, so enrollment history is retained.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "registrations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student_id: Uuid,
    pub section_id: Uuid,
    pub status: RegistrationStatus,
    pub overall_percentage: Option<f64>,
    pub final_letter_grade: Option<LetterGrade>,
    pub registered_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::section::Entity",
        from = "Column::SectionId",
        to = "super::section::Column::Id"
    )]
    Section,
    #[sea_orm(has_many = "super::assessment_score::Entity")]
    AssessmentScores,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::section::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Section.def()
    }
}

impl Related<super::assessment_score::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssessmentScores.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
