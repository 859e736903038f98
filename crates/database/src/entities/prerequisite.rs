use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Directed edge: registering for `course_id` requires having completed
/// `required_course_id`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "prerequisites")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub course_id: Uuid,
    pub required_course_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::RequiredCourseId",
        to = "super::course::Column::Id"
    )]
    RequiredCourse,
}

impl ActiveModelBehavior for ActiveModel {}
