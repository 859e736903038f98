pub mod announcement;
pub mod assessment;
pub mod assessment_score;
pub mod course;
pub mod department;
pub mod prerequisite;
pub mod registration;
pub mod section;
pub mod semester;
pub mod user;
