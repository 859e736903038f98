pub mod announcement;
pub mod catalog;
pub mod enrollment;
pub mod gradebook;
pub mod transcript;
