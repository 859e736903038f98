pub mod announcement;
pub mod catalog;
pub mod enrollment;
pub mod gradebook;
pub mod health;
pub mod transcript;
