//! Error types for the registrar core.
//!
//! Every precondition violation is a distinct named variant detected before
//! any write; store failures that abort a transaction surface as the single
//! generic `Persistence` variant.

use sea_orm::{DbErr, TransactionError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum RegistrarError {
    /// Register called for a pair that is already actively registered
    #[error("student is already registered for this section")]
    AlreadyRegistered,

    /// Register called for a pair that has already been completed
    #[error("student has already completed this section")]
    AlreadyCompleted,

    /// Carries the course codes the student has not completed
    #[error("prerequisites not met: {}", missing.join(", "))]
    PrerequisiteNotMet { missing: Vec<String> },

    /// Section capacity exhausted
    #[error("section is full")]
    SectionFull,

    /// Outside the semester's registration window
    #[error("the registration window for this semester is closed")]
    RegistrationClosed,

    /// Drop (or finalize) attempted with no active registration
    #[error("student has no active registration for this section")]
    NotRegistered,

    /// A submitted score violates `0 <= score <= max_score`
    #[error("score {score} for \"{assessment}\" is outside 0..={max_score}")]
    ScoreOutOfRange {
        assessment: String,
        score: f64,
        max_score: f64,
    },

    /// Administrative CRUD conflict, e.g. deleting a section that still
    /// has registrations
    #[error("{0}")]
    DependencyConflict(String),

    #[error("section {0} not found")]
    SectionNotFound(Uuid),

    #[error("semester {0} not found")]
    SemesterNotFound(Uuid),

    #[error("course {0} not found")]
    CourseNotFound(Uuid),

    #[error("department {0} not found")]
    DepartmentNotFound(Uuid),

    #[error("user {0} not found")]
    UserNotFound(Uuid),

    #[error("registration {0} not found in this section")]
    RegistrationNotFound(Uuid),

    #[error("assessment {0} not found in this section")]
    AssessmentNotFound(Uuid),

    /// Underlying store failure; the enclosing transaction has been
    /// rolled back and no ledger state changed
    #[error("persistence failure: {0}")]
    Persistence(#[from] DbErr),
}

impl From<TransactionError<RegistrarError>> for RegistrarError {
    fn from(err: TransactionError<RegistrarError>) -> Self {
        match err {
            TransactionError::Connection(e) => Self::Persistence(e),
            TransactionError::Transaction(e) => e,
        }
    }
}

/// Convenience Result type using [`RegistrarError`]
pub type Result<T> = std::result::Result<T, RegistrarError>;
