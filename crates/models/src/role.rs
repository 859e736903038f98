use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Portal role. Stored as a string column; the closed set means every
/// permission check below is an exhaustive match, so adding a role forces
/// a review of each one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Role {
    #[sea_orm(string_value = "Student")]
    Student,
    #[sea_orm(string_value = "Teacher")]
    Teacher,
    #[sea_orm(string_value = "Admin")]
    Admin,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Teacher => "Teacher",
            Self::Admin => "Admin",
        }
    }

    /// Register for / drop sections on one's own behalf
    pub const fn can_register(self) -> bool {
        match self {
            Self::Student => true,
            Self::Teacher | Self::Admin => false,
        }
    }

    /// View a section's roster and enter scores for it
    pub const fn can_grade(self) -> bool {
        match self {
            Self::Teacher | Self::Admin => true,
            Self::Student => false,
        }
    }

    /// View transcripts other than one's own
    pub const fn can_view_any_transcript(self) -> bool {
        match self {
            Self::Teacher | Self::Admin => true,
            Self::Student => false,
        }
    }

    /// Create and delete reference data (departments, courses, semesters,
    /// sections, prerequisites, assessments)
    pub const fn can_manage_catalog(self) -> bool {
        match self {
            Self::Admin => true,
            Self::Student | Self::Teacher => false,
        }
    }

    /// Post announcements
    pub const fn can_announce(self) -> bool {
        match self {
            Self::Teacher | Self::Admin => true,
            Self::Student => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_matrix() {
        assert!(Role::Student.can_register());
        assert!(!Role::Teacher.can_register());
        assert!(!Role::Admin.can_register());

        assert!(Role::Teacher.can_grade());
        assert!(Role::Admin.can_grade());
        assert!(!Role::Student.can_grade());

        assert!(Role::Admin.can_manage_catalog());
        assert!(!Role::Teacher.can_manage_catalog());

        assert!(Role::Teacher.can_announce());
        assert!(!Role::Student.can_announce());
    }
}
