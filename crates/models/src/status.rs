use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle of a registration: `(none) -> Registered -> {Dropped, Completed}`.
/// Dropped pairs may be reactivated back to Registered; Completed is terminal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum RegistrationStatus {
    #[sea_orm(string_value = "Registered")]
    Registered,
    #[sea_orm(string_value = "Dropped")]
    Dropped,
    #[sea_orm(string_value = "Completed")]
    Completed,
}

impl RegistrationStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Registered => "Registered",
            Self::Dropped => "Dropped",
            Self::Completed => "Completed",
        }
    }

    /// Whether this registration occupies a seat or appears on a roster
    pub const fn is_active(self) -> bool {
        match self {
            Self::Registered | Self::Completed => true,
            Self::Dropped => false,
        }
    }
}
