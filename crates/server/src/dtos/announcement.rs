use chrono::NaiveDateTime;
use database::entities::announcement;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct PostAnnouncementRequest {
    /// Omit for a campus-wide announcement
    pub section_id: Option<Uuid>,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnnouncementResponse {
    pub id: Uuid,
    pub section_id: Option<Uuid>,
    pub author_id: Uuid,
    pub title: String,
    pub body: String,
    pub created_at: NaiveDateTime,
}

impl From<announcement::Model> for AnnouncementResponse {
    fn from(row: announcement::Model) -> Self {
        Self {
            id: row.id,
            section_id: row.section_id,
            author_id: row.author_id,
            title: row.title,
            body: row.body,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct AnnouncementQueryParams {
    /// With a section id the feed includes that section's posts plus
    /// campus-wide ones; without it only campus-wide posts are returned
    pub section_id: Option<Uuid>,
}
