use crate::entities::{announcement, section, user};
use crate::error::{RegistrarError, Result};
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

pub struct AnnouncementService;

impl AnnouncementService {
    /// Post an announcement; `section_id` of `None` means campus-wide
    pub async fn post<C>(
        db: &C,
        author_id: Uuid,
        section_id: Option<Uuid>,
        title: &str,
        body: &str,
    ) -> Result<announcement::Model>
    where
        C: ConnectionTrait,
    {
        user::Entity::find_by_id(author_id)
            .one(db)
            .await?
            .ok_or(RegistrarError::UserNotFound(author_id))?;

        if let Some(section_id) = section_id {
            section::Entity::find_by_id(section_id)
                .one(db)
                .await?
                .ok_or(RegistrarError::SectionNotFound(section_id))?;
        }

        Ok(announcement::ActiveModel {
            id: Set(Uuid::new_v4()),
            section_id: Set(section_id),
            author_id: Set(author_id),
            title: Set(title.to_string()),
            body: Set(body.to_string()),
            created_at: Set(Utc::now().naive_utc()),
        }
        .insert(db)
        .await?)
    }

    /// Announcements visible to a section's roster: the section's own
    /// plus campus-wide ones, newest first
    pub async fn for_section<C>(db: &C, section_id: Uuid) -> Result<Vec<announcement::Model>>
    where
        C: ConnectionTrait,
    {
        section::Entity::find_by_id(section_id)
            .one(db)
            .await?
            .ok_or(RegistrarError::SectionNotFound(section_id))?;

        Ok(announcement::Entity::find()
            .filter(
                Condition::any()
                    .add(announcement::Column::SectionId.eq(section_id))
                    .add(announcement::Column::SectionId.is_null()),
            )
            .order_by_desc(announcement::Column::CreatedAt)
            .all(db)
            .await?)
    }

    /// Campus-wide announcements only, newest first
    pub async fn campus_wide<C>(db: &C) -> Result<Vec<announcement::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(announcement::Entity::find()
            .filter(announcement::Column::SectionId.is_null())
            .order_by_desc(announcement::Column::CreatedAt)
            .all(db)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use models::role::Role;

    #[tokio::test]
    async fn test_section_feed_includes_campus_wide_posts() {
        let db = test_support::connect().await;
        let teacher = test_support::seed_user(&db, "Grace Hopper", Role::Teacher).await;
        let admin = test_support::seed_user(&db, "Registrar Office", Role::Admin).await;
        let dept = test_support::seed_department(&db, "CS").await;
        let course = test_support::seed_course(&db, &dept, "CS1000", 4).await;
        let semester = test_support::open_semester(&db).await;
        let section = test_support::seed_section(&db, &course, &semester, 30).await;
        let other = test_support::seed_section(&db, &course, &semester, 30).await;

        AnnouncementService::post(&db, admin.id, None, "Holiday", "Campus closed Friday")
            .await
            .unwrap();
        AnnouncementService::post(&db, teacher.id, Some(section.id), "Quiz", "Quiz on Monday")
            .await
            .unwrap();
        AnnouncementService::post(&db, teacher.id, Some(other.id), "Lab", "Lab moved")
            .await
            .unwrap();

        let feed = AnnouncementService::for_section(&db, section.id).await.unwrap();
        let titles: Vec<&str> = feed.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles.len(), 2);
        assert!(titles.contains(&"Holiday"));
        assert!(titles.contains(&"Quiz"));

        let campus = AnnouncementService::campus_wide(&db).await.unwrap();
        assert_eq!(campus.len(), 1);
    }

    #[tokio::test]
    async fn test_post_to_unknown_section_is_rejected() {
        let db = test_support::connect().await;
        let teacher = test_support::seed_user(&db, "Grace Hopper", Role::Teacher).await;

        let err = AnnouncementService::post(&db, teacher.id, Some(Uuid::new_v4()), "x", "y")
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrarError::SectionNotFound(_)));
    }
}
