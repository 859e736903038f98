use crate::entities::{
    assessment, course, department, prerequisite, registration, section, semester, user,
};
use crate::error::{RegistrarError, Result};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use uuid::Uuid;

pub struct NewCourse {
    pub code: String,
    pub title: String,
    pub credits: i32,
    pub department_id: Uuid,
    pub description: Option<String>,
}

pub struct NewSemester {
    pub name: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub registration_start_date: NaiveDateTime,
    pub registration_end_date: NaiveDateTime,
}

pub struct NewSection {
    pub course_id: Uuid,
    pub semester_id: Uuid,
    pub code: String,
    pub teacher_id: Option<Uuid>,
    pub max_capacity: i32,
}

/// The administrative CRUD boundary owning the reference data the ledger
/// and gradebook read: departments, courses, semesters, sections,
/// prerequisite edges and assessment definitions.
pub struct CatalogService;

impl CatalogService {
    pub async fn create_department<C>(db: &C, code: &str, name: &str) -> Result<department::Model>
    where
        C: ConnectionTrait,
    {
        Ok(department::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code.to_string()),
            name: Set(name.to_string()),
        }
        .insert(db)
        .await?)
    }

    pub async fn create_course<C>(db: &C, new: NewCourse) -> Result<course::Model>
    where
        C: ConnectionTrait,
    {
        department::Entity::find_by_id(new.department_id)
            .one(db)
            .await?
            .ok_or(RegistrarError::DepartmentNotFound(new.department_id))?;

        let now = Utc::now().naive_utc();
        Ok(course::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(new.code),
            title: Set(new.title),
            credits: Set(new.credits),
            department_id: Set(new.department_id),
            description: Set(new.description),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?)
    }

    /// Query courses with pagination, an optional text search over code,
    /// title and description, and an optional department-code filter
    pub async fn get_courses_paginated<C>(
        db: &C,
        page: u64,
        per_page: u64,
        search: Option<String>,
        departments: Option<Vec<String>>,
    ) -> Result<(Vec<course::Model>, u64)>
    where
        C: ConnectionTrait,
    {
        let mut condition = Condition::all();

        if let Some(search) = search {
            let search_condition = Condition::any()
                .add(course::Column::Code.like(format!("%{search}%")))
                .add(course::Column::Title.like(format!("%{search}%")))
                .add(course::Column::Description.like(format!("%{search}%")));
            condition = condition.add(search_condition);
        }

        if let Some(departments) = departments
            && !departments.is_empty()
        {
            let department_ids: Vec<Uuid> = department::Entity::find()
                .filter(department::Column::Code.is_in(departments))
                .all(db)
                .await?
                .into_iter()
                .map(|d| d.id)
                .collect();
            condition = condition.add(course::Column::DepartmentId.is_in(department_ids));
        }

        let query = course::Entity::find()
            .filter(condition)
            .order_by_asc(course::Column::Code);

        let total_items = query.clone().count(db).await?;
        let paginator = query.paginate(db, per_page);
        let courses = paginator.fetch_page(page.saturating_sub(1)).await?; // SeaORM uses 0-based pages

        Ok((courses, total_items))
    }

    pub async fn get_course_by_id<C>(
        db: &C,
        course_id: Uuid,
    ) -> Result<Option<(course::Model, Vec<section::Model>)>>
    where
        C: ConnectionTrait,
    {
        let Some(course) = course::Entity::find_by_id(course_id).one(db).await? else {
            return Ok(None);
        };

        let sections = course
            .find_related(section::Entity)
            .order_by_asc(section::Column::Code)
            .all(db)
            .await?;

        Ok(Some((course, sections)))
    }

    /// Add a prerequisite edge: taking `course_id` requires having
    /// completed `required_course_id`
    pub async fn add_prerequisite<C>(
        db: &C,
        course_id: Uuid,
        required_course_id: Uuid,
    ) -> Result<prerequisite::Model>
    where
        C: ConnectionTrait,
    {
        if course_id == required_course_id {
            return Err(RegistrarError::DependencyConflict(
                "a course cannot be its own prerequisite".to_string(),
            ));
        }

        for id in [course_id, required_course_id] {
            course::Entity::find_by_id(id)
                .one(db)
                .await?
                .ok_or(RegistrarError::CourseNotFound(id))?;
        }

        let existing = prerequisite::Entity::find()
            .filter(prerequisite::Column::CourseId.eq(course_id))
            .filter(prerequisite::Column::RequiredCourseId.eq(required_course_id))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(RegistrarError::DependencyConflict(
                "prerequisite edge already exists".to_string(),
            ));
        }

        Ok(prerequisite::ActiveModel {
            id: Set(Uuid::new_v4()),
            course_id: Set(course_id),
            required_course_id: Set(required_course_id),
        }
        .insert(db)
        .await?)
    }

    pub async fn create_semester<C>(db: &C, new: NewSemester) -> Result<semester::Model>
    where
        C: ConnectionTrait,
    {
        Ok(semester::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new.name),
            starts_on: Set(new.starts_on),
            ends_on: Set(new.ends_on),
            registration_start_date: Set(new.registration_start_date),
            registration_end_date: Set(new.registration_end_date),
        }
        .insert(db)
        .await?)
    }

    pub async fn list_semesters<C>(db: &C) -> Result<Vec<semester::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(semester::Entity::find()
            .order_by_asc(semester::Column::StartsOn)
            .all(db)
            .await?)
    }

    pub async fn create_section<C>(db: &C, new: NewSection) -> Result<section::Model>
    where
        C: ConnectionTrait,
    {
        course::Entity::find_by_id(new.course_id)
            .one(db)
            .await?
            .ok_or(RegistrarError::CourseNotFound(new.course_id))?;
        semester::Entity::find_by_id(new.semester_id)
            .one(db)
            .await?
            .ok_or(RegistrarError::SemesterNotFound(new.semester_id))?;
        if let Some(teacher_id) = new.teacher_id {
            user::Entity::find_by_id(teacher_id)
                .one(db)
                .await?
                .ok_or(RegistrarError::UserNotFound(teacher_id))?;
        }

        let now = Utc::now().naive_utc();
        Ok(section::ActiveModel {
            id: Set(Uuid::new_v4()),
            course_id: Set(new.course_id),
            semester_id: Set(new.semester_id),
            code: Set(new.code),
            teacher_id: Set(new.teacher_id),
            max_capacity: Set(new.max_capacity),
            current_enrollment: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?)
    }

    pub async fn get_section<C>(db: &C, section_id: Uuid) -> Result<section::Model>
    where
        C: ConnectionTrait,
    {
        section::Entity::find_by_id(section_id)
            .one(db)
            .await?
            .ok_or(RegistrarError::SectionNotFound(section_id))
    }

    pub async fn list_sections<C>(
        db: &C,
        course_id: Option<Uuid>,
        semester_id: Option<Uuid>,
    ) -> Result<Vec<section::Model>>
    where
        C: ConnectionTrait,
    {
        let mut condition = Condition::all();
        if let Some(course_id) = course_id {
            condition = condition.add(section::Column::CourseId.eq(course_id));
        }
        if let Some(semester_id) = semester_id {
            condition = condition.add(section::Column::SemesterId.eq(semester_id));
        }

        Ok(section::Entity::find()
            .filter(condition)
            .order_by_asc(section::Column::Code)
            .all(db)
            .await?)
    }

    /// Delete a section. Refused while any registration rows reference it
    /// (regardless of status; enrollment history is never discarded), so
    /// the ledger's rows can never be orphaned.
    pub async fn delete_section<C>(db: &C, section_id: Uuid) -> Result<()>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        db.transaction::<_, (), RegistrarError>(|txn| {
            Box::pin(async move {
                let section = section::Entity::find_by_id(section_id)
                    .one(txn)
                    .await?
                    .ok_or(RegistrarError::SectionNotFound(section_id))?;

                let references = registration::Entity::find()
                    .filter(registration::Column::SectionId.eq(section_id))
                    .count(txn)
                    .await?;
                if references > 0 {
                    return Err(RegistrarError::DependencyConflict(format!(
                        "section has {references} registration(s) and cannot be deleted"
                    )));
                }

                section.delete(txn).await?;
                Ok(())
            })
        })
        .await
        .map_err(RegistrarError::from)
    }

    pub async fn create_assessment<C>(
        db: &C,
        section_id: Uuid,
        title: &str,
        max_score: f64,
    ) -> Result<assessment::Model>
    where
        C: ConnectionTrait,
    {
        section::Entity::find_by_id(section_id)
            .one(db)
            .await?
            .ok_or(RegistrarError::SectionNotFound(section_id))?;

        Ok(assessment::ActiveModel {
            id: Set(Uuid::new_v4()),
            section_id: Set(section_id),
            title: Set(title.to_string()),
            max_score: Set(max_score),
            created_at: Set(Utc::now().naive_utc()),
        }
        .insert(db)
        .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::enrollment::EnrollmentService;
    use crate::test_support;

    #[tokio::test]
    async fn test_delete_section_with_registrations_is_refused() {
        let db = test_support::connect().await;
        let student = test_support::seed_student(&db, "Ada Lovelace").await;
        let dept = test_support::seed_department(&db, "CS").await;
        let course = test_support::seed_course(&db, &dept, "CS1000", 4).await;
        let semester = test_support::open_semester(&db).await;
        let section = test_support::seed_section(&db, &course, &semester, 30).await;

        EnrollmentService::register(&db, student.id, section.id)
            .await
            .unwrap();

        let err = CatalogService::delete_section(&db, section.id)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrarError::DependencyConflict(_)));

        // A dropped registration still counts as history
        EnrollmentService::drop_registration(&db, student.id, section.id)
            .await
            .unwrap();
        let err = CatalogService::delete_section(&db, section.id)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrarError::DependencyConflict(_)));
    }

    #[tokio::test]
    async fn test_delete_unreferenced_section_succeeds() {
        let db = test_support::connect().await;
        let dept = test_support::seed_department(&db, "CS").await;
        let course = test_support::seed_course(&db, &dept, "CS1000", 4).await;
        let semester = test_support::open_semester(&db).await;
        let section = test_support::seed_section(&db, &course, &semester, 30).await;

        CatalogService::delete_section(&db, section.id).await.unwrap();

        let err = CatalogService::get_section(&db, section.id)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrarError::SectionNotFound(_)));
    }

    #[tokio::test]
    async fn test_course_pagination_and_department_filter() {
        let db = test_support::connect().await;
        let cs = test_support::seed_department(&db, "CS").await;
        let math = test_support::seed_department(&db, "MATH").await;

        for idx in 0..3 {
            test_support::seed_course(&db, &cs, &format!("CS10{idx}"), 4).await;
        }
        test_support::seed_course(&db, &math, "MATH101", 4).await;

        let (page, total) = CatalogService::get_courses_paginated(&db, 1, 2, None, None)
            .await
            .unwrap();
        assert_eq!(total, 4);
        assert_eq!(page.len(), 2);

        let (only_math, total) = CatalogService::get_courses_paginated(
            &db,
            1,
            20,
            None,
            Some(vec!["MATH".to_string()]),
        )
        .await
        .unwrap();
        assert_eq!(total, 1);
        assert_eq!(only_math[0].code, "MATH101");
    }

    #[tokio::test]
    async fn test_self_prerequisite_is_rejected() {
        let db = test_support::connect().await;
        let dept = test_support::seed_department(&db, "CS").await;
        let course = test_support::seed_course(&db, &dept, "CS1000", 4).await;

        let err = CatalogService::add_prerequisite(&db, course.id, course.id)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrarError::DependencyConflict(_)));
    }

    #[tokio::test]
    async fn test_duplicate_prerequisite_is_rejected() {
        let db = test_support::connect().await;
        let dept = test_support::seed_department(&db, "CS").await;
        let intro = test_support::seed_course(&db, &dept, "CS1000", 4).await;
        let advanced = test_support::seed_course(&db, &dept, "CS2000", 4).await;

        CatalogService::add_prerequisite(&db, advanced.id, intro.id)
            .await
            .unwrap();
        let err = CatalogService::add_prerequisite(&db, advanced.id, intro.id)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrarError::DependencyConflict(_)));
    }
}
