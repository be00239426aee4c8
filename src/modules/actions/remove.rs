use crate::repository::ModuleRepository;
use crate::types::CourseDetail;
use crate::CourseError;

/// Action to remove a content module from a course.
///
/// Orders of the remaining modules are left untouched; the sequence is
/// gap-tolerant and only relative order matters.
pub struct RemoveModuleAction<R>
where
    R: ModuleRepository,
{
    module_repo: R,
}

impl<R: ModuleRepository> RemoveModuleAction<R> {
    pub fn new(module_repo: R) -> Self {
        Self { module_repo }
    }

    /// Removes module `module_id` from the course in the snapshot.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "remove_module", skip_all, err)
    )]
    pub async fn execute(
        &self,
        detail: &CourseDetail,
        acting_user_id: i64,
        module_id: i64,
    ) -> Result<(), CourseError> {
        if !detail.is_course_teacher(acting_user_id) {
            return Err(CourseError::Forbidden);
        }

        if !detail.modules.iter().any(|m| m.id == module_id) {
            return Err(CourseError::ModuleNotFound);
        }

        self.module_repo.delete(detail.course.id, module_id).await?;

        log::info!(
            target: "cohort_courses",
            "msg=\"module removed\", course_id={}, module_id={}, by={}",
            detail.course.id,
            module_id,
            acting_user_id
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockCourseBackend;
    use crate::repository::CourseRepository;
    use crate::types::{CourseRole, CourseVisibility, MembershipStatus};

    #[tokio::test]
    async fn test_remove_module_keeps_remaining_orders() {
        let backend = MockCourseBackend::new();
        let course = backend.seed_course("Astronomy", CourseVisibility::Public, false);
        backend.seed_member(course.id, 10, CourseRole::Teacher, MembershipStatus::Enrolled);
        let first = backend.seed_module(course.id, 0, "chat.chatroom", None);
        let second = backend.seed_module(course.id, 1, "slideshows.slideshow", None);
        let third = backend.seed_module(course.id, 2, "chat.chatroom", None);

        let detail = backend.fetch_detail(course.id).await.unwrap();
        let action = RemoveModuleAction::new(backend.clone());

        action.execute(&detail, 10, second.id).await.unwrap();

        // the gap at order 1 stays; relative order is what matters
        let refreshed = backend.fetch_detail(course.id).await.unwrap();
        let orders: Vec<(i64, u32)> = refreshed
            .modules_in_order()
            .iter()
            .map(|m| (m.id, m.order))
            .collect();
        assert_eq!(orders, vec![(first.id, 0), (third.id, 2)]);
    }

    #[tokio::test]
    async fn test_non_teacher_cannot_remove() {
        let backend = MockCourseBackend::new();
        let course = backend.seed_course("Astronomy", CourseVisibility::Public, false);
        backend.seed_member(course.id, 10, CourseRole::Teacher, MembershipStatus::Enrolled);
        backend.seed_member(course.id, 42, CourseRole::Student, MembershipStatus::Enrolled);
        let module = backend.seed_module(course.id, 0, "chat.chatroom", None);

        let detail = backend.fetch_detail(course.id).await.unwrap();
        let action = RemoveModuleAction::new(backend.clone());

        let result = action.execute(&detail, 42, module.id).await;
        assert!(matches!(result.unwrap_err(), CourseError::Forbidden));
    }

    #[tokio::test]
    async fn test_unknown_module() {
        let backend = MockCourseBackend::new();
        let course = backend.seed_course("Astronomy", CourseVisibility::Public, false);
        backend.seed_member(course.id, 10, CourseRole::Teacher, MembershipStatus::Enrolled);

        let detail = backend.fetch_detail(course.id).await.unwrap();
        let action = RemoveModuleAction::new(backend.clone());

        let result = action.execute(&detail, 10, 999).await;
        assert!(matches!(result.unwrap_err(), CourseError::ModuleNotFound));
    }
}
