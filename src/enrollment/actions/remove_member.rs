use crate::repository::MembershipRepository;
use crate::types::CourseDetail;
use crate::CourseError;

/// Action to remove a member from a course.
///
/// Removing the last enrolled teacher is refused before any backend
/// call, mirroring the guard on leaving and on demotion.
pub struct RemoveMemberAction<M>
where
    M: MembershipRepository,
{
    membership_repo: M,
}

impl<M: MembershipRepository> RemoveMemberAction<M> {
    pub fn new(membership_repo: M) -> Self {
        Self { membership_repo }
    }

    /// Removes membership `membership_id` from the course in the snapshot.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "remove_member", skip_all, err)
    )]
    pub async fn execute(
        &self,
        detail: &CourseDetail,
        acting_user_id: i64,
        membership_id: i64,
    ) -> Result<(), CourseError> {
        if !detail.is_course_teacher(acting_user_id) {
            return Err(CourseError::Forbidden);
        }

        let membership = detail
            .members
            .iter()
            .find(|m| m.id == membership_id)
            .ok_or(CourseError::MembershipNotFound)?;

        if detail.is_last_enrolled_teacher(membership) {
            return Err(CourseError::LastTeacher);
        }

        self.membership_repo
            .remove(detail.course.id, membership_id)
            .await?;

        log::info!(
            target: "cohort_courses",
            "msg=\"member removed\", course_id={}, membership_id={}, by={}",
            detail.course.id,
            membership_id,
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

    fn seeded_backend() -> (MockCourseBackend, i64) {
        let backend = MockCourseBackend::new();
        let course = backend.seed_course("Astronomy", CourseVisibility::Public, false);
        backend.seed_member(course.id, 10, CourseRole::Teacher, MembershipStatus::Enrolled);
        (backend, course.id)
    }

    #[tokio::test]
    async fn test_remove_student() {
        let (backend, course_id) = seeded_backend();
        let student =
            backend.seed_member(course_id, 42, CourseRole::Student, MembershipStatus::Enrolled);

        let detail = backend.fetch_detail(course_id).await.unwrap();
        let action = RemoveMemberAction::new(backend.clone());

        action.execute(&detail, 10, student.id).await.unwrap();

        let refreshed = backend.fetch_detail(course_id).await.unwrap();
        assert!(refreshed.membership_of(42).is_none());
    }

    #[tokio::test]
    async fn test_cannot_remove_last_teacher() {
        let (backend, course_id) = seeded_backend();

        let detail = backend.fetch_detail(course_id).await.unwrap();
        let teacher_row = detail.membership_of(10).unwrap().id;
        let action = RemoveMemberAction::new(backend.clone());

        let result = action.execute(&detail, 10, teacher_row).await;
        assert!(matches!(result.unwrap_err(), CourseError::LastTeacher));
    }

    #[tokio::test]
    async fn test_remove_teacher_with_cover() {
        let (backend, course_id) = seeded_backend();
        backend.seed_member(course_id, 11, CourseRole::Teacher, MembershipStatus::Enrolled);

        let detail = backend.fetch_detail(course_id).await.unwrap();
        let teacher_row = detail.membership_of(10).unwrap().id;
        let action = RemoveMemberAction::new(backend.clone());

        action.execute(&detail, 11, teacher_row).await.unwrap();

        let refreshed = backend.fetch_detail(course_id).await.unwrap();
        assert!(refreshed.membership_of(10).is_none());
        assert!(refreshed.is_course_teacher(11));
    }

    #[tokio::test]
    async fn test_non_teacher_cannot_remove() {
        let (backend, course_id) = seeded_backend();
        backend.seed_member(course_id, 20, CourseRole::Student, MembershipStatus::Enrolled);
        let other =
            backend.seed_member(course_id, 42, CourseRole::Student, MembershipStatus::Enrolled);

        let detail = backend.fetch_detail(course_id).await.unwrap();
        let action = RemoveMemberAction::new(backend.clone());

        let result = action.execute(&detail, 20, other.id).await;
        assert!(matches!(result.unwrap_err(), CourseError::Forbidden));
    }
}
