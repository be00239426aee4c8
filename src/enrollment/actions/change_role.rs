use crate::repository::{MembershipChanges, MembershipRepository};
use crate::types::{CourseDetail, CourseMembership, CourseRole};
use crate::CourseError;

/// Action to change a member's role.
///
/// Demoting the last enrolled teacher is refused before any backend
/// call; every course keeps at least one enrolled teacher.
pub struct ChangeMemberRoleAction<M>
where
    M: MembershipRepository,
{
    membership_repo: M,
}

impl<M: MembershipRepository> ChangeMemberRoleAction<M> {
    pub fn new(membership_repo: M) -> Self {
        Self { membership_repo }
    }

    /// Sets the role of membership `membership_id` to `new_role`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "change_member_role", skip_all, err)
    )]
    pub async fn execute(
        &self,
        detail: &CourseDetail,
        acting_user_id: i64,
        membership_id: i64,
        new_role: CourseRole,
    ) -> Result<CourseMembership, CourseError> {
        if !detail.is_course_teacher(acting_user_id) {
            return Err(CourseError::Forbidden);
        }

        let membership = detail
            .members
            .iter()
            .find(|m| m.id == membership_id)
            .ok_or(CourseError::MembershipNotFound)?;

        if membership.role == CourseRole::Teacher
            && new_role != CourseRole::Teacher
            && detail.is_last_enrolled_teacher(membership)
        {
            return Err(CourseError::LastTeacher);
        }

        let updated = self
            .membership_repo
            .update(
                detail.course.id,
                membership_id,
                MembershipChanges {
                    role: Some(new_role),
                    status: None,
                },
            )
            .await?;

        log::info!(
            target: "cohort_courses",
            "msg=\"member role changed\", course_id={}, membership_id={}, role=\"{}\", by={}",
            detail.course.id,
            membership_id,
            new_role.as_str(),
            acting_user_id
        );

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockCourseBackend;
    use crate::repository::CourseRepository;
    use crate::types::{CourseVisibility, MembershipStatus};

    fn seeded_backend() -> (MockCourseBackend, i64) {
        let backend = MockCourseBackend::new();
        let course = backend.seed_course("Astronomy", CourseVisibility::Public, false);
        backend.seed_member(course.id, 10, CourseRole::Teacher, MembershipStatus::Enrolled);
        (backend, course.id)
    }

    #[tokio::test]
    async fn test_promote_student_to_assistant() {
        let (backend, course_id) = seeded_backend();
        let student =
            backend.seed_member(course_id, 42, CourseRole::Student, MembershipStatus::Enrolled);

        let detail = backend.fetch_detail(course_id).await.unwrap();
        let action = ChangeMemberRoleAction::new(backend.clone());

        let updated = action
            .execute(&detail, 10, student.id, CourseRole::Assistant)
            .await
            .unwrap();
        assert_eq!(updated.role, CourseRole::Assistant);
    }

    #[tokio::test]
    async fn test_cannot_demote_last_teacher() {
        let (backend, course_id) = seeded_backend();

        let detail = backend.fetch_detail(course_id).await.unwrap();
        let teacher_row = detail.membership_of(10).unwrap().id;
        let action = ChangeMemberRoleAction::new(backend.clone());

        let result = action
            .execute(&detail, 10, teacher_row, CourseRole::Student)
            .await;
        assert!(matches!(result.unwrap_err(), CourseError::LastTeacher));

        let refreshed = backend.fetch_detail(course_id).await.unwrap();
        assert!(refreshed.is_course_teacher(10));
    }

    #[tokio::test]
    async fn test_demote_teacher_with_cover() {
        let (backend, course_id) = seeded_backend();
        backend.seed_member(course_id, 11, CourseRole::Teacher, MembershipStatus::Enrolled);

        let detail = backend.fetch_detail(course_id).await.unwrap();
        let teacher_row = detail.membership_of(10).unwrap().id;
        let action = ChangeMemberRoleAction::new(backend.clone());

        let updated = action
            .execute(&detail, 10, teacher_row, CourseRole::Student)
            .await
            .unwrap();
        assert_eq!(updated.role, CourseRole::Student);
    }

    #[tokio::test]
    async fn test_non_teacher_cannot_change_roles() {
        let (backend, course_id) = seeded_backend();
        backend.seed_member(course_id, 20, CourseRole::Assistant, MembershipStatus::Enrolled);
        let student =
            backend.seed_member(course_id, 42, CourseRole::Student, MembershipStatus::Enrolled);

        let detail = backend.fetch_detail(course_id).await.unwrap();
        let action = ChangeMemberRoleAction::new(backend.clone());

        let result = action
            .execute(&detail, 20, student.id, CourseRole::Assistant)
            .await;
        assert!(matches!(result.unwrap_err(), CourseError::Forbidden));
    }
}
