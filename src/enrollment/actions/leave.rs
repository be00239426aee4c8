use crate::enrollment::view::derive_view;
use crate::repository::MembershipRepository;
use crate::types::{CourseDetail, MembershipStatus};
use crate::CourseError;

/// Action to leave a course.
///
/// This action:
/// 1. Requires an enrolled membership in the snapshot
/// 2. Refuses when the user is the course's last enrolled teacher,
///    without issuing the removal call
/// 3. Removes the membership row
///
/// On success the snapshot is stale and the caller must re-fetch it.
pub struct LeaveCourseAction<M>
where
    M: MembershipRepository,
{
    membership_repo: M,
}

impl<M: MembershipRepository> LeaveCourseAction<M> {
    /// Creates a new `LeaveCourseAction`.
    pub fn new(membership_repo: M) -> Self {
        Self { membership_repo }
    }

    /// Leaves the course in the snapshot as `user_id`.
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Membership removed; re-fetch the snapshot
    /// - `Err(CourseError::MembershipNotFound)` - Not a member at all
    /// - `Err(CourseError::NotEnrolled)` - Pending or invited, not enrolled
    /// - `Err(CourseError::LastTeacher)` - Would strand the course
    /// - `Err(_)` - Backend or other errors
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "leave_course", skip_all, err)
    )]
    pub async fn execute(&self, detail: &CourseDetail, user_id: i64) -> Result<(), CourseError> {
        let membership = detail
            .membership_of(user_id)
            .ok_or(CourseError::MembershipNotFound)?;

        match membership.status {
            MembershipStatus::Enrolled => {}
            MembershipStatus::Pending | MembershipStatus::Invited => {
                return Err(CourseError::NotEnrolled);
            }
        }

        // precondition, not a server round-trip: the removal call is
        // never issued for the last enrolled teacher
        if derive_view(detail, user_id).is_last_teacher {
            return Err(CourseError::LastTeacher);
        }

        self.membership_repo.leave(detail.course.id).await?;

        log::info!(
            target: "cohort_courses",
            "msg=\"left course\", course_id={}, user_id={}",
            detail.course.id,
            user_id
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockCourseBackend;
    use crate::repository::CourseRepository;
    use crate::types::{CourseRole, CourseVisibility};

    #[tokio::test]
    async fn test_student_leaves_course() {
        let backend = MockCourseBackend::new();
        let course = backend.seed_course("Astronomy", CourseVisibility::Public, false);
        backend.seed_member(course.id, 10, CourseRole::Teacher, MembershipStatus::Enrolled);
        backend.seed_member(course.id, 42, CourseRole::Student, MembershipStatus::Enrolled);
        backend.sign_in(42);

        let detail = backend.fetch_detail(course.id).await.unwrap();
        let action = LeaveCourseAction::new(backend.clone());

        action.execute(&detail, 42).await.unwrap();

        let refreshed = backend.fetch_detail(course.id).await.unwrap();
        assert!(refreshed.membership_of(42).is_none());
    }

    #[tokio::test]
    async fn test_last_teacher_cannot_leave_and_no_call_is_issued() {
        let backend = MockCourseBackend::new();
        let course = backend.seed_course("Astronomy", CourseVisibility::Public, false);
        backend.seed_member(course.id, 10, CourseRole::Teacher, MembershipStatus::Enrolled);
        backend.seed_member(course.id, 42, CourseRole::Student, MembershipStatus::Enrolled);
        backend.sign_in(10);

        let detail = backend.fetch_detail(course.id).await.unwrap();
        let action = LeaveCourseAction::new(backend.clone());

        let result = action.execute(&detail, 10).await;
        assert!(matches!(result.unwrap_err(), CourseError::LastTeacher));
        // the engine refused before reaching the backend
        assert_eq!(backend.leave_calls(), 0);

        let refreshed = backend.fetch_detail(course.id).await.unwrap();
        assert!(refreshed.is_course_teacher(10));
    }

    #[tokio::test]
    async fn test_teacher_with_cover_can_leave() {
        let backend = MockCourseBackend::new();
        let course = backend.seed_course("Astronomy", CourseVisibility::Public, false);
        backend.seed_member(course.id, 10, CourseRole::Teacher, MembershipStatus::Enrolled);
        backend.seed_member(course.id, 11, CourseRole::Teacher, MembershipStatus::Enrolled);
        backend.sign_in(10);

        let detail = backend.fetch_detail(course.id).await.unwrap();
        let action = LeaveCourseAction::new(backend.clone());

        action.execute(&detail, 10).await.unwrap();

        let refreshed = backend.fetch_detail(course.id).await.unwrap();
        assert!(refreshed.membership_of(10).is_none());
        assert!(refreshed.is_course_teacher(11));
    }

    #[tokio::test]
    async fn test_pending_member_cannot_leave() {
        let backend = MockCourseBackend::new();
        let course = backend.seed_course("Topology", CourseVisibility::Restricted, true);
        backend.seed_member(course.id, 42, CourseRole::Student, MembershipStatus::Pending);
        backend.sign_in(42);

        let detail = backend.fetch_detail(course.id).await.unwrap();
        let action = LeaveCourseAction::new(backend.clone());

        let result = action.execute(&detail, 42).await;
        assert!(matches!(result.unwrap_err(), CourseError::NotEnrolled));
        assert_eq!(backend.leave_calls(), 0);
    }

    #[tokio::test]
    async fn test_non_member_cannot_leave() {
        let backend = MockCourseBackend::new();
        let course = backend.seed_course("Astronomy", CourseVisibility::Public, false);
        backend.sign_in(42);

        let detail = backend.fetch_detail(course.id).await.unwrap();
        let action = LeaveCourseAction::new(backend.clone());

        let result = action.execute(&detail, 42).await;
        assert!(matches!(result.unwrap_err(), CourseError::MembershipNotFound));
    }
}
