use crate::repository::MembershipRepository;
use crate::types::{CourseDetail, MembershipStatus};
use crate::CourseError;

/// Action to withdraw a pending join request.
///
/// Uses the same underlying removal operation as leaving a course; the
/// precondition differs — the snapshot must show a pending row.
pub struct CancelJoinRequestAction<M>
where
    M: MembershipRepository,
{
    membership_repo: M,
}

impl<M: MembershipRepository> CancelJoinRequestAction<M> {
    pub fn new(membership_repo: M) -> Self {
        Self { membership_repo }
    }

    /// Withdraws `user_id`'s pending request for the course in the snapshot.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "cancel_join_request", skip_all, err)
    )]
    pub async fn execute(&self, detail: &CourseDetail, user_id: i64) -> Result<(), CourseError> {
        let membership = detail
            .membership_of(user_id)
            .ok_or(CourseError::MembershipNotFound)?;

        match membership.status {
            MembershipStatus::Pending => {}
            MembershipStatus::Enrolled | MembershipStatus::Invited => {
                return Err(CourseError::NoPendingRequest);
            }
        }

        self.membership_repo.leave(detail.course.id).await?;

        log::info!(
            target: "cohort_courses",
            "msg=\"join request withdrawn\", course_id={}, user_id={}",
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
    async fn test_cancel_pending_request() {
        let backend = MockCourseBackend::new();
        let course = backend.seed_course("Topology", CourseVisibility::Restricted, true);
        backend.seed_member(course.id, 42, CourseRole::Student, MembershipStatus::Pending);
        backend.sign_in(42);

        let detail = backend.fetch_detail(course.id).await.unwrap();
        let action = CancelJoinRequestAction::new(backend.clone());

        action.execute(&detail, 42).await.unwrap();

        let refreshed = backend.fetch_detail(course.id).await.unwrap();
        assert!(refreshed.membership_of(42).is_none());
    }

    #[tokio::test]
    async fn test_cancel_without_pending_request() {
        let backend = MockCourseBackend::new();
        let course = backend.seed_course("Astronomy", CourseVisibility::Public, false);
        backend.seed_member(course.id, 42, CourseRole::Student, MembershipStatus::Enrolled);
        backend.sign_in(42);

        let detail = backend.fetch_detail(course.id).await.unwrap();
        let action = CancelJoinRequestAction::new(backend.clone());

        let result = action.execute(&detail, 42).await;
        assert!(matches!(result.unwrap_err(), CourseError::NoPendingRequest));
        assert_eq!(backend.leave_calls(), 0);
    }

    #[tokio::test]
    async fn test_invited_member_cannot_cancel() {
        // invited rows have no member-side transition in this version
        let backend = MockCourseBackend::new();
        let course = backend.seed_course("Seminar", CourseVisibility::Private, false);
        backend.seed_member(course.id, 42, CourseRole::Student, MembershipStatus::Invited);
        backend.sign_in(42);

        let detail = backend.fetch_detail(course.id).await.unwrap();
        let action = CancelJoinRequestAction::new(backend.clone());

        let result = action.execute(&detail, 42).await;
        assert!(matches!(result.unwrap_err(), CourseError::NoPendingRequest));
    }

    #[tokio::test]
    async fn test_non_member_cannot_cancel() {
        let backend = MockCourseBackend::new();
        let course = backend.seed_course("Topology", CourseVisibility::Restricted, true);
        backend.sign_in(42);

        let detail = backend.fetch_detail(course.id).await.unwrap();
        let action = CancelJoinRequestAction::new(backend.clone());

        let result = action.execute(&detail, 42).await;
        assert!(matches!(result.unwrap_err(), CourseError::MembershipNotFound));
    }
}
