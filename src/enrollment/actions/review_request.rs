use crate::repository::{MembershipChanges, MembershipRepository};
use crate::types::{CourseDetail, MembershipStatus};
use crate::CourseError;

/// Outcome a teacher chooses for a pending or invited membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    /// Set the status to enrolled.
    Approve,
    /// Delete the membership row entirely.
    Deny,
}

/// Action to review a join request or an outstanding invitation.
///
/// This action:
/// 1. Verifies the acting user is an enrolled teacher of the course
/// 2. Locates the membership row in the snapshot
/// 3. Approves (status -> enrolled) or denies (row removed)
///
/// Denial deletes the row rather than marking it: a denied user may
/// request again later and the uniqueness constraint stays simple.
pub struct ReviewJoinRequestAction<M>
where
    M: MembershipRepository,
{
    membership_repo: M,
}

impl<M: MembershipRepository> ReviewJoinRequestAction<M> {
    pub fn new(membership_repo: M) -> Self {
        Self { membership_repo }
    }

    /// Applies `decision` to the membership row `membership_id`.
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Decision applied; re-fetch the snapshot
    /// - `Err(CourseError::Forbidden)` - Acting user is not a course teacher
    /// - `Err(CourseError::MembershipNotFound)` - No such row in this course
    /// - `Err(CourseError::AlreadyMember)` - The row is already enrolled
    /// - `Err(_)` - Backend or other errors
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "review_join_request", skip_all, err)
    )]
    pub async fn execute(
        &self,
        detail: &CourseDetail,
        acting_user_id: i64,
        membership_id: i64,
        decision: ReviewDecision,
    ) -> Result<(), CourseError> {
        if !detail.is_course_teacher(acting_user_id) {
            return Err(CourseError::Forbidden);
        }

        let membership = detail
            .members
            .iter()
            .find(|m| m.id == membership_id)
            .ok_or(CourseError::MembershipNotFound)?;

        match membership.status {
            MembershipStatus::Pending | MembershipStatus::Invited => {}
            MembershipStatus::Enrolled => return Err(CourseError::AlreadyMember),
        }

        match decision {
            ReviewDecision::Approve => {
                self.membership_repo
                    .update(
                        detail.course.id,
                        membership_id,
                        MembershipChanges {
                            role: None,
                            status: Some(MembershipStatus::Enrolled),
                        },
                    )
                    .await?;
                log::info!(
                    target: "cohort_courses",
                    "msg=\"membership approved\", course_id={}, membership_id={}, by={}",
                    detail.course.id,
                    membership_id,
                    acting_user_id
                );
            }
            ReviewDecision::Deny => {
                self.membership_repo
                    .remove(detail.course.id, membership_id)
                    .await?;
                log::info!(
                    target: "cohort_courses",
                    "msg=\"membership denied\", course_id={}, membership_id={}, by={}",
                    detail.course.id,
                    membership_id,
                    acting_user_id
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockCourseBackend;
    use crate::repository::CourseRepository;
    use crate::types::{CourseRole, CourseVisibility};

    fn seeded_backend() -> (MockCourseBackend, i64) {
        let backend = MockCourseBackend::new();
        let course = backend.seed_course("Topology", CourseVisibility::Restricted, true);
        backend.seed_member(course.id, 10, CourseRole::Teacher, MembershipStatus::Enrolled);
        (backend, course.id)
    }

    #[tokio::test]
    async fn test_approve_pending_request() {
        let (backend, course_id) = seeded_backend();
        let pending =
            backend.seed_member(course_id, 42, CourseRole::Student, MembershipStatus::Pending);

        let detail = backend.fetch_detail(course_id).await.unwrap();
        let action = ReviewJoinRequestAction::new(backend.clone());

        action
            .execute(&detail, 10, pending.id, ReviewDecision::Approve)
            .await
            .unwrap();

        let refreshed = backend.fetch_detail(course_id).await.unwrap();
        assert_eq!(
            refreshed.membership_of(42).unwrap().status,
            MembershipStatus::Enrolled
        );
    }

    #[tokio::test]
    async fn test_deny_removes_the_row() {
        let (backend, course_id) = seeded_backend();
        let pending =
            backend.seed_member(course_id, 42, CourseRole::Student, MembershipStatus::Pending);

        let detail = backend.fetch_detail(course_id).await.unwrap();
        let action = ReviewJoinRequestAction::new(backend.clone());

        action
            .execute(&detail, 10, pending.id, ReviewDecision::Deny)
            .await
            .unwrap();

        let refreshed = backend.fetch_detail(course_id).await.unwrap();
        assert!(refreshed.membership_of(42).is_none());
    }

    #[tokio::test]
    async fn test_approve_invited_row() {
        let (backend, course_id) = seeded_backend();
        let invited =
            backend.seed_member(course_id, 42, CourseRole::Assistant, MembershipStatus::Invited);

        let detail = backend.fetch_detail(course_id).await.unwrap();
        let action = ReviewJoinRequestAction::new(backend.clone());

        action
            .execute(&detail, 10, invited.id, ReviewDecision::Approve)
            .await
            .unwrap();

        let refreshed = backend.fetch_detail(course_id).await.unwrap();
        let row = refreshed.membership_of(42).unwrap();
        assert_eq!(row.status, MembershipStatus::Enrolled);
        // role set at invite time is preserved by approval
        assert_eq!(row.role, CourseRole::Assistant);
    }

    #[tokio::test]
    async fn test_non_teacher_cannot_review() {
        let (backend, course_id) = seeded_backend();
        backend.seed_member(course_id, 20, CourseRole::Student, MembershipStatus::Enrolled);
        let pending =
            backend.seed_member(course_id, 42, CourseRole::Student, MembershipStatus::Pending);

        let detail = backend.fetch_detail(course_id).await.unwrap();
        let action = ReviewJoinRequestAction::new(backend.clone());

        let result = action
            .execute(&detail, 20, pending.id, ReviewDecision::Approve)
            .await;
        assert!(matches!(result.unwrap_err(), CourseError::Forbidden));
    }

    #[tokio::test]
    async fn test_reviewing_enrolled_row_rejected() {
        let (backend, course_id) = seeded_backend();
        let enrolled =
            backend.seed_member(course_id, 42, CourseRole::Student, MembershipStatus::Enrolled);

        let detail = backend.fetch_detail(course_id).await.unwrap();
        let action = ReviewJoinRequestAction::new(backend.clone());

        let result = action
            .execute(&detail, 10, enrolled.id, ReviewDecision::Deny)
            .await;
        assert!(matches!(result.unwrap_err(), CourseError::AlreadyMember));
    }

    #[tokio::test]
    async fn test_unknown_membership() {
        let (backend, course_id) = seeded_backend();

        let detail = backend.fetch_detail(course_id).await.unwrap();
        let action = ReviewJoinRequestAction::new(backend.clone());

        let result = action
            .execute(&detail, 10, 999, ReviewDecision::Approve)
            .await;
        assert!(matches!(result.unwrap_err(), CourseError::MembershipNotFound));
    }
}
