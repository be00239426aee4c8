use crate::enrollment::view::{derive_view, JoinAction};
use crate::repository::MembershipRepository;
use crate::types::{CourseDetail, CourseMembership};
use crate::CourseError;

/// Action to join a course, or to request to join a restricted one.
///
/// This action:
/// 1. Rejects users who already hold a membership row of any status
/// 2. Derives the join action the course's visibility policy permits
/// 3. Issues the enroll call; the backend decides the resulting status
///
/// The membership returned carries the backend's decision (a restricted
/// course yields status pending, a public one enrolled); the caller must
/// re-fetch the course snapshot rather than patching it locally.
pub struct EnrollAction<M>
where
    M: MembershipRepository,
{
    membership_repo: M,
}

impl<M: MembershipRepository> EnrollAction<M> {
    /// Creates a new `EnrollAction`.
    pub fn new(membership_repo: M) -> Self {
        Self { membership_repo }
    }

    /// Joins the course in the snapshot as `user_id`.
    ///
    /// The repository acts as the authenticated user; `user_id` must
    /// identify that same user and is used for precondition checks only.
    ///
    /// # Returns
    ///
    /// - `Ok(membership)` - Created membership, status decided server-side
    /// - `Err(CourseError::AlreadyMember)` - A membership row already exists
    /// - `Err(CourseError::EnrollmentClosed)` - Policy offers no join action
    /// - `Err(_)` - Backend or other errors
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "enroll_in_course", skip_all, err)
    )]
    pub async fn execute(
        &self,
        detail: &CourseDetail,
        user_id: i64,
    ) -> Result<CourseMembership, CourseError> {
        // any existing row, whatever its status, blocks a second one
        if detail.membership_of(user_id).is_some() {
            return Err(CourseError::AlreadyMember);
        }

        let view = derive_view(detail, user_id);
        let action = view
            .join_action(&detail.course)
            .ok_or(CourseError::EnrollmentClosed)?;

        let membership = self.membership_repo.enroll(detail.course.id).await?;

        let kind = match action {
            JoinAction::Join => "joined",
            JoinAction::RequestToJoin => "requested to join",
        };
        log::info!(
            target: "cohort_courses",
            "msg=\"{} course\", course_id={}, user_id={}, status=\"{}\"",
            kind,
            detail.course.id,
            user_id,
            membership.status.as_str()
        );

        Ok(membership)
    }
}
