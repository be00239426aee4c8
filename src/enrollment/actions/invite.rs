use crate::repository::{InviteMember, MembershipRepository};
use crate::types::{CourseDetail, CourseMembership, CourseRole};
use crate::CourseError;

/// Configuration for course invitations.
#[derive(Debug, Clone)]
pub struct InviteConfig {
    /// Role assigned when the inviter does not name one. Default: student
    pub default_role: CourseRole,
}

impl Default for InviteConfig {
    fn default() -> Self {
        Self {
            default_role: CourseRole::Student,
        }
    }
}

/// Action to invite a user into a course.
///
/// This action:
/// 1. Verifies the acting user is an enrolled teacher of the course
/// 2. Rejects users who already hold a membership row
/// 3. Creates the membership with status invited
///
/// Accepting or declining an invitation is not part of this engine; the
/// row stays invited until a teacher reviews it or removes it.
pub struct InviteMemberAction<M>
where
    M: MembershipRepository,
{
    membership_repo: M,
    config: InviteConfig,
}

impl<M: MembershipRepository> InviteMemberAction<M> {
    /// Creates a new `InviteMemberAction` with default configuration.
    pub fn new(membership_repo: M) -> Self {
        Self {
            membership_repo,
            config: InviteConfig::default(),
        }
    }

    /// Creates a new `InviteMemberAction` with custom configuration.
    pub fn with_config(membership_repo: M, config: InviteConfig) -> Self {
        Self {
            membership_repo,
            config,
        }
    }

    /// Invites `user_id` into the course in the snapshot.
    ///
    /// # Returns
    ///
    /// - `Ok(membership)` - Created with status invited
    /// - `Err(CourseError::Forbidden)` - Acting user is not a course teacher
    /// - `Err(CourseError::AlreadyMember)` - A membership row already exists
    /// - `Err(_)` - Backend or other errors
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "invite_member", skip_all, err)
    )]
    pub async fn execute(
        &self,
        detail: &CourseDetail,
        acting_user_id: i64,
        user_id: i64,
        role: Option<CourseRole>,
    ) -> Result<CourseMembership, CourseError> {
        if !detail.is_course_teacher(acting_user_id) {
            return Err(CourseError::Forbidden);
        }

        if detail.membership_of(user_id).is_some() {
            return Err(CourseError::AlreadyMember);
        }

        let role = role.unwrap_or(self.config.default_role);
        let membership = self
            .membership_repo
            .invite(detail.course.id, InviteMember { user_id, role })
            .await?;

        log::info!(
            target: "cohort_courses",
            "msg=\"member invited\", course_id={}, user_id={}, role=\"{}\", invited_by={}",
            detail.course.id,
            user_id,
            membership.role.as_str(),
            acting_user_id
        );

        Ok(membership)
    }
}
