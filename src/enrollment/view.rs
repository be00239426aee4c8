//! Pure derivation of a user's enrollment state from a course snapshot.

use crate::types::{Course, CourseDetail, CourseRole, CourseVisibility, MembershipStatus};

/// The join action a non-member may take on a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinAction {
    /// Public course: joining enrolls immediately.
    Join,
    /// Restricted course with join requests enabled: joining files a
    /// request that a teacher reviews.
    RequestToJoin,
}

/// A user's relationship to one course, derived from a snapshot.
///
/// Recomputed from scratch on every snapshot and never cached across
/// them; deriving twice from the same snapshot yields equal views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrollmentView {
    /// Own membership status, `None` for non-members.
    pub status: Option<MembershipStatus>,
    /// Own role, `None` for non-members.
    pub role: Option<CourseRole>,
    /// Whether this user is a teacher and the course has at most one
    /// enrolled teacher. Always false for non-teachers.
    pub is_last_teacher: bool,
}

impl EnrollmentView {
    /// The join action available to this user, if any.
    ///
    /// Only non-members get one. Restricted courses without join
    /// requests and private courses surface nothing.
    pub fn join_action(&self, course: &Course) -> Option<JoinAction> {
        if self.status.is_some() {
            return None;
        }
        match course.visibility {
            CourseVisibility::Public => Some(JoinAction::Join),
            CourseVisibility::Restricted if course.allow_join_requests => {
                Some(JoinAction::RequestToJoin)
            }
            CourseVisibility::Restricted | CourseVisibility::Private => None,
        }
    }

    /// Whether leaving the course is permitted from this state.
    pub fn can_leave(&self) -> bool {
        self.status == Some(MembershipStatus::Enrolled) && !self.is_last_teacher
    }

    /// Whether a pending join request can be withdrawn.
    pub fn can_cancel_request(&self) -> bool {
        self.status == Some(MembershipStatus::Pending)
    }
}

/// Derive the current user's [`EnrollmentView`] from a snapshot.
///
/// `is_last_teacher` is true iff the user's own role is teacher and the
/// course counts at most one membership with role teacher and status
/// enrolled.
pub fn derive_view(detail: &CourseDetail, user_id: i64) -> EnrollmentView {
    let own = detail.membership_of(user_id);
    let role = own.map(|m| m.role);
    let is_last_teacher =
        role == Some(CourseRole::Teacher) && detail.enrolled_teacher_count() <= 1;

    EnrollmentView {
        status: own.map(|m| m.status),
        role,
        is_last_teacher,
    }
}
