//! Enrollment policy engine: who may join, leave, or manage a course's
//! members, and the execution of those transitions.
//!
//! [`derive_view`] computes a user's permitted actions from a
//! [`CourseDetail`] snapshot; the action structs execute one transition
//! each against the backend. Every action checks its preconditions
//! against the snapshot before issuing a call and signals success by
//! returning `Ok` — at which point the snapshot is stale and the caller
//! must re-fetch it.
//!
//! [`CourseDetail`]: crate::types::CourseDetail

mod actions;
mod view;

pub use actions::{
    CancelJoinRequestAction, ChangeMemberRoleAction, EnrollAction, InviteConfig,
    InviteMemberAction, LeaveCourseAction, RemoveMemberAction, ReviewDecision,
    ReviewJoinRequestAction,
};
pub use view::{derive_view, EnrollmentView, JoinAction};
