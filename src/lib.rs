//! Course enrollment lifecycle and module ordering over a pluggable
//! course backend.
//!
//! The crate is the rule-driven core of a learning platform's course
//! subsystem. It owns two things:
//!
//! - the **enrollment policy engine**: which join/leave actions a user's
//!   current membership and the course's visibility policy permit, and
//!   the execution of those transitions, including the last-teacher
//!   protection;
//! - the **module order manager**: keeping a course's content modules in
//!   a strict total order through swap-based reordering and
//!   duplicate-order refusal.
//!
//! All data is owned by an external backend reached through the
//! [`repository`] traits. Actions read an immutable [`CourseDetail`]
//! snapshot, check every precondition before issuing a call, and never
//! patch local state on success: the caller re-fetches the snapshot
//! after every success the core reports. That re-fetch is the sole
//! synchronization mechanism against concurrent changes from other
//! sessions.
//!
//! The engine does not de-duplicate concurrent calls; callers are
//! expected to keep at most one action in flight per (user, course) and
//! to suppress re-invocation while one is pending.

pub mod enrollment;
pub mod modules;
pub mod repository;
pub mod types;

#[cfg(feature = "http")]
pub mod http;
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

pub use enrollment::{
    derive_view, CancelJoinRequestAction, ChangeMemberRoleAction, EnrollAction, EnrollmentView,
    InviteConfig, InviteMemberAction, JoinAction, LeaveCourseAction, RemoveMemberAction,
    ReviewDecision, ReviewJoinRequestAction,
};
pub use modules::{
    content_type_label, AddModuleAction, EditModuleAction, MoveDirection, NewModule,
    RemoveModuleAction, ReorderModuleAction, ReorderOutcome,
};
pub use repository::{
    CourseRepository, CreateModule, InviteMember, MembershipChanges, MembershipRepository,
    ModuleChanges, ModuleRepository,
};
pub use types::{
    Course, CourseDetail, CourseMembership, CourseModule, CourseRole, CourseVisibility,
    MembershipStatus,
};

#[cfg(any(test, feature = "mocks"))]
pub use mocks::MockCourseBackend;

use std::fmt;

/// Everything that can go wrong inside the course core.
///
/// Policy violations are raised before any backend call is issued; the
/// backend never sees an operation the snapshot already rules out.
/// `Backend` wraps any collaborator failure — the core cannot tell a
/// partial reorder failure from a total one and reports both the same
/// way. No error here is fatal: prior state is untouched and the caller
/// may retry after a refetch.
#[derive(Debug, Clone, PartialEq)]
pub enum CourseError {
    CourseNotFound,
    MembershipNotFound,
    ModuleNotFound,
    /// A membership row for this (user, course) pair already exists.
    AlreadyMember,
    /// The course's visibility policy offers no join action.
    EnrollmentClosed,
    /// Leave requires an enrolled membership.
    NotEnrolled,
    /// Cancel requires a pending join request.
    NoPendingRequest,
    /// The operation would leave the course without an enrolled teacher.
    LastTeacher,
    /// The acting user is not an enrolled teacher of the course.
    Forbidden,
    /// The order value is already taken by another module of the course.
    OrderConflict,
    /// The content reference is not a dotted "app_label.model" string.
    InvalidContentType,
    /// The backend rejected or failed the call.
    Backend(String),
}

impl std::error::Error for CourseError {}

impl fmt::Display for CourseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CourseError::CourseNotFound => write!(f, "Course not found"),
            CourseError::MembershipNotFound => write!(f, "Membership not found"),
            CourseError::ModuleNotFound => write!(f, "Module not found"),
            CourseError::AlreadyMember => {
                write!(f, "User is already a member of this course")
            }
            CourseError::EnrollmentClosed => {
                write!(f, "This course does not allow joining")
            }
            CourseError::NotEnrolled => write!(f, "Not an enrolled member of this course"),
            CourseError::NoPendingRequest => {
                write!(f, "No pending join request for this course")
            }
            CourseError::LastTeacher => {
                write!(f, "Cannot remove the last teacher in the course")
            }
            CourseError::Forbidden => {
                write!(f, "Only course teachers can perform this action")
            }
            CourseError::OrderConflict => {
                write!(f, "Another module already holds this order")
            }
            CourseError::InvalidContentType => {
                write!(f, "Content type must be in the format 'app_label.model'")
            }
            CourseError::Backend(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}
