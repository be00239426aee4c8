//! Repository traits describing the external course backend.
//!
//! The core performs no I/O of its own: every network operation goes
//! through one of these seams. Implement them against your transport
//! (the `http` feature ships a reqwest-backed implementation) or use
//! [`MockCourseBackend`] from the `mocks` feature in tests.
//!
//! Two contracts every implementation must honor:
//!
//! - **Server-authoritative results.** The status of a membership created
//!   by [`MembershipRepository::enroll`] is decided by the backend from
//!   the course's join policy; callers must not assume it client-side.
//! - **Append default.** [`ModuleRepository::create`] with `order: None`
//!   appends at one past the course's highest existing order.
//!
//! [`MockCourseBackend`]: crate::mocks::MockCourseBackend

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::{CourseDetail, CourseMembership, CourseModule, CourseRole, MembershipStatus};
use crate::CourseError;

/// Payload for inviting a user into a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteMember {
    #[serde(rename = "user")]
    pub user_id: i64,
    pub role: CourseRole,
}

/// Partial update of a membership row. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MembershipChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<CourseRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MembershipStatus>,
}

/// Payload for creating a content module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateModule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Explicit position; `None` appends at the end of the list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    /// Dotted content reference, "app_label.model".
    pub content_type: String,
    pub object_id: i64,
}

/// Partial update of a module. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<i64>,
}

impl ModuleChanges {
    /// An update touching only the order field, as used by reorder swaps.
    pub fn order(order: u32) -> Self {
        Self {
            order: Some(order),
            ..Self::default()
        }
    }
}

/// Read access to course snapshots.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Fetch the full detail snapshot: attributes, members, modules.
    async fn fetch_detail(&self, course_id: i64) -> Result<CourseDetail, CourseError>;
}

/// Membership lifecycle operations.
///
/// `enroll` and `leave` act on the authenticated user's own membership;
/// the remaining operations are the teacher-side management surface and
/// address rows by membership id.
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Join or request to join a course. The backend decides the
    /// resulting status from the course's visibility policy.
    async fn enroll(&self, course_id: i64) -> Result<CourseMembership, CourseError>;

    /// Remove the authenticated user's own membership row. Backs both
    /// leaving a course and withdrawing a pending join request.
    async fn leave(&self, course_id: i64) -> Result<(), CourseError>;

    /// Create a membership with status invited.
    async fn invite(
        &self,
        course_id: i64,
        data: InviteMember,
    ) -> Result<CourseMembership, CourseError>;

    /// Partially update a membership's role or status.
    async fn update(
        &self,
        course_id: i64,
        membership_id: i64,
        changes: MembershipChanges,
    ) -> Result<CourseMembership, CourseError>;

    /// Delete a membership row.
    async fn remove(&self, course_id: i64, membership_id: i64) -> Result<(), CourseError>;
}

/// Content module operations.
#[async_trait]
pub trait ModuleRepository: Send + Sync {
    async fn create(
        &self,
        course_id: i64,
        data: CreateModule,
    ) -> Result<CourseModule, CourseError>;

    /// Partially update a module; used for both content edits and the
    /// order swaps issued by reordering.
    async fn update(
        &self,
        course_id: i64,
        module_id: i64,
        changes: ModuleChanges,
    ) -> Result<CourseModule, CourseError>;

    async fn delete(&self, course_id: i64, module_id: i64) -> Result<(), CourseError>;
}
