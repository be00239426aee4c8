//! Core types for courses, memberships, and content modules.
//!
//! Everything here is a plain snapshot type: the backend owns the data,
//! actions read an immutable [`CourseDetail`] and never patch it locally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who can see a course and how it can be joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseVisibility {
    /// Listed for everyone; joining enrolls immediately.
    Public,
    /// Listed for members; outsiders may request to join when the course
    /// allows join requests.
    Restricted,
    /// Invisible to non-members; invitation only.
    Private,
}

impl CourseVisibility {
    /// Convert to the wire/storage string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Restricted => "restricted",
            Self::Private => "private",
        }
    }

    /// Parse from the wire/storage string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "public" => Some(Self::Public),
            "restricted" => Some(Self::Restricted),
            "private" => Some(Self::Private),
            _ => None,
        }
    }
}

/// A member's role within a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseRole {
    Teacher,
    Student,
    Assistant,
}

impl CourseRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Teacher => "teacher",
            Self::Student => "student",
            Self::Assistant => "assistant",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "teacher" => Some(Self::Teacher),
            "student" => Some(Self::Student),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }
}

/// Where a membership sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    /// Join request awaiting teacher review.
    Pending,
    /// Full member.
    Enrolled,
    /// Invited by a teacher, not yet accepted.
    Invited,
}

impl MembershipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Enrolled => "enrolled",
            Self::Invited => "invited",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "enrolled" => Some(Self::Enrolled),
            "invited" => Some(Self::Invited),
            _ => None,
        }
    }
}

/// A course as reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Unique identifier.
    pub id: i64,
    /// Course title.
    pub title: String,
    /// Brief description.
    pub outline: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
    pub subject: Option<String>,
    /// Visibility policy.
    pub visibility: CourseVisibility,
    /// When the course opens to students.
    pub start_date: DateTime<Utc>,
    /// When the course ends, if scheduled.
    pub end_date: Option<DateTime<Utc>>,
    /// Whether the course is currently running.
    pub is_active: bool,
    /// Whether outsiders may request to join a restricted course.
    pub allow_join_requests: bool,
    /// Backend-annotated count of enrolled members. Derivations use the
    /// membership list, never this number.
    pub member_count: u32,
}

impl Course {
    /// Scheduled length of the course in minutes, 0 when open-ended.
    pub fn duration_minutes(&self) -> i64 {
        match self.end_date {
            Some(end) => (end - self.start_date).num_minutes(),
            None => 0,
        }
    }
}

/// Links a user to a course with a role and a lifecycle status.
///
/// At most one membership row exists per (user, course) pair; the
/// backend enforces the uniqueness constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseMembership {
    /// Unique identifier.
    pub id: i64,
    /// The member.
    #[serde(rename = "user")]
    pub user_id: i64,
    /// Display name of the member.
    pub user_name: String,
    /// The course this membership belongs to.
    #[serde(rename = "course")]
    pub course_id: i64,
    pub role: CourseRole,
    pub status: MembershipStatus,
}

/// An ordered reference to a piece of course content.
///
/// The content itself lives elsewhere; a module points at it through a
/// dotted `content_type` reference ("app_label.model") plus an object id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseModule {
    /// Unique identifier.
    pub id: i64,
    /// Owning course.
    #[serde(rename = "course")]
    pub course_id: i64,
    /// Optional display title.
    pub title: Option<String>,
    /// Position within the course's module list.
    pub order: u32,
    /// Dotted reference to the content model, e.g. "chat.chatroom".
    pub content_type: String,
    /// Id of the referenced content object.
    pub object_id: Option<i64>,
}

/// Full snapshot of one course: attributes, members, and modules.
///
/// Obtained from [`CourseRepository::fetch_detail`] and treated as
/// immutable; after any successful mutation the caller re-fetches rather
/// than patching this in place.
///
/// [`CourseRepository::fetch_detail`]: crate::repository::CourseRepository::fetch_detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    /// Every membership row of the course, all statuses.
    pub members: Vec<CourseMembership>,
    /// Every content module of the course, in storage order.
    pub modules: Vec<CourseModule>,
}

impl CourseDetail {
    /// The given user's membership row, if any.
    pub fn membership_of(&self, user_id: i64) -> Option<&CourseMembership> {
        self.members.iter().find(|m| m.user_id == user_id)
    }

    /// Number of memberships with role teacher and status enrolled.
    pub fn enrolled_teacher_count(&self) -> usize {
        self.members
            .iter()
            .filter(|m| m.role == CourseRole::Teacher && m.status == MembershipStatus::Enrolled)
            .count()
    }

    /// Whether the user is an enrolled teacher of this course.
    pub fn is_course_teacher(&self, user_id: i64) -> bool {
        self.membership_of(user_id).is_some_and(|m| {
            m.role == CourseRole::Teacher && m.status == MembershipStatus::Enrolled
        })
    }

    /// Whether the user is an enrolled member of this course, any role.
    pub fn is_course_member(&self, user_id: i64) -> bool {
        self.membership_of(user_id)
            .is_some_and(|m| m.status == MembershipStatus::Enrolled)
    }

    /// Whether removing or demoting this membership would leave the
    /// course without an enrolled teacher.
    pub fn is_last_enrolled_teacher(&self, membership: &CourseMembership) -> bool {
        if membership.role != CourseRole::Teacher {
            return false;
        }
        !self.members.iter().any(|m| {
            m.id != membership.id
                && m.role == CourseRole::Teacher
                && m.status == MembershipStatus::Enrolled
        })
    }

    /// The module list in canonical order.
    ///
    /// Storage order is never trusted; sorting is by (order, id) so a
    /// stored tie still yields a deterministic sequence.
    pub fn modules_in_order(&self) -> Vec<CourseModule> {
        let mut sorted = self.modules.clone();
        sorted.sort_by_key(|m| (m.order, m.id));
        sorted
    }

    /// The append position for a new module: one past the highest order.
    pub fn next_module_order(&self) -> u32 {
        self.modules
            .iter()
            .map(|m| m.order)
            .max()
            .map_or(0, |max| max + 1)
    }
}
