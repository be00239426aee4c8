mod cancel_request;
mod change_role;
mod enroll;
mod invite;
mod leave;
mod remove_member;
mod review_request;

pub use cancel_request::CancelJoinRequestAction;
pub use change_role::ChangeMemberRoleAction;
pub use enroll::EnrollAction;
pub use invite::{InviteConfig, InviteMemberAction};
pub use leave::LeaveCourseAction;
pub use remove_member::RemoveMemberAction;
pub use review_request::{ReviewDecision, ReviewJoinRequestAction};
