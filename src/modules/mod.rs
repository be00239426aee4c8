//! Module order manager: keeps a course's content modules in a strict
//! total order and mediates teacher-side module changes.
//!
//! Reordering is swap-based: moving a module one position exchanges its
//! `order` value with its neighbor through two concurrent partial
//! updates. The operation is best-effort — if one of the two updates
//! fails, the course is left in an intermediate state until the next
//! re-fetch, and retrying the whole reorder is the recovery path.

mod actions;
mod label;

pub use actions::{
    AddModuleAction, EditModuleAction, MoveDirection, NewModule, RemoveModuleAction,
    ReorderModuleAction, ReorderOutcome,
};
pub use label::content_type_label;
