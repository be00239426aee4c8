mod add;
mod edit;
mod remove;
mod reorder;

pub use add::{AddModuleAction, NewModule};
pub use edit::EditModuleAction;
pub use remove::RemoveModuleAction;
pub use reorder::{MoveDirection, ReorderModuleAction, ReorderOutcome};
