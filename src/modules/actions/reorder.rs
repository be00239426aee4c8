use crate::repository::{ModuleChanges, ModuleRepository};
use crate::types::CourseModule;
use crate::CourseError;

/// Direction to move a module within its course's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// What a reorder call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// The module and its neighbor exchanged order values.
    Moved,
    /// The module was already first (up) or last (down); nothing was
    /// issued. A defined boundary outcome, not an error.
    AlreadyAtEdge,
}

/// Action to move a module one position up or down.
///
/// This action:
/// 1. Sorts the given modules into canonical order — input order is
///    never trusted
/// 2. Locates the module and its neighbor in the move direction
/// 3. Issues two concurrent partial updates that exchange the two
///    `order` values
///
/// The swap is best-effort, not atomic: when one of the two updates
/// fails the course is left in an intermediate state until the next
/// re-fetch, and the whole reorder should be retried. The failure is
/// reported like any other backend failure — the core cannot tell a
/// partial failure from a total one.
pub struct ReorderModuleAction<R>
where
    R: ModuleRepository,
{
    module_repo: R,
}

impl<R: ModuleRepository> ReorderModuleAction<R> {
    pub fn new(module_repo: R) -> Self {
        Self { module_repo }
    }

    /// Moves `module_id` one position in `direction`.
    ///
    /// # Returns
    ///
    /// - `Ok(ReorderOutcome::Moved)` - Both updates succeeded; re-fetch
    /// - `Ok(ReorderOutcome::AlreadyAtEdge)` - Boundary no-op, no calls issued
    /// - `Err(CourseError::ModuleNotFound)` - `module_id` is not in `modules`
    /// - `Err(_)` - One or both updates failed; re-fetch before retrying
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "reorder_module", skip_all, err)
    )]
    pub async fn execute(
        &self,
        modules: &[CourseModule],
        module_id: i64,
        direction: MoveDirection,
    ) -> Result<ReorderOutcome, CourseError> {
        let mut sequence: Vec<&CourseModule> = modules.iter().collect();
        sequence.sort_by_key(|m| (m.order, m.id));

        let idx = sequence
            .iter()
            .position(|m| m.id == module_id)
            .ok_or(CourseError::ModuleNotFound)?;

        let swap_idx = match direction {
            MoveDirection::Up => idx.checked_sub(1),
            MoveDirection::Down => (idx + 1 < sequence.len()).then_some(idx + 1),
        };
        let Some(swap_idx) = swap_idx else {
            return Ok(ReorderOutcome::AlreadyAtEdge);
        };

        let moved = sequence[idx];
        let neighbor = sequence[swap_idx];

        // two independent calls, no ordering between them; the swap
        // succeeded only if both did
        let (first, second) = tokio::join!(
            self.module_repo.update(
                moved.course_id,
                moved.id,
                ModuleChanges::order(neighbor.order)
            ),
            self.module_repo.update(
                neighbor.course_id,
                neighbor.id,
                ModuleChanges::order(moved.order)
            ),
        );
        first?;
        second?;

        log::info!(
            target: "cohort_courses",
            "msg=\"module reordered\", course_id={}, module_id={}, swapped_with={}",
            moved.course_id,
            moved.id,
            neighbor.id
        );

        Ok(ReorderOutcome::Moved)
    }
}
