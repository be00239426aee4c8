use crate::repository::{ModuleChanges, ModuleRepository};
use crate::types::{CourseDetail, CourseModule};
use crate::CourseError;

/// Action to edit a content module's fields.
///
/// A module may keep its own current order; taking another module's
/// order is refused — reordering goes through the swap action instead.
pub struct EditModuleAction<R>
where
    R: ModuleRepository,
{
    module_repo: R,
}

impl<R: ModuleRepository> EditModuleAction<R> {
    pub fn new(module_repo: R) -> Self {
        Self { module_repo }
    }

    /// Applies `changes` to module `module_id`.
    ///
    /// # Returns
    ///
    /// - `Ok(module)` - Updated module
    /// - `Err(CourseError::Forbidden)` - Acting user is not a course teacher
    /// - `Err(CourseError::ModuleNotFound)` - No such module in this course
    /// - `Err(CourseError::InvalidContentType)` - Reference is not dotted
    /// - `Err(CourseError::OrderConflict)` - Order held by another module
    /// - `Err(_)` - Backend or other errors
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "edit_module", skip_all, err)
    )]
    pub async fn execute(
        &self,
        detail: &CourseDetail,
        acting_user_id: i64,
        module_id: i64,
        changes: ModuleChanges,
    ) -> Result<CourseModule, CourseError> {
        if !detail.is_course_teacher(acting_user_id) {
            return Err(CourseError::Forbidden);
        }

        if !detail.modules.iter().any(|m| m.id == module_id) {
            return Err(CourseError::ModuleNotFound);
        }

        if let Some(content_type) = &changes.content_type {
            if !content_type.contains('.') {
                return Err(CourseError::InvalidContentType);
            }
        }

        if let Some(order) = changes.order {
            if detail
                .modules
                .iter()
                .any(|m| m.id != module_id && m.order == order)
            {
                return Err(CourseError::OrderConflict);
            }
        }

        let module = self
            .module_repo
            .update(detail.course.id, module_id, changes)
            .await?;

        log::info!(
            target: "cohort_courses",
            "msg=\"module updated\", course_id={}, module_id={}, by={}",
            detail.course.id,
            module_id,
            acting_user_id
        );

        Ok(module)
    }
}
