use crate::repository::{CreateModule, ModuleRepository};
use crate::types::{CourseDetail, CourseModule};
use crate::CourseError;

/// Input data for creating a content module.
#[derive(Debug, Clone)]
pub struct NewModule {
    pub title: Option<String>,
    /// Explicit position; `None` lets the backend append at the end.
    pub order: Option<u32>,
    /// Dotted content reference, "app_label.model".
    pub content_type: String,
    pub object_id: i64,
}

/// Action to add a content module to a course.
///
/// This action:
/// 1. Verifies the acting user is an enrolled teacher of the course
/// 2. Validates the dotted content-type reference
/// 3. Refuses an explicit order another module already holds
/// 4. Creates the module; without an explicit order the backend appends
///    it at one past the highest existing order
pub struct AddModuleAction<R>
where
    R: ModuleRepository,
{
    module_repo: R,
}

impl<R: ModuleRepository> AddModuleAction<R> {
    pub fn new(module_repo: R) -> Self {
        Self { module_repo }
    }

    /// Adds `input` to the course in the snapshot.
    ///
    /// # Returns
    ///
    /// - `Ok(module)` - Created module with its assigned order
    /// - `Err(CourseError::Forbidden)` - Acting user is not a course teacher
    /// - `Err(CourseError::InvalidContentType)` - Reference is not dotted
    /// - `Err(CourseError::OrderConflict)` - Explicit order already taken
    /// - `Err(_)` - Backend or other errors
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "add_module", skip_all, err)
    )]
    pub async fn execute(
        &self,
        detail: &CourseDetail,
        acting_user_id: i64,
        input: NewModule,
    ) -> Result<CourseModule, CourseError> {
        if !detail.is_course_teacher(acting_user_id) {
            return Err(CourseError::Forbidden);
        }

        if !input.content_type.contains('.') {
            return Err(CourseError::InvalidContentType);
        }

        if let Some(order) = input.order {
            if detail.modules.iter().any(|m| m.order == order) {
                return Err(CourseError::OrderConflict);
            }
        }

        let module = self
            .module_repo
            .create(
                detail.course.id,
                CreateModule {
                    title: input.title,
                    order: input.order,
                    content_type: input.content_type,
                    object_id: input.object_id,
                },
            )
            .await?;

        log::info!(
            target: "cohort_courses",
            "msg=\"module created\", course_id={}, module_id={}, order={}, by={}",
            detail.course.id,
            module.id,
            module.order,
            acting_user_id
        );

        Ok(module)
    }
}
