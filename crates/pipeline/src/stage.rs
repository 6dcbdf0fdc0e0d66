//! The pipeline stage contract.

use async_trait::async_trait;
use persona_core::context::PipelineContext;

use crate::error::PipelineError;

/// One unit of pipeline work with a fixed position in the execution order.
///
/// A stage may read any previously populated context field, must populate
/// the field(s) it owns, and must fail fast with a [`PipelineError::Stage`]
/// error when a documented precondition is unmet. Stages must not assume
/// anything about prior stages beyond the documented ordering.
#[async_trait]
pub trait PipelineStage: Send + Sync {
    /// Stable stage name used in failure messages and logs.
    fn name(&self) -> &'static str;

    /// Execute the stage against the shared context.
    async fn run(&self, context: &mut PipelineContext) -> Result<(), PipelineError>;
}

/// Wrap a capability failure with the failing stage's identity.
pub(crate) fn stage_error(
    stage: &'static str,
    err: impl std::fmt::Display,
) -> PipelineError {
    PipelineError::Stage {
        stage,
        message: err.to_string(),
    }
}
