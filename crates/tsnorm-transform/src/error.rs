use thiserror::Error;
use tsnorm_tree::InvariantViolation;

/// Failure of a transformation hook.
///
/// Unsupported shapes, name conflicts and resolution cycles are handled inside
/// the passes and never surface here. What does surface is fatal: continuing
/// would silently change the meaning of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

pub type TransformResult<T> = Result<T, TransformError>;
