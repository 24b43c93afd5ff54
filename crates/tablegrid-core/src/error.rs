//! Error types for table detection.

use std::collections::TryReserveError;

/// Errors that abort a detection stage.
///
/// Structural rejection (too few lines, a failed validation gate, an empty
/// page) is not an error; those outcomes are reported as `None` or an empty
/// table list.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// A growable buffer could not reserve memory.
    #[error("allocation failed while {context}")]
    AllocationFailure {
        context: &'static str,
        #[source]
        source: TryReserveError,
    },

    /// The rendering collaborator failed to replay the page.
    #[error("page rendering failed: {0}")]
    Render(String),

    /// The page bounds cannot be used for detection.
    #[error("invalid page: {0}")]
    InvalidPage(String),
}

impl TableError {
    pub(crate) fn alloc(context: &'static str) -> impl FnOnce(TryReserveError) -> TableError {
        move |source| TableError::AllocationFailure { context, source }
    }
}

/// Result alias for detection stages.
pub type Result<T> = std::result::Result<T, TableError>;

/// Reserve `additional` slots in `v`, mapping failure to [`TableError::AllocationFailure`].
pub(crate) fn reserve<T>(v: &mut Vec<T>, additional: usize, context: &'static str) -> Result<()> {
    v.try_reserve(additional).map_err(TableError::alloc(context))
}

/// Push `value` after a fallible reservation.
pub(crate) fn try_push<T>(v: &mut Vec<T>, value: T, context: &'static str) -> Result<()> {
    reserve(v, 1, context)?;
    v.push(value);
    Ok(())
}
