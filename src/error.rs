use thiserror::Error;

/// Boxed error raised by a caller-supplied callback.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for index operations
#[derive(Error, Debug)]
pub enum EsmError {
    #[error("index is already fixed")]
    AlreadyFixed,

    #[error("index is not fixed yet")]
    NotFixed,

    #[error("keywords must not be empty")]
    EmptyKeyword,

    #[error("match sink failed: {0}")]
    Sink(#[source] BoxError),

    #[error("{failed} of {total} release calls failed, first: {source}")]
    Release {
        failed: usize,
        total: usize,
        #[source]
        source: BoxError,
    },
}

/// Result type alias for index operations
pub type Result<T> = std::result::Result<T, EsmError>;

impl EsmError {
    /// True for phase misuse (calling an operation in the wrong phase).
    ///
    /// These are programmer errors; callback failures are not.
    pub fn is_phase_error(&self) -> bool {
        matches!(self, EsmError::AlreadyFixed | EsmError::NotFixed)
    }
}
