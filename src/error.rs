/// Error type for this crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PacekitError {
    /// `reduce` was given an empty collection and no initial value.
    #[error("cannot reduce an empty collection without an initial value")]
    EmptyCollection,

    /// A configuration value failed validation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The wrapped function panicked during a scheduled execution.
    #[error("{origin} execution failed: {message}")]
    ExecutionFailure {
        /// Decorator that owned the execution (`"throttle"`, `"queue"` or `"delay"`).
        origin: &'static str,
        /// Panic payload rendered as text.
        message: String,
    },

    /// No async runtime was available to drive timers.
    #[cfg(feature = "tokio")]
    #[cfg_attr(docsrs, doc(cfg(feature = "tokio")))]
    #[error("no tokio runtime available: {0}")]
    RuntimeUnavailable(String),
}
