use thiserror::Error;

/// Failure of a bounded wait.
#[derive(Debug, Error)]
pub enum AggregateError<E> {
    /// An operation failed; siblings were not waited for.
    #[error("operation {index} failed: {source}")]
    Operation {
        index: usize,
        #[source]
        source: E,
    },

    /// An operation panicked or was aborted by its owner.
    #[error("operation {index} did not finish: {reason}")]
    Join { index: usize, reason: String },

    /// The deadline fired first and partial results were not accepted.
    #[error("not all operations completed within the specified time ({completed}/{total} finished)")]
    Timeout { completed: usize, total: usize },

    /// The runtime dropped every observer before anything resolved.
    #[error("aggregation was interrupted before it resolved")]
    Interrupted,
}
