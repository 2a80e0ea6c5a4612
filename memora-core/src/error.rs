use thiserror::Error;

/// Errors surfaced by memoizer construction and memoized calls.
///
/// Nothing in this crate recovers from these internally: a configuration
/// error is a programmer mistake, and the other two surface synchronously
/// to the caller of the memoized function.
#[derive(Debug, Error)]
pub enum MemoError {
    /// More than one of `cache_factory`, `equality` and `hash` was supplied.
    #[error(
        "cache_factory, equality and hash options can't be combined to create a memoizer, \
         choose the one best suited to the application (got: {})",
        .conflicting.join(", ")
    )]
    Configuration { conflicting: Vec<&'static str> },

    /// A call supplied fewer arguments than the memoizer requires.
    #[error("{}", argument_count_message(.required, .received))]
    ArgumentCount { required: usize, received: usize },

    /// A key argument could not be encoded while deriving its hash.
    #[error("failed to serialize cache key: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for memoizer operations.
pub type MemoResult<T> = Result<T, MemoError>;

fn argument_count_message(required: &usize, received: &usize) -> String {
    let noun = if *required > 1 { "arguments" } else { "argument" };
    let received = if *received == 0 {
        "none".to_string()
    } else {
        received.to_string()
    };
    format!("{required} {noun} required, but {received} received")
}
