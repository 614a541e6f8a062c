//! Error types for the example-feed crate.

use thiserror::Error;

/// Errors that can occur during feed generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Failed to generate a valid username after maximum retries.
    #[error("failed to generate valid username after {max_attempts} attempts")]
    UsernameGenerationFailed {
        /// Number of attempts made before giving up.
        max_attempts: usize,
    },

    /// Posts were requested but no authors are available to write them.
    #[error("cannot generate {post_count} posts without any authors")]
    NoAuthors {
        /// Number of posts requested.
        post_count: usize,
    },
}
