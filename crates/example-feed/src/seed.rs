//! Seed input and generated record types.
//!
//! Generated records carry plain strings and relative ages instead of
//! timestamps; the consumer anchors them to its own clock.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Parameters controlling a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedSeed {
    seed: u64,
    author_count: usize,
    post_count: usize,
}

impl FeedSeed {
    /// Build a seed definition.
    #[must_use]
    pub const fn new(seed: u64, author_count: usize, post_count: usize) -> Self {
        Self {
            seed,
            author_count,
            post_count,
        }
    }

    /// RNG seed value.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of authors to generate.
    #[must_use]
    pub const fn author_count(&self) -> usize {
        self.author_count
    }

    /// Number of posts to generate.
    #[must_use]
    pub const fn post_count(&self) -> usize {
        self.post_count
    }
}

/// A generated author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleAuthorSeed {
    /// Provider-style identifier, e.g. `user_3f2a...`.
    pub id: String,
    /// Handle shown next to posts.
    pub username: String,
    /// Avatar location.
    pub profile_image_url: String,
}

/// A generated post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamplePostSeed {
    /// Unique identifier for the post.
    pub id: Uuid,
    /// Identifier of an author in the same [`ExampleFeed`].
    pub author_id: String,
    /// Post body.
    pub content: String,
    /// Age of the post in minutes at generation time.
    pub minutes_ago: u32,
}

/// Output of a generation run. Posts are ordered newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleFeed {
    /// Generated authors.
    pub authors: Vec<ExampleAuthorSeed>,
    /// Generated posts, newest first.
    pub posts: Vec<ExamplePostSeed>,
}

impl ExampleFeed {
    /// Look up an author by identifier.
    #[must_use]
    pub fn author(&self, id: &str) -> Option<&ExampleAuthorSeed> {
        self.authors.iter().find(|author| author.id == id)
    }
}
