//! Deterministic example authors and posts for demonstration purposes.
//!
//! This crate produces a believable, reproducible feed from a numeric seed.
//! It is independent of the `feed` crate's domain types so the demo backend
//! can convert the output at the point of use.
//!
//! # Example
//!
//! ```
//! use example_feed::{FeedSeed, generate_example_feed};
//!
//! let seed = FeedSeed::new(42, 3, 5);
//! let feed = generate_example_feed(&seed).expect("generation succeeds");
//!
//! assert_eq!(feed.authors.len(), 3);
//! assert_eq!(feed.posts.len(), 5);
//! ```

mod error;
mod generator;
mod seed;
mod validation;

pub use error::GenerationError;
pub use generator::generate_example_feed;
pub use seed::{ExampleAuthorSeed, ExampleFeed, ExamplePostSeed, FeedSeed};
pub use validation::{USERNAME_MAX, USERNAME_MIN, is_valid_username};
