//! Deterministic feed generation from a seed.
//!
//! The same [`FeedSeed`] always produces identical output.

use fake::Fake;
use fake::faker::lorem::raw::Sentence;
use fake::faker::name::raw::{FirstName, LastName};
use fake::locales::EN;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

use crate::error::GenerationError;
use crate::seed::{ExampleAuthorSeed, ExampleFeed, ExamplePostSeed, FeedSeed};
use crate::validation::{USERNAME_MAX, is_valid_username, sanitize_username};

/// Maximum number of attempts to generate a valid username.
const MAX_NAME_ATTEMPTS: usize = 100;

/// Word count range for generated post bodies.
const MIN_WORDS: usize = 3;
const MAX_WORDS: usize = 14;

/// Gap between consecutive posts, in minutes.
const MIN_GAP_MINUTES: u32 = 1;
const MAX_GAP_MINUTES: u32 = 240;

const AVATAR_HOST: &str = "https://img.example-feed.invalid";

/// Generates authors and posts from a seed definition.
///
/// Posts are returned newest first: `minutes_ago` is strictly increasing
/// along the list. Every post references an author in the output.
///
/// # Errors
///
/// Returns [`GenerationError`] if a username cannot be generated or if
/// posts are requested without authors.
///
/// # Example
///
/// ```
/// use example_feed::{FeedSeed, generate_example_feed};
///
/// let seed = FeedSeed::new(7, 2, 4);
/// let first = generate_example_feed(&seed).expect("generated");
/// let second = generate_example_feed(&seed).expect("generated");
/// assert_eq!(first, second);
/// ```
pub fn generate_example_feed(seed: &FeedSeed) -> Result<ExampleFeed, GenerationError> {
    if seed.author_count() == 0 && seed.post_count() > 0 {
        return Err(GenerationError::NoAuthors {
            post_count: seed.post_count(),
        });
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed.seed());
    let authors = (0..seed.author_count())
        .map(|_| generate_author(&mut rng))
        .collect::<Result<Vec<_>, _>>()?;

    let mut posts = Vec::with_capacity(seed.post_count());
    let mut minutes_ago = 0_u32;
    for _ in 0..seed.post_count() {
        minutes_ago =
            minutes_ago.saturating_add(rng.random_range(MIN_GAP_MINUTES..=MAX_GAP_MINUTES));
        let author_index = rng.random_range(0..authors.len());
        let Some(author) = authors.get(author_index) else {
            continue;
        };
        let content: String = Sentence(EN, MIN_WORDS..MAX_WORDS).fake_with_rng(&mut rng);
        posts.push(ExamplePostSeed {
            id: Uuid::from_u128(rng.random()),
            author_id: author.id.clone(),
            content,
            minutes_ago,
        });
    }

    Ok(ExampleFeed { authors, posts })
}

fn generate_author(rng: &mut ChaCha8Rng) -> Result<ExampleAuthorSeed, GenerationError> {
    let id = format!("user_{}", Uuid::from_u128(rng.random()).simple());
    let username = generate_username(rng)?;
    let profile_image_url = format!("{AVATAR_HOST}/{username}.png");
    Ok(ExampleAuthorSeed {
        id,
        username,
        profile_image_url,
    })
}

/// Builds `first_last` handles, retrying until one passes validation.
fn generate_username(rng: &mut ChaCha8Rng) -> Result<String, GenerationError> {
    for _ in 0..MAX_NAME_ATTEMPTS {
        let first: String = FirstName(EN).fake_with_rng(rng);
        let last: String = LastName(EN).fake_with_rng(rng);

        let candidate = sanitize_username(&format!("{first}_{last}"));
        let truncated: String = candidate.chars().take(USERNAME_MAX).collect();

        if is_valid_username(&truncated) {
            return Ok(truncated);
        }
    }

    Err(GenerationError::UsernameGenerationFailed {
        max_attempts: MAX_NAME_ATTEMPTS,
    })
}
