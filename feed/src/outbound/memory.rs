//! Process-local post store implementing the `PostApi` port.
//!
//! Backs the demo mode and tests. Behaves like the remote service where the
//! page can observe it: newest-first reads, signed-in writes, and rejection
//! of blank or oversized content.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{PostApi, PostApiError};
use crate::domain::{Author, AuthorId, NewPost, Post, PostId, PostWithAuthor};

/// Longest post accepted by the remote validator, in characters.
pub const MAX_POST_CHARS: usize = 280;

#[derive(Default)]
struct Store {
    posts: Vec<Post>,
    authors: HashMap<AuthorId, Author>,
    signed_in: Option<AuthorId>,
    failure: Option<PostApiError>,
}

impl Store {
    fn sort_newest_first(&mut self) {
        self.posts
            .sort_by(|left, right| right.created_at().cmp(&left.created_at()));
    }
}

/// In-memory post API.
pub struct InMemoryPostApi {
    store: Mutex<Store>,
    clock: Arc<dyn Clock>,
}

impl InMemoryPostApi {
    /// Create an empty store stamping new posts with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Mutex::new(Store::default()),
            clock,
        }
    }

    fn store(&self) -> std::sync::MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register an author profile.
    pub fn add_author(&self, author: Author) {
        self.store().authors.insert(author.id().clone(), author);
    }

    /// Insert an existing post, keeping the store newest first.
    pub fn insert(&self, post: Post) {
        let mut store = self.store();
        store.posts.push(post);
        store.sort_newest_first();
    }

    /// Attribute subsequent writes to `author`.
    pub fn sign_in(&self, author: AuthorId) {
        self.store().signed_in = Some(author);
    }

    /// Reject subsequent writes as unauthorised.
    pub fn sign_out(&self) {
        self.store().signed_in = None;
    }

    /// Make every call fail with `error` until cleared with `None`.
    pub fn fail_with(&self, error: Option<PostApiError>) {
        self.store().failure = error;
    }

    /// Number of stored posts.
    pub fn len(&self) -> usize {
        self.store().posts.len()
    }

    /// Whether the store holds no posts.
    pub fn is_empty(&self) -> bool {
        self.store().posts.is_empty()
    }
}

#[cfg(feature = "demo")]
impl InMemoryPostApi {
    /// Seed a store from a generated example feed.
    ///
    /// Post timestamps are placed relative to the clock's current time.
    ///
    /// # Errors
    ///
    /// Returns an error when a generated identifier is invalid.
    pub fn from_example_feed(
        feed: &example_feed::ExampleFeed,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, crate::domain::PostValidationError> {
        let now = clock.utc();
        let api = Self::new(clock);
        for seed in &feed.authors {
            api.add_author(Author::new(
                AuthorId::new(seed.id.as_str())?,
                seed.username.as_str(),
                seed.profile_image_url.as_str(),
            ));
        }
        for seed in &feed.posts {
            let created_at = now - chrono::Duration::minutes(i64::from(seed.minutes_ago));
            api.insert(Post::new(
                PostId::new(seed.id.to_string())?,
                seed.content.as_str(),
                created_at,
                AuthorId::new(seed.author_id.as_str())?,
            ));
        }
        Ok(api)
    }
}

#[async_trait]
impl PostApi for InMemoryPostApi {
    async fn get_all(&self) -> Result<Vec<PostWithAuthor>, PostApiError> {
        let store = self.store();
        if let Some(error) = &store.failure {
            return Err(error.clone());
        }
        store
            .posts
            .iter()
            .map(|post| -> Result<PostWithAuthor, PostApiError> {
                let author = store.authors.get(post.author_id()).ok_or_else(|| {
                    PostApiError::transport(format!("author for post {} not found", post.id()))
                })?;
                Ok(PostWithAuthor {
                    post: post.clone(),
                    author: author.clone(),
                })
            })
            .collect()
    }

    async fn create(&self, post: &NewPost) -> Result<Post, PostApiError> {
        let mut store = self.store();
        if let Some(error) = &store.failure {
            return Err(error.clone());
        }
        let author_id = store
            .signed_in
            .clone()
            .ok_or_else(|| PostApiError::unauthorized("no signed-in author"))?;
        if post.content().trim().is_empty() {
            return Err(PostApiError::validation("content must not be empty"));
        }
        if post.content().chars().count() > MAX_POST_CHARS {
            return Err(PostApiError::validation(format!(
                "content must be at most {MAX_POST_CHARS} characters"
            )));
        }

        let id = PostId::new(Uuid::new_v4().to_string())
            .map_err(|err| PostApiError::transport(format!("generated post id rejected: {err}")))?;
        let created = Post::new(id, post.content(), self.clock.utc(), author_id);
        store.posts.insert(0, created.clone());
        store.sort_newest_first();
        debug!(post_id = %created.id(), "stored post");
        Ok(created)
    }
}
