//! Domain entities, ports, and the shared query cache.
//!
//! Purpose: keep the page's data flow independent of transport and
//! presentation. Adapters live in `outbound`; views in `ui`.

pub mod ports;
pub mod query;
pub mod relative_time;

mod post;
mod session;

pub use self::post::{Author, AuthorId, NewPost, Post, PostId, PostValidationError, PostWithAuthor};
pub use self::session::{Session, SessionUser};

use std::sync::Arc;

use self::ports::{GET_ALL_PROCEDURE, PostApi, PostApiError};
use self::query::{QueryCache, QueryKey};

/// Cache holding the feed read.
pub type PostCache = QueryCache<Vec<PostWithAuthor>, PostApiError>;

/// Key of the shared `post.getAll` slot.
pub fn feed_key() -> QueryKey {
    QueryKey::procedure(GET_ALL_PROCEDURE)
}

/// Attach `api.get_all()` as the fetcher of the feed slot.
///
/// Every component that reads the feed calls this; only the first
/// registration on a cache takes effect.
pub fn register_feed_query(cache: &PostCache, api: Arc<dyn PostApi>) {
    cache.register(&feed_key(), move || {
        let api = Arc::clone(&api);
        async move { api.get_all().await }
    });
}
