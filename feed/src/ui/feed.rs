//! Feed renderer: the `post.getAll` subscriber.

use std::sync::Arc;

use mockable::Clock;

use super::row::render_row;
use super::view::{FeedView, NoDataReason};
use crate::domain::ports::{PostApi, PostApiError};
use crate::domain::query::{QuerySnapshot, QuerySubscription};
use crate::domain::{PostCache, PostWithAuthor, feed_key, register_feed_query};

type FeedSnapshot = QuerySnapshot<Vec<PostWithAuthor>, PostApiError>;

/// Renders the shared feed slot.
///
/// Mounting subscribes to the slot; dropping the renderer unmounts it.
pub struct FeedRenderer {
    subscription: QuerySubscription<Vec<PostWithAuthor>, PostApiError>,
    clock: Arc<dyn Clock>,
}

impl FeedRenderer {
    /// Subscribe to the feed slot of `cache`, fetching through `api` when the
    /// slot has no fetcher yet.
    pub fn mount(cache: &PostCache, api: Arc<dyn PostApi>, clock: Arc<dyn Clock>) -> Self {
        register_feed_query(cache, api);
        Self {
            subscription: cache.subscribe(&feed_key()),
            clock,
        }
    }

    /// Render the current snapshot.
    pub fn render(&self) -> FeedView {
        render_snapshot(&self.subscription.snapshot(), self.clock.as_ref())
    }

    /// Wait for the slot to settle, then render.
    pub async fn settled(&mut self) -> FeedView {
        let snapshot = self.subscription.settled().await;
        render_snapshot(&snapshot, self.clock.as_ref())
    }

    /// Wait for the next change of the slot. Returns `false` once the cache
    /// is gone.
    pub async fn changed(&mut self) -> bool {
        self.subscription.changed().await
    }
}

/// Map a slot snapshot to a feed view.
///
/// Delivered data wins over a later failed refetch; an empty list and a
/// failed read both map to [`FeedView::NoData`].
pub fn render_snapshot(snapshot: &FeedSnapshot, clock: &dyn Clock) -> FeedView {
    if let Some(posts) = snapshot.data() {
        if posts.is_empty() {
            return FeedView::NoData(NoDataReason::Empty);
        }
        return FeedView::Posts(posts.iter().map(|entry| render_row(entry, clock)).collect());
    }
    match snapshot.error() {
        Some(error) => FeedView::NoData(NoDataReason::Failed(error.clone())),
        None => FeedView::Loading,
    }
}
