//! Page shell: session gate, header, and feed.

use std::sync::{Arc, Mutex, PoisonError};

use mockable::Clock;
use tokio::sync::watch;
use tracing::debug;

use super::composer::Composer;
use super::feed::FeedRenderer;
use super::view::{HeaderView, PageView};
use crate::domain::ports::{PostApi, SessionProvider};
use crate::domain::{PostCache, Session, SessionUser, feed_key, register_feed_query};

/// Parameter object bundling the collaborators of a [`Page`].
#[derive(Clone)]
pub struct PagePorts {
    /// Identity provider.
    pub session: Arc<dyn SessionProvider>,
    /// Remote post operations.
    pub posts: Arc<dyn PostApi>,
    /// Cache shared by the page, the composer, and the feed.
    pub cache: Arc<PostCache>,
    /// Wall clock for relative timestamps.
    pub clock: Arc<dyn Clock>,
}

/// The feed page.
///
/// ## Invariants
/// - A composer is mounted only while the session is signed in.
/// - The feed is rendered whenever the session is loaded.
pub struct Page {
    session: Arc<dyn SessionProvider>,
    posts: Arc<dyn PostApi>,
    cache: Arc<PostCache>,
    feed: FeedRenderer,
    composer: Mutex<Option<Arc<Composer>>>,
}

impl Page {
    /// Mount the page and start the eager feed read.
    pub fn mount(ports: PagePorts) -> Self {
        let PagePorts {
            session,
            posts,
            cache,
            clock,
        } = ports;
        register_feed_query(&cache, Arc::clone(&posts));
        cache.prefetch(&feed_key());
        let feed = FeedRenderer::mount(&cache, Arc::clone(&posts), clock);
        Self {
            session,
            posts,
            cache,
            feed,
            composer: Mutex::new(None),
        }
    }

    /// Render against the current session, mounting or unmounting the
    /// composer as needed.
    pub fn render(&self) -> PageView {
        match self.session.current() {
            Session::Loading => {
                self.unmount_composer();
                PageView::Blank
            }
            Session::SignedOut => {
                self.unmount_composer();
                PageView::Ready {
                    header: HeaderView::SignIn,
                    feed: self.feed.render(),
                }
            }
            Session::SignedIn(user) => PageView::Ready {
                header: HeaderView::Composer(self.mount_composer(user).view()),
                feed: self.feed.render(),
            },
        }
    }

    /// The mounted composer, if any.
    pub fn composer(&self) -> Option<Arc<Composer>> {
        self.composer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Wait for the feed to settle, then render.
    pub async fn settled(&mut self) -> PageView {
        self.feed.settled().await;
        self.render()
    }

    /// Wait for the next feed change. Returns `false` once the cache is gone.
    pub async fn feed_changed(&mut self) -> bool {
        self.feed.changed().await
    }

    /// Receiver notified on session changes.
    pub fn session_updates(&self) -> watch::Receiver<Session> {
        self.session.subscribe()
    }

    fn mount_composer(&self, user: SessionUser) -> Arc<Composer> {
        let mut slot = self.composer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = slot.as_ref().filter(|composer| *composer.user() == user) {
            return Arc::clone(existing);
        }
        debug!("mounting composer");
        let composer = Arc::new(Composer::new(
            user,
            Arc::clone(&self.posts),
            Arc::clone(&self.cache),
        ));
        *slot = Some(Arc::clone(&composer));
        composer
    }

    fn unmount_composer(&self) {
        let mut slot = self.composer.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.take().is_some() {
            debug!("unmounting composer");
        }
    }
}
