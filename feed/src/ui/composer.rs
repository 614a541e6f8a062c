//! Post composer bound to one text field.
//!
//! The composer owns its draft and the in-flight flag of its write. A
//! successful write clears the draft and invalidates the feed slot; the
//! composer never touches the feed directly.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::view::{COMPOSER_PLACEHOLDER, ComposerView};
use crate::domain::ports::{PostApi, PostApiError};
use crate::domain::{NewPost, Post, PostCache, SessionUser, feed_key};

/// Observable composer state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposerState {
    draft: String,
    is_submitting: bool,
    last_error: Option<PostApiError>,
}

impl ComposerState {
    /// Current input value.
    pub fn draft(&self) -> &str {
        self.draft.as_str()
    }

    /// Whether a write is in flight.
    pub const fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    /// Error of the most recent failed write, cleared by the next submit.
    pub const fn last_error(&self) -> Option<&PostApiError> {
        self.last_error.as_ref()
    }
}

/// Result of [`Composer::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The post was created and the feed slot invalidated.
    Published(Post),
    /// Another write was still pending; nothing was sent.
    Suppressed,
    /// The write failed; the draft is kept.
    Failed(PostApiError),
}

/// Post form for a signed-in user.
pub struct Composer {
    user: SessionUser,
    api: Arc<dyn PostApi>,
    cache: Arc<PostCache>,
    state: watch::Sender<ComposerState>,
}

impl Composer {
    /// Mount a composer for `user`.
    pub fn new(user: SessionUser, api: Arc<dyn PostApi>, cache: Arc<PostCache>) -> Self {
        let (state, _) = watch::channel(ComposerState::default());
        Self {
            user,
            api,
            cache,
            state,
        }
    }

    /// The user this composer posts as.
    pub const fn user(&self) -> &SessionUser {
        &self.user
    }

    /// Snapshot of the composer state.
    pub fn state(&self) -> ComposerState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<ComposerState> {
        self.state.subscribe()
    }

    /// Replace the draft.
    ///
    /// Returns `false` and leaves the draft untouched while the input is
    /// disabled by a pending write.
    pub fn on_change(&self, text: impl Into<String>) -> bool {
        let draft = text.into();
        self.state.send_if_modified(move |state| {
            if state.is_submitting {
                return false;
            }
            state.draft = draft;
            true
        })
    }

    /// Publish the draft.
    ///
    /// A submit while another is pending is suppressed without a write.
    pub async fn submit(&self) -> SubmitOutcome {
        let mut claimed = None;
        self.state.send_if_modified(|state| {
            if state.is_submitting {
                return false;
            }
            state.is_submitting = true;
            state.last_error = None;
            claimed = Some(state.draft.clone());
            true
        });
        let Some(draft) = claimed else {
            debug!("submit suppressed while a write is pending");
            return SubmitOutcome::Suppressed;
        };

        info!(chars = draft.chars().count(), "submitting post");
        match self.api.create(&NewPost::new(draft)).await {
            Ok(post) => {
                self.state.send_modify(|state| {
                    state.is_submitting = false;
                    state.draft.clear();
                });
                self.cache.invalidate(&feed_key());
                SubmitOutcome::Published(post)
            }
            Err(error) => {
                warn!(kind = error.kind(), %error, "post submission failed");
                self.state.send_modify(|state| {
                    state.is_submitting = false;
                    state.last_error = Some(error.clone());
                });
                SubmitOutcome::Failed(error)
            }
        }
    }

    /// Render the form.
    pub fn view(&self) -> ComposerView {
        let state = self.state.borrow();
        ComposerView {
            avatar_url: self.user.profile_image_url().to_owned(),
            draft: state.draft.clone(),
            placeholder: COMPOSER_PLACEHOLDER,
            input_disabled: state.is_submitting,
            error: state.last_error.as_ref().map(ToString::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockPostApi;
    use crate::domain::query::QueryStatus;
    use crate::domain::{AuthorId, PostId, register_feed_query};
    use crate::test_support::RecordingPostApi;
    use chrono::Utc;
    use rstest::{fixture, rstest};

    #[fixture]
    fn user() -> SessionUser {
        SessionUser::new("a.png")
    }

    fn created(content: &str) -> Post {
        Post::new(
            PostId::new("p-new").expect("post id"),
            content,
            Utc::now(),
            AuthorId::new("user_1").expect("author id"),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn successful_submit_clears_draft_and_invalidates_feed(user: SessionUser) {
        let mut api = MockPostApi::new();
        api.expect_create()
            .withf(|post| post.content() == "hello world")
            .times(1)
            .returning(|post| Ok(created(post.content())));
        api.expect_get_all().returning(|| Ok(Vec::new()));
        let api: Arc<dyn PostApi> = Arc::new(api);
        let cache = Arc::new(PostCache::new());
        register_feed_query(&cache, Arc::clone(&api));
        cache.ensure(&feed_key()).await;
        let composer = Composer::new(user, api, Arc::clone(&cache));

        assert!(composer.on_change("hello world"));
        let outcome = composer.submit().await;

        assert!(matches!(outcome, SubmitOutcome::Published(_)));
        assert_eq!(composer.state().draft(), "");
        assert!(!composer.state().is_submitting());
        assert!(cache.snapshot(&feed_key()).is_stale());
    }

    #[rstest]
    #[tokio::test]
    async fn failed_submit_keeps_draft_and_records_error(user: SessionUser) {
        let mut api = MockPostApi::new();
        api.expect_create()
            .times(1)
            .returning(|_| Err(PostApiError::rate_limited("slow down")));
        let cache = Arc::new(PostCache::new());
        let composer = Composer::new(user, Arc::new(api), Arc::clone(&cache));
        composer.on_change("draft");

        let outcome = composer.submit().await;

        assert_eq!(outcome, SubmitOutcome::Failed(PostApiError::rate_limited("slow down")));
        let state = composer.state();
        assert_eq!(state.draft(), "draft");
        assert!(!state.is_submitting());
        assert!(state.last_error().is_some());
        assert!(composer.view().error.is_some());
        assert_eq!(cache.snapshot(&feed_key()).status(), QueryStatus::Pending);
    }

    #[rstest]
    #[tokio::test]
    async fn second_submit_while_pending_is_suppressed(user: SessionUser) {
        let api = Arc::new(RecordingPostApi::signed_in());
        let release = api.hold_creates();
        let composer = Composer::new(user, api.clone(), Arc::new(PostCache::new()));
        composer.on_change("once");

        let second = async {
            tokio::task::yield_now().await;
            assert!(composer.view().input_disabled);
            assert!(!composer.on_change("ignored"));
            let outcome = composer.submit().await;
            release.notify_one();
            outcome
        };
        let (first, second) = tokio::join!(composer.submit(), second);

        assert!(matches!(first, SubmitOutcome::Published(_)));
        assert_eq!(second, SubmitOutcome::Suppressed);
        assert_eq!(api.create_calls(), ["once"]);
    }

    #[rstest]
    fn view_carries_avatar_and_placeholder(user: SessionUser) {
        let composer = Composer::new(user, Arc::new(MockPostApi::new()), Arc::new(PostCache::new()));

        let view = composer.view();

        assert_eq!(view.avatar_url, "a.png");
        assert_eq!(view.placeholder, "What's happening?");
        assert!(!view.input_disabled);
    }
}
