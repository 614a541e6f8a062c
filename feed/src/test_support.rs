//! Test doubles shared by unit and integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use mockable::DefaultClock;
use tokio::sync::Notify;

use crate::domain::ports::{PostApi, PostApiError};
use crate::domain::{Author, AuthorId, NewPost, Post, PostWithAuthor};
use crate::outbound::memory::InMemoryPostApi;

/// Author id used by [`RecordingPostApi::signed_in`].
pub const TEST_AUTHOR_ID: &str = "user_test";
/// Username used by [`RecordingPostApi::signed_in`].
pub const TEST_USERNAME: &str = "tester";

/// In-memory post API that records calls and can hold them pending.
pub struct RecordingPostApi {
    inner: InMemoryPostApi,
    creates: Mutex<Vec<String>>,
    reads: AtomicUsize,
    create_gate: Mutex<Option<Arc<Notify>>>,
    read_gate: Mutex<Option<Arc<Notify>>>,
}

impl RecordingPostApi {
    /// Wrap an existing in-memory store.
    pub fn new(inner: InMemoryPostApi) -> Self {
        Self {
            inner,
            creates: Mutex::new(Vec::new()),
            reads: AtomicUsize::new(0),
            create_gate: Mutex::new(None),
            read_gate: Mutex::new(None),
        }
    }

    /// Empty store with [`TEST_USERNAME`] registered and signed in.
    pub fn signed_in() -> Self {
        let inner = InMemoryPostApi::new(Arc::new(DefaultClock));
        if let Ok(id) = AuthorId::new(TEST_AUTHOR_ID) {
            inner.add_author(Author::new(id.clone(), TEST_USERNAME, "a.png"));
            inner.sign_in(id);
        }
        Self::new(inner)
    }

    /// The wrapped store.
    pub const fn store(&self) -> &InMemoryPostApi {
        &self.inner
    }

    /// Hold every following `create` until the returned handle is notified
    /// once per call.
    pub fn hold_creates(&self) -> Arc<Notify> {
        hold(&self.create_gate)
    }

    /// Hold every following `get_all` until the returned handle is notified
    /// once per call.
    pub fn hold_reads(&self) -> Arc<Notify> {
        hold(&self.read_gate)
    }

    /// Contents passed to `create`, in call order.
    pub fn create_calls(&self) -> Vec<String> {
        self.creates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of `get_all` calls.
    pub fn read_calls(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

fn hold(slot: &Mutex<Option<Arc<Notify>>>) -> Arc<Notify> {
    let gate = Arc::new(Notify::new());
    *slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&gate));
    gate
}

fn current_gate(slot: &Mutex<Option<Arc<Notify>>>) -> Option<Arc<Notify>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner).clone()
}

#[async_trait]
impl PostApi for RecordingPostApi {
    async fn get_all(&self) -> Result<Vec<PostWithAuthor>, PostApiError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = current_gate(&self.read_gate) {
            gate.notified().await;
        }
        self.inner.get_all().await
    }

    async fn create(&self, post: &NewPost) -> Result<Post, PostApiError> {
        self.creates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(post.content().to_owned());
        if let Some(gate) = current_gate(&self.create_gate) {
            gate.notified().await;
        }
        self.inner.create(post).await
    }
}
