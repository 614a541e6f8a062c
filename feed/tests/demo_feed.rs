#![cfg(feature = "demo")]
//! End-to-end checks of the demo wiring: a seeded in-memory store behind the
//! page, exercised through session changes and a publish.

use std::sync::Arc;

use example_feed::{FeedSeed, generate_example_feed};
use feed::domain::{Author, AuthorId, PostCache, Session, SessionUser};
use feed::outbound::memory::InMemoryPostApi;
use feed::outbound::session::WatchSessionProvider;
use feed::ui::{Page, PagePorts, PageView, SubmitOutcome};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

const POSTS: usize = 10;

#[fixture]
fn generated() -> example_feed::ExampleFeed {
    generate_example_feed(&FeedSeed::new(11, 4, POSTS)).expect("example feed")
}

fn mount(api: Arc<InMemoryPostApi>, provider: Arc<WatchSessionProvider>) -> Page {
    Page::mount(PagePorts {
        session: provider,
        posts: api,
        cache: Arc::new(PostCache::new()),
        clock: Arc::new(DefaultClock),
    })
}

#[rstest]
#[tokio::test]
async fn seeded_feed_renders_newest_first(generated: example_feed::ExampleFeed) {
    let api = Arc::new(
        InMemoryPostApi::from_example_feed(&generated, Arc::new(DefaultClock)).expect("seeded"),
    );
    let mut page = mount(api, Arc::new(WatchSessionProvider::new(Session::SignedOut)));

    let view = page.settled().await;

    let rows = view.feed().expect("feed").rows();
    assert_eq!(rows.len(), POSTS);
    let newest = generated.posts.first().expect("posts generated");
    let author = generated.author(&newest.author_id).expect("author generated");
    let first = rows.first().expect("row");
    assert_eq!(first.key.to_string(), newest.id.to_string());
    assert_eq!(first.handle, format!("@{}", author.username));
    assert!(first.created_ago.ends_with(" ago"));
}

#[rstest]
#[tokio::test]
async fn composer_mounts_after_sign_in_and_publishes(generated: example_feed::ExampleFeed) {
    let api = Arc::new(
        InMemoryPostApi::from_example_feed(&generated, Arc::new(DefaultClock)).expect("seeded"),
    );
    let me = AuthorId::new("user_demo").expect("author id");
    api.add_author(Author::new(me.clone(), "you", "me.png"));
    api.sign_in(me);
    let provider = Arc::new(WatchSessionProvider::default());
    let mut page = mount(Arc::clone(&api), Arc::clone(&provider));

    assert_eq!(page.render(), PageView::Blank);

    provider.resolve(Session::SignedIn(SessionUser::new("me.png")));
    let composer = page.render().composer().cloned().expect("composer view");
    assert_eq!(composer.avatar_url, "me.png");

    let mounted = page.composer().expect("composer mounted");
    assert!(mounted.on_change("first post from the terminal"));
    let outcome = mounted.submit().await;
    assert!(matches!(outcome, SubmitOutcome::Published(_)));

    let view = page.settled().await;
    let first = view.feed().and_then(|feed| feed.rows().first()).expect("row");
    assert_eq!(first.content, "first post from the terminal");
    assert_eq!(first.handle, "@you");
    assert_eq!(api.len(), POSTS + 1);
}
