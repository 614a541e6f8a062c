#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
//! `feed` command: render the feed page or publish a post from a terminal.

use std::ffi::OsString;
use std::io::Write;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, bail, eyre};
use mockable::{Clock, DefaultClock};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::info;

use feed::config::FeedSettings;
use feed::domain::ports::PostApi;
use feed::domain::{PostCache, Session, SessionUser};
use feed::outbound::rpc::HttpPostApi;
use feed::outbound::session::WatchSessionProvider;
use feed::telemetry::init_tracing;
use feed::ui::{Page, PagePorts, SubmitOutcome};

#[derive(Debug, Parser)]
#[command(name = "feed", about = "Render the post feed or publish a post")]
struct Cli {
    /// Serve the page from a seeded in-memory feed.
    #[arg(long)]
    demo: bool,
    /// Seed for the demo feed.
    #[arg(long, default_value_t = 42)]
    seed: u64,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render the page once the feed has loaded.
    Show,
    /// Publish a post, then render the refreshed page.
    Post {
        /// Post content.
        content: String,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let settings = FeedSettings::load_from_iter([OsString::from("feed")])
        .map_err(|error| eyre!("failed to load configuration: {error}"))?;
    init_tracing(settings.log_json());

    let runtime = Builder::new_current_thread().enable_all().build()?;
    runtime.block_on(run(cli, settings))
}

async fn run(cli: Cli, settings: FeedSettings) -> Result<()> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let (posts, session) = if cli.demo {
        demo_backend(cli.seed, &settings, Arc::clone(&clock))?
    } else {
        remote_backend(&settings)?
    };

    let provider = Arc::new(WatchSessionProvider::default());
    let mut page = Page::mount(PagePorts {
        session: provider.clone(),
        posts,
        cache: Arc::new(PostCache::new()),
        clock,
    });
    provider.resolve(session);

    if let Command::Post { content } = cli.command {
        page.render();
        let composer = page
            .composer()
            .ok_or_else(|| eyre!("sign in to post: set FEED_SESSION_TOKEN or pass --demo"))?;
        composer.on_change(content);
        match composer.submit().await {
            SubmitOutcome::Published(post) => info!(post_id = %post.id(), "post published"),
            SubmitOutcome::Failed(error) => return Err(error.into()),
            SubmitOutcome::Suppressed => bail!("another post is still being published"),
        }
    }

    let view = page.settled().await;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{view}")?;
    Ok(())
}

fn remote_backend(settings: &FeedSettings) -> Result<(Arc<dyn PostApi>, Session)> {
    let mut api = HttpPostApi::new(settings.api_url()?, settings.request_timeout())?;
    let session = match settings.session_token() {
        Some(token) => {
            api = api.with_session_token(token);
            Session::SignedIn(SessionUser::new(settings.avatar_url()))
        }
        None => Session::SignedOut,
    };
    Ok((Arc::new(api), session))
}

#[cfg(feature = "demo")]
fn demo_backend(
    seed: u64,
    settings: &FeedSettings,
    clock: Arc<dyn Clock>,
) -> Result<(Arc<dyn PostApi>, Session)> {
    use example_feed::{FeedSeed, generate_example_feed};
    use feed::domain::{Author, AuthorId};
    use feed::outbound::memory::InMemoryPostApi;

    const DEMO_AUTHORS: usize = 6;
    const DEMO_POSTS: usize = 20;

    let generated = generate_example_feed(&FeedSeed::new(seed, DEMO_AUTHORS, DEMO_POSTS))?;
    let api = InMemoryPostApi::from_example_feed(&generated, clock)?;
    let me = AuthorId::new("user_demo")?;
    api.add_author(Author::new(me.clone(), "you", settings.avatar_url()));
    api.sign_in(me);
    info!(seed, posts = api.len(), "serving demo feed");
    Ok((
        Arc::new(api),
        Session::SignedIn(SessionUser::new(settings.avatar_url())),
    ))
}

#[cfg(not(feature = "demo"))]
fn demo_backend(
    _seed: u64,
    _settings: &FeedSettings,
    _clock: Arc<dyn Clock>,
) -> Result<(Arc<dyn PostApi>, Session)> {
    bail!("this build does not include the demo feed; rebuild with `--features demo`")
}
