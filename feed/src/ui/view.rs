//! Plain render trees produced by the page components.
//!
//! Views are data: tests assert on them directly and the CLI prints them
//! through their `Display` implementations.

use std::fmt;

use crate::domain::PostId;
use crate::domain::ports::PostApiError;

/// Placeholder shown in the composer input.
pub const COMPOSER_PLACEHOLDER: &str = "What's happening?";
/// Text shown when the feed read produced nothing to render.
pub const NO_DATA_PLACEHOLDER: &str = "Wrong data";
/// Label of the provider-supplied sign-in affordance.
pub const SIGN_IN_LABEL: &str = "Sign in";

/// Whole-page render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageView {
    /// Session not yet resolved; nothing is shown.
    Blank,
    /// Session resolved.
    Ready {
        /// Sign-in affordance or composer.
        header: HeaderView,
        /// Always rendered, whatever the session.
        feed: FeedView,
    },
}

impl PageView {
    /// Header, when the page is ready.
    pub const fn header(&self) -> Option<&HeaderView> {
        match self {
            Self::Blank => None,
            Self::Ready { header, .. } => Some(header),
        }
    }

    /// Feed, when the page is ready.
    pub const fn feed(&self) -> Option<&FeedView> {
        match self {
            Self::Blank => None,
            Self::Ready { feed, .. } => Some(feed),
        }
    }

    /// Composer view, when one is mounted.
    pub const fn composer(&self) -> Option<&ComposerView> {
        match self.header() {
            Some(HeaderView::Composer(view)) => Some(view),
            Some(HeaderView::SignIn) | None => None,
        }
    }

    /// Whether the sign-in affordance is shown.
    pub const fn shows_sign_in(&self) -> bool {
        matches!(self.header(), Some(HeaderView::SignIn))
    }
}

/// Top section of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderView {
    /// Opaque sign-in affordance supplied by the identity provider.
    SignIn,
    /// Post form for the signed-in user.
    Composer(ComposerView),
}

/// Post form render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposerView {
    /// Signed-in user's avatar.
    pub avatar_url: String,
    /// Current input value.
    pub draft: String,
    /// Input placeholder.
    pub placeholder: &'static str,
    /// Input disabled while a write is pending.
    pub input_disabled: bool,
    /// Message of the last failed write, if any.
    pub error: Option<String>,
}

/// Feed section render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedView {
    /// Read in flight with nothing cached.
    Loading,
    /// Read completed without anything to show.
    NoData(NoDataReason),
    /// One row per post, in server order.
    Posts(Vec<PostRowView>),
}

impl FeedView {
    /// Rows, when posts are shown.
    pub fn rows(&self) -> &[PostRowView] {
        match self {
            Self::Posts(rows) => rows.as_slice(),
            Self::Loading | Self::NoData(_) => &[],
        }
    }
}

/// Why the feed shows the no-data placeholder.
///
/// Both reasons render identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoDataReason {
    /// The read succeeded with an empty list.
    Empty,
    /// The read failed.
    Failed(PostApiError),
}

/// One feed row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRowView {
    /// Stable row key.
    pub key: PostId,
    /// Author avatar.
    pub avatar_url: String,
    /// `@username`.
    pub handle: String,
    /// Relative creation time, e.g. "3 minutes ago".
    pub created_ago: String,
    /// Post body, verbatim.
    pub content: String,
}

impl fmt::Display for PageView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => Ok(()),
            Self::Ready { header, feed } => write!(f, "{header}\n{feed}"),
        }
    }
}

impl fmt::Display for HeaderView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignIn => write!(f, "[{SIGN_IN_LABEL}]"),
            Self::Composer(view) => fmt::Display::fmt(view, f),
        }
    }
}

impl fmt::Display for ComposerView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let input = if self.draft.is_empty() {
            self.placeholder
        } else {
            self.draft.as_str()
        };
        let state = if self.input_disabled { " (posting)" } else { "" };
        write!(f, "({}) > {input}{state}", self.avatar_url)?;
        if let Some(error) = &self.error {
            write!(f, "\n! {error}")?;
        }
        Ok(())
    }
}

impl fmt::Display for FeedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => f.write_str("Loading..."),
            Self::NoData(_) => f.write_str(NO_DATA_PLACEHOLDER),
            Self::Posts(rows) => {
                for (index, row) in rows.iter().enumerate() {
                    if index > 0 {
                        f.write_str("\n")?;
                    }
                    fmt::Display::fmt(row, f)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for PostRowView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}) {} · {}\n  {}",
            self.avatar_url, self.handle, self.created_ago, self.content
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(NoDataReason::Empty)]
    #[case(NoDataReason::Failed(PostApiError::transport("down")))]
    fn no_data_reasons_share_one_placeholder(#[case] reason: NoDataReason) {
        assert_eq!(FeedView::NoData(reason).to_string(), NO_DATA_PLACEHOLDER);
    }

    #[test]
    fn blank_page_renders_nothing() {
        assert_eq!(PageView::Blank.to_string(), "");
        assert!(PageView::Blank.feed().is_none());
    }

    #[test]
    fn empty_draft_shows_the_placeholder() {
        let view = ComposerView {
            avatar_url: "a.png".to_owned(),
            draft: String::new(),
            placeholder: COMPOSER_PLACEHOLDER,
            input_disabled: false,
            error: None,
        };
        assert_eq!(view.to_string(), "(a.png) > What's happening?");
    }
}
