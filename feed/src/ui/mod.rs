//! Page components and their render trees.
//!
//! Components depend only on domain ports and the shared
//! [`PostCache`](crate::domain::PostCache); they never talk to adapters
//! directly.

pub mod composer;
pub mod feed;
pub mod page;
pub mod row;
pub mod view;

pub use composer::{Composer, ComposerState, SubmitOutcome};
pub use feed::FeedRenderer;
pub use page::{Page, PagePorts};
pub use view::{
    COMPOSER_PLACEHOLDER, ComposerView, FeedView, HeaderView, NO_DATA_PLACEHOLDER, NoDataReason,
    PageView, PostRowView,
};
