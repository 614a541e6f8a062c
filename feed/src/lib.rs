//! Feed page client.
//!
//! Renders a post composer and a newest-first feed of posts for the current
//! session. Reads go through a shared [`domain::query::QueryCache`] so the
//! page-level eager read and the feed renderer share one fetch; a published
//! post invalidates the cached read, and the feed refetches.
//!
//! - [`domain`]: entities, ports, and the query cache
//! - [`outbound`]: HTTP, in-memory, and session adapters
//! - [`ui`]: page, composer, and feed components with their views

pub mod config;
pub mod domain;
pub mod outbound;
pub mod telemetry;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod ui;
