//! Remote procedure adapters.
//!
//! This module provides a thin HTTP implementation of the `PostApi` port.

mod dto;
mod http_client;

pub use http_client::{HttpPostApi, HttpPostApiBuildError};
