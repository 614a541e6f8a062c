//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod post_api;
mod session_provider;

#[cfg(test)]
pub use post_api::MockPostApi;
pub use post_api::{CREATE_PROCEDURE, GET_ALL_PROCEDURE, PostApi, PostApiError};
#[cfg(test)]
pub use session_provider::MockSessionProvider;
pub use session_provider::SessionProvider;
