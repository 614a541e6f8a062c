//! Port for the remote post operations.
//!
//! The remote data client exposes one cacheable read (`post.getAll`) and one
//! write (`post.create`). Adapters own the wire format; the page only sees
//! typed records and [`PostApiError`].

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{NewPost, Post, PostWithAuthor};

/// Procedure name of the feed read.
pub const GET_ALL_PROCEDURE: &str = "post.getAll";
/// Procedure name of the post write.
pub const CREATE_PROCEDURE: &str = "post.create";

define_port_error! {
    /// Errors surfaced by post API adapters.
    pub enum PostApiError {
        /// The caller is not signed in or the token was rejected.
        Unauthorized { message: String } => "not signed in: {message}",
        /// The remote side rejected the payload.
        Validation { message: String } => "post rejected: {message}",
        /// The remote side is throttling the caller.
        RateLimited { message: String } => "rate limited: {message}",
        /// The request did not complete in time.
        Timeout { message: String } => "post api request timed out: {message}",
        /// Connection or unexpected server failure.
        Transport { message: String } => "post api transport failure: {message}",
        /// The response could not be decoded.
        Decode { message: String } => "post api response could not be decoded: {message}",
    }
}

/// Remote post operations consumed by the page.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostApi: Send + Sync {
    /// Fetch every post joined with its author, newest first.
    async fn get_all(&self) -> Result<Vec<PostWithAuthor>, PostApiError>;

    /// Publish a new post for the signed-in user.
    async fn create(&self, post: &NewPost) -> Result<Post, PostApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(PostApiError::unauthorized("missing token"), "not signed in: missing token")]
    #[case(PostApiError::validation("content empty"), "post rejected: content empty")]
    #[case(PostApiError::timeout("10s"), "post api request timed out: 10s")]
    fn errors_render_their_context(#[case] error: PostApiError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case(PostApiError::rate_limited("slow down"), "rate_limited")]
    #[case(PostApiError::decode("not json"), "decode")]
    fn errors_name_their_kind(#[case] error: PostApiError, #[case] expected: &str) {
        assert_eq!(error.kind(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn mock_records_the_submitted_payload() {
        let mut api = MockPostApi::new();
        api.expect_create()
            .withf(|post| post.content() == "hi")
            .times(1)
            .returning(|_| Err(PostApiError::rate_limited("slow down")));

        let result = api.create(&NewPost::new("hi")).await;
        assert_eq!(result, Err(PostApiError::rate_limited("slow down")));
    }
}
