//! Reqwest-backed post API adapter.
//!
//! This adapter owns transport details only: procedure URLs, the bearer
//! token, timeout and status mapping, and decoding of the tRPC envelope.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use super::dto::{ErrorEnvelopeDto, FeedEntryDto, JsonDto, PostDto, SuccessDto};
use crate::domain::ports::{CREATE_PROCEDURE, GET_ALL_PROCEDURE, PostApi, PostApiError};
use crate::domain::{NewPost, Post, PostWithAuthor};

const DEFAULT_USER_AGENT: &str = "feed-client/0.1";

/// Errors raised while building [`HttpPostApi`].
#[derive(Debug, Error)]
pub enum HttpPostApiBuildError {
    /// The reqwest client could not be constructed.
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
    /// The API base URL cannot carry procedure path segments.
    #[error("api url {0} cannot be used as a base")]
    BaseUrl(Url),
}

/// Post API adapter speaking the tRPC HTTP convention against one endpoint.
pub struct HttpPostApi {
    client: Client,
    get_all_url: Url,
    create_url: Url,
    session_token: Option<String>,
}

impl HttpPostApi {
    /// Build an adapter with an explicit request timeout.
    ///
    /// `base` is the tRPC mount point, e.g. `http://localhost:3000/api/trpc`.
    ///
    /// # Errors
    ///
    /// Returns an error when the client cannot be built or `base` cannot
    /// carry path segments.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, HttpPostApiBuildError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            get_all_url: procedure_url(&base, GET_ALL_PROCEDURE)?,
            create_url: procedure_url(&base, CREATE_PROCEDURE)?,
            session_token: None,
        })
    }

    /// Attach a bearer token to every request.
    #[must_use]
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    fn authorise(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session_token.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, PostApiError> {
        let response = self
            .authorise(request)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        decode_result(body.as_ref())
    }
}

#[async_trait]
impl PostApi for HttpPostApi {
    async fn get_all(&self) -> Result<Vec<PostWithAuthor>, PostApiError> {
        debug!(url = %self.get_all_url, "requesting feed");
        let entries: Vec<FeedEntryDto> = self.send(self.client.get(self.get_all_url.clone())).await?;
        entries
            .into_iter()
            .map(FeedEntryDto::into_domain)
            .collect::<Result<Vec<_>, _>>()
            .map_err(PostApiError::decode)
    }

    async fn create(&self, post: &NewPost) -> Result<Post, PostApiError> {
        debug!(url = %self.create_url, "creating post");
        let request = self
            .client
            .post(self.create_url.clone())
            .json(&JsonDto { json: post });
        let created: PostDto = self.send(request).await?;
        created.into_domain().map_err(PostApiError::decode)
    }
}

fn procedure_url(base: &Url, procedure: &str) -> Result<Url, HttpPostApiBuildError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| HttpPostApiBuildError::BaseUrl(base.clone()))?
        .pop_if_empty()
        .push(procedure);
    Ok(url)
}

fn decode_result<T: DeserializeOwned>(body: &[u8]) -> Result<T, PostApiError> {
    serde_json::from_slice::<SuccessDto<T>>(body)
        .map(SuccessDto::into_inner)
        .map_err(|error| PostApiError::decode(format!("invalid rpc result: {error}")))
}

fn map_transport_error(error: reqwest::Error) -> PostApiError {
    if error.is_timeout() {
        PostApiError::timeout(error.to_string())
    } else {
        PostApiError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> PostApiError {
    let envelope = serde_json::from_slice::<ErrorEnvelopeDto>(body).ok();
    let detail = envelope
        .as_ref()
        .map_or_else(|| body_preview(body), |env| env.message().to_owned());
    let message = if detail.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {detail}", status.as_u16())
    };

    match envelope.as_ref().and_then(ErrorEnvelopeDto::code) {
        Some("UNAUTHORIZED") => return PostApiError::unauthorized(message),
        Some("BAD_REQUEST") => return PostApiError::validation(message),
        Some("TOO_MANY_REQUESTS") => return PostApiError::rate_limited(message),
        Some("TIMEOUT") => return PostApiError::timeout(message),
        _ => {}
    }
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PostApiError::unauthorized(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            PostApiError::validation(message)
        }
        StatusCode::TOO_MANY_REQUESTS => PostApiError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => PostApiError::timeout(message),
        _ => PostApiError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for the non-network helpers.

    use super::*;
    use rstest::rstest;

    fn decode_feed(body: &str) -> Result<Vec<PostWithAuthor>, PostApiError> {
        let entries: Vec<FeedEntryDto> = decode_result(body.as_bytes())?;
        entries
            .into_iter()
            .map(FeedEntryDto::into_domain)
            .collect::<Result<Vec<_>, _>>()
            .map_err(PostApiError::decode)
    }

    #[rstest]
    #[case("http://localhost:3000/api/trpc", "http://localhost:3000/api/trpc/post.getAll")]
    #[case("http://localhost:3000/api/trpc/", "http://localhost:3000/api/trpc/post.getAll")]
    fn appends_procedure_to_base_path(#[case] base: &str, #[case] expected: &str) {
        let base = Url::parse(base).expect("base url");
        let url = procedure_url(&base, GET_ALL_PROCEDURE).expect("procedure url");
        assert_eq!(url.as_str(), expected);
    }

    #[test]
    fn rejects_base_urls_without_paths() {
        let base = Url::parse("mailto:feed@example.invalid").expect("url");
        let error = procedure_url(&base, CREATE_PROCEDURE).expect_err("cannot be a base");
        assert!(matches!(error, HttpPostApiBuildError::BaseUrl(_)));
    }

    #[rstest]
    #[case::unauthorised_code(StatusCode::UNAUTHORIZED, Some("UNAUTHORIZED"), "unauthorized")]
    #[case::zod_failure(StatusCode::BAD_REQUEST, Some("BAD_REQUEST"), "validation")]
    #[case::rate_limited(StatusCode::TOO_MANY_REQUESTS, Some("TOO_MANY_REQUESTS"), "rate_limited")]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, None, "timeout")]
    #[case::forbidden_status(StatusCode::FORBIDDEN, None, "unauthorized")]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, Some("INTERNAL_SERVER_ERROR"), "transport")]
    fn maps_rpc_errors_to_port_errors(
        #[case] status: StatusCode,
        #[case] code: Option<&str>,
        #[case] expected: &str,
    ) {
        let body = match code {
            Some(code) => format!(
                r#"{{"error":{{"json":{{"message":"nope","code":-1,"data":{{"code":"{code}"}}}}}}}}"#
            ),
            None => "<html>upstream unavailable</html>".to_owned(),
        };
        let error = map_status_error(status, body.as_bytes());
        assert_eq!(error.kind(), expected, "{status} mapped to {error:?}");
    }

    #[test]
    fn error_message_prefers_the_rpc_message() {
        let body = br#"{"error":{"json":{"message":"content too long","data":{"code":"BAD_REQUEST"}}}}"#;
        let error = map_status_error(StatusCode::BAD_REQUEST, body);
        assert_eq!(error, PostApiError::validation("status 400: content too long"));
    }

    #[test]
    fn decodes_feed_entries_in_server_order() {
        let body = r#"{"result":{"data":{"json":[
            {"post":{"id":"p2","content":"second","createdAt":"2023-05-01T12:05:00Z","authorId":"user_1"},
             "author":{"id":"user_1","username":"ada","profileImageUrl":"https://img/ada.png"}},
            {"post":{"id":"p1","content":"first","createdAt":"2023-05-01T12:00:00Z","authorId":"user_1"},
             "author":{"id":"user_1","username":"ada","profileImageUrl":"https://img/ada.png"}}
        ]}}}"#;

        let feed = decode_feed(body).expect("feed decodes");
        let ids: Vec<_> = feed.iter().map(|entry| entry.post.id().as_str()).collect();
        assert_eq!(ids, ["p2", "p1"]);
        assert_eq!(feed.first().map(|e| e.author.username()), Some("ada"));
    }

    #[test]
    fn authors_without_usernames_fail_to_decode() {
        let body = r#"{"result":{"data":{"json":[
            {"post":{"id":"p1","content":"x","createdAt":"2023-05-01T12:00:00Z","authorId":"user_1"},
             "author":{"id":"user_1","username":null,"profileImageUrl":"a.png"}}
        ]}}}"#;

        let error = decode_feed(body).expect_err("missing username");
        assert!(matches!(error, PostApiError::Decode { .. }));
    }

    #[test]
    fn malformed_envelopes_map_to_decode_errors() {
        let error = decode_feed(r#"{"data":[]}"#).expect_err("missing result");
        assert!(matches!(error, PostApiError::Decode { .. }));
    }

    #[test]
    fn create_input_is_wrapped_in_json_envelope() {
        let post = NewPost::new("hello world");
        let body = serde_json::to_value(JsonDto { json: &post }).expect("serialise");
        assert_eq!(body, serde_json::json!({"json": {"content": "hello world"}}));
    }
}
