//! DTOs for the tRPC-over-HTTP envelope.
//!
//! Responses are decoded into these transport DTOs first, then mapped into
//! domain records in one pass so identifier validation happens at the edge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Author, AuthorId, Post, PostId, PostWithAuthor};

/// `{"json": ...}` wrapper used for inputs and results.
#[derive(Debug, Serialize, Deserialize)]
pub(super) struct JsonDto<T> {
    pub(super) json: T,
}

#[derive(Debug, Deserialize)]
pub(super) struct SuccessDto<T> {
    pub(super) result: ResultDto<T>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ResultDto<T> {
    pub(super) data: JsonDto<T>,
}

impl<T> SuccessDto<T> {
    pub(super) fn into_inner(self) -> T {
        self.result.data.json
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorEnvelopeDto {
    pub(super) error: JsonDto<ErrorDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorDto {
    pub(super) message: String,
    #[serde(default)]
    pub(super) data: Option<ErrorDataDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorDataDto {
    pub(super) code: Option<String>,
}

impl ErrorEnvelopeDto {
    pub(super) fn code(&self) -> Option<&str> {
        self.error
            .json
            .data
            .as_ref()
            .and_then(|data| data.code.as_deref())
    }

    pub(super) fn message(&self) -> &str {
        self.error.json.message.as_str()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PostDto {
    pub(super) id: String,
    pub(super) content: String,
    pub(super) created_at: DateTime<Utc>,
    pub(super) author_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AuthorDto {
    pub(super) id: String,
    pub(super) username: Option<String>,
    pub(super) profile_image_url: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct FeedEntryDto {
    pub(super) post: PostDto,
    pub(super) author: AuthorDto,
}

impl PostDto {
    pub(super) fn into_domain(self) -> Result<Post, String> {
        let id = PostId::new(self.id).map_err(|err| format!("invalid post id: {err}"))?;
        let author_id = AuthorId::new(self.author_id)
            .map_err(|err| format!("post {id} has an invalid author id: {err}"))?;
        Ok(Post::new(id, self.content, self.created_at, author_id))
    }
}

impl AuthorDto {
    fn into_domain(self) -> Result<Author, String> {
        let id = AuthorId::new(self.id).map_err(|err| format!("invalid author id: {err}"))?;
        let username = self
            .username
            .ok_or_else(|| format!("author {id} has no username"))?;
        Ok(Author::new(id, username, self.profile_image_url))
    }
}

impl FeedEntryDto {
    pub(super) fn into_domain(self) -> Result<PostWithAuthor, String> {
        Ok(PostWithAuthor {
            post: self.post.into_domain()?,
            author: self.author.into_domain()?,
        })
    }
}
