//! Post and author data model.
//!
//! Records arrive from the remote data client already joined
//! ([`PostWithAuthor`]); nothing on the client side assembles them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Validation errors returned by the identifier constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostValidationError {
    /// Identifier was empty.
    EmptyId,
    /// Identifier carried leading or trailing whitespace.
    PaddedId,
}

impl fmt::Display for PostValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "identifier must not be empty"),
            Self::PaddedId => write!(f, "identifier must not contain surrounding whitespace"),
        }
    }
}

impl std::error::Error for PostValidationError {}

fn validate_id(raw: &str) -> Result<(), PostValidationError> {
    if raw.trim().is_empty() {
        return Err(PostValidationError::EmptyId);
    }
    if raw.trim() != raw {
        return Err(PostValidationError::PaddedId);
    }
    Ok(())
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and construct the identifier.
            pub fn new(id: impl Into<String>) -> Result<Self, PostValidationError> {
                let raw = id.into();
                validate_id(&raw)?;
                Ok(Self(raw))
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = PostValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

string_id! {
    /// Unique post identifier assigned by the remote data layer.
    PostId
}

string_id! {
    /// Identity-provider user id of a post's author.
    AuthorId
}

/// A published post.
///
/// ## Invariants
/// - Immutable once created; only the write operation produces new posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    id: PostId,
    content: String,
    created_at: DateTime<Utc>,
    author_id: AuthorId,
}

impl Post {
    /// Build a post from its parts.
    pub fn new(
        id: PostId,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
        author_id: AuthorId,
    ) -> Self {
        Self {
            id,
            content: content.into(),
            created_at,
            author_id,
        }
    }

    /// Stable post identifier.
    pub fn id(&self) -> &PostId {
        &self.id
    }

    /// Post body, rendered verbatim.
    pub fn content(&self) -> &str {
        self.content.as_str()
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Author reference.
    pub fn author_id(&self) -> &AuthorId {
        &self.author_id
    }
}

/// Public author profile denormalised onto feed results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    id: AuthorId,
    username: String,
    profile_image_url: String,
}

impl Author {
    /// Build an author profile.
    pub fn new(
        id: AuthorId,
        username: impl Into<String>,
        profile_image_url: impl Into<String>,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            profile_image_url: profile_image_url.into(),
        }
    }

    /// Author identifier.
    pub fn id(&self) -> &AuthorId {
        &self.id
    }

    /// Display handle, without the leading `@`.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Avatar location.
    pub fn profile_image_url(&self) -> &str {
        self.profile_image_url.as_str()
    }
}

/// One feed entry: a post joined with its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostWithAuthor {
    /// The post.
    pub post: Post,
    /// The post's author.
    pub author: Author,
}

/// Payload for the write operation.
///
/// The client performs no validation; the remote side accepts or rejects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    content: String,
}

impl NewPost {
    /// Wrap draft text for submission.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Text to publish.
    pub fn content(&self) -> &str {
        self.content.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Identifier validation and wire shape.
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case("", PostValidationError::EmptyId)]
    #[case("   ", PostValidationError::EmptyId)]
    #[case(" abc", PostValidationError::PaddedId)]
    #[case("abc ", PostValidationError::PaddedId)]
    fn rejects_invalid_ids(#[case] raw: &str, #[case] expected: PostValidationError) {
        assert_eq!(PostId::new(raw), Err(expected.clone()));
        assert_eq!(AuthorId::new(raw), Err(expected));
    }

    #[rstest]
    fn post_uses_camel_case_on_the_wire() {
        let post = Post::new(
            PostId::new("clx1").expect("post id"),
            "hello",
            Utc.with_ymd_and_hms(2023, 5, 1, 12, 0, 0).single().expect("timestamp"),
            AuthorId::new("user_1").expect("author id"),
        );
        let json = serde_json::to_value(&post).expect("serialize");
        assert_eq!(json["createdAt"], "2023-05-01T12:00:00Z");
        assert_eq!(json["authorId"], "user_1");
        assert_eq!(json["id"], "clx1");
    }

    #[rstest]
    fn deserialising_rejects_blank_ids() {
        let raw = r#"{"id":"","username":"ada","profileImageUrl":"a.png"}"#;
        let result: Result<Author, _> = serde_json::from_str(raw);
        assert!(result.is_err());
    }
}
