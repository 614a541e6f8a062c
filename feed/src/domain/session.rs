//! Client-side view of the authenticated identity.
//!
//! The session lifecycle belongs to the identity provider; the page only
//! observes snapshots of it.

/// The signed-in user as exposed to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    profile_image_url: String,
}

impl SessionUser {
    /// Build a session user.
    pub fn new(profile_image_url: impl Into<String>) -> Self {
        Self {
            profile_image_url: profile_image_url.into(),
        }
    }

    /// Avatar shown next to the composer.
    pub fn profile_image_url(&self) -> &str {
        self.profile_image_url.as_str()
    }
}

/// Session snapshot.
///
/// A signed-in session is always loaded; the enum makes the
/// `isLoaded = false, isSignedIn = true` combination unrepresentable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    /// The provider has not resolved the session yet.
    #[default]
    Loading,
    /// Resolved, nobody signed in.
    SignedOut,
    /// Resolved with a signed-in user.
    SignedIn(SessionUser),
}

impl Session {
    /// Whether the provider has resolved the session.
    pub const fn is_loaded(&self) -> bool {
        !matches!(self, Self::Loading)
    }

    /// Whether a user is signed in.
    pub const fn is_signed_in(&self) -> bool {
        matches!(self, Self::SignedIn(_))
    }

    /// The signed-in user, if any.
    pub const fn user(&self) -> Option<&SessionUser> {
        match self {
            Self::SignedIn(user) => Some(user),
            Self::Loading | Self::SignedOut => None,
        }
    }
}
