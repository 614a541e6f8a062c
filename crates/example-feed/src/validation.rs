//! Username rules for generated authors.
//!
//! - Length between [`USERNAME_MIN`] and [`USERNAME_MAX`] characters
//! - Lowercase ASCII letters, digits, and underscores only

/// Minimum allowed length for a username.
pub const USERNAME_MIN: usize = 3;

/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 20;

/// Validates a generated username.
///
/// # Examples
///
/// ```
/// use example_feed::is_valid_username;
///
/// assert!(is_valid_username("ada_lovelace"));
/// assert!(!is_valid_username("ab"));
/// assert!(!is_valid_username("Ada"));
/// ```
#[must_use]
pub fn is_valid_username(name: &str) -> bool {
    let length = name.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&length) {
        return false;
    }
    name.chars().all(is_valid_username_char)
}

const fn is_valid_username_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'
}

/// Lowercases a raw name and replaces invalid characters with underscores.
///
/// Length is not enforced here.
#[must_use]
pub(crate) fn sanitize_username(name: &str) -> String {
    name.chars()
        .map(|c| c.to_ascii_lowercase())
        .map(|c| if is_valid_username_char(c) { c } else { '_' })
        .collect()
}
