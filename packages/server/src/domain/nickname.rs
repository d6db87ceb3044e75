//! Nickname rules.

/// Default nickname for the client at 1-based `position` in the registry.
///
/// Derived from the current registry position, not a counter: after a
/// departure two clients may end up with the same default.
pub fn default_nickname(position: usize) -> String {
    format!("User{}", position)
}

/// Trim a requested nickname, treating blank input as no nickname.
pub fn normalize_nickname(requested: Option<String>) -> Option<String> {
    requested
        .map(|nickname| nickname.trim().to_string())
        .filter(|nickname| !nickname.is_empty())
}
