//! Basic type definitions for the chat server
//!
//! Provides the session identity newtype and placeholder nickname
//! generation:
//! - `SessionId`: UUID-based unique session identifier
//! - `generate_nickname`: random `guest-XXXXXX` placeholder

use uuid::Uuid;

/// Unique session identifier (newtype pattern)
///
/// Wraps a UUID v4 so the registry key is independent of any task or
/// connection handle. Implements Hash and Eq for use as HashMap keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new random session ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name of the room every session starts in; exists for the server lifetime.
pub const DEFAULT_ROOM: &str = "default";

/// Generate a placeholder nickname for a fresh connection
///
/// `guest-` followed by 6 random alphanumerics. Callers re-roll on the
/// unlikely collision with a live session's nickname.
pub fn generate_nickname() -> String {
    use rand::Rng;
    let suffix: String = rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(6)
        .map(char::from)
        .collect::<String>()
        .to_lowercase();
    format!("guest-{}", suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_unique() {
        let id1 = SessionId::new();
        let id2 = SessionId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_generated_nickname_shape() {
        let nick = generate_nickname();
        assert!(nick.starts_with("guest-"));
        assert_eq!(nick.len(), "guest-".len() + 6);
    }

    #[test]
    fn test_generated_nicknames_differ() {
        assert_ne!(generate_nickname(), generate_nickname());
    }
}
