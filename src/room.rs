//! Room registry
//!
//! Maps room names to their member nickname sets and owns the membership
//! invariants: the `default` room always exists, a nickname belongs to at
//! most one room, and empty non-default rooms are pruned. Only the
//! `ChatServer` actor touches this, so every method runs inside the single
//! mutual-exclusion domain.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::error::AppError;
use crate::types::DEFAULT_ROOM;

/// Room name → member nicknames
#[derive(Debug)]
pub struct RoomRegistry {
    rooms: HashMap<String, HashSet<String>>,
}

impl RoomRegistry {
    /// Create a registry containing only the empty `default` room
    pub fn new() -> Self {
        let mut rooms = HashMap::new();
        rooms.insert(DEFAULT_ROOM.to_string(), HashSet::new());
        Self { rooms }
    }

    /// Register a nickname in a room, creating the room if absent
    ///
    /// Used when a session connects; the nickname must not already be a
    /// member of any room.
    pub fn insert(&mut self, nickname: &str, room: &str) {
        self.rooms
            .entry(room.to_string())
            .or_default()
            .insert(nickname.to_string());
    }

    /// Move a nickname from its current room into `to`
    ///
    /// Creates `to` if it does not exist. Fails with `AlreadyInRoom` when
    /// `from == to`, leaving membership untouched. The removal and the
    /// insertion happen back to back under the actor, so the nickname is
    /// never observable in zero or two rooms.
    pub fn join(&mut self, nickname: &str, from: &str, to: &str) -> Result<(), AppError> {
        if from == to {
            return Err(AppError::AlreadyInRoom);
        }
        self.remove_member(nickname, from);
        self.insert(nickname, to);
        Ok(())
    }

    /// Remove a nickname from a room; idempotent
    pub fn leave(&mut self, nickname: &str, room: &str) {
        self.remove_member(nickname, room);
    }

    /// Swap the membership key for a nickname change
    pub fn rename(&mut self, old: &str, new: &str, room: &str) {
        let Some(members) = self.rooms.get_mut(room) else {
            warn!("rename: room '{}' not found for '{}'", room, old);
            return;
        };
        if !members.remove(old) {
            warn!("rename: '{}' was not a member of '{}'", old, room);
        }
        members.insert(new.to_string());
    }

    /// Member set of a room, if the room exists
    pub fn members(&self, room: &str) -> Option<&HashSet<String>> {
        self.rooms.get(room)
    }

    /// Room a nickname currently belongs to
    pub fn room_of(&self, nickname: &str) -> Option<&str> {
        self.rooms
            .iter()
            .find(|(_, members)| members.contains(nickname))
            .map(|(name, _)| name.as_str())
    }

    /// Listing for `/rooms`: rooms and members, both sorted
    pub fn listing(&self) -> Vec<(String, Vec<String>)> {
        let mut rooms: Vec<(String, Vec<String>)> = self
            .rooms
            .iter()
            .map(|(name, members)| {
                let mut members: Vec<String> = members.iter().cloned().collect();
                members.sort();
                (name.clone(), members)
            })
            .collect();
        rooms.sort_by(|a, b| a.0.cmp(&b.0));
        rooms
    }

    /// Remove a member, pruning the room if it became empty (never `default`)
    fn remove_member(&mut self, nickname: &str, room: &str) {
        let Some(members) = self.rooms.get_mut(room) else {
            warn!("leave: room '{}' not found for '{}'", room, nickname);
            return;
        };
        if !members.remove(nickname) {
            warn!("leave: '{}' was not a member of '{}'", nickname, room);
            return;
        }
        if members.is_empty() && room != DEFAULT_ROOM {
            self.rooms.remove(room);
        }
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_room_exists() {
        let registry = RoomRegistry::new();
        assert!(registry.members(DEFAULT_ROOM).is_some());
    }

    #[test]
    fn test_insert_and_room_of() {
        let mut registry = RoomRegistry::new();
        registry.insert("alice", DEFAULT_ROOM);
        assert_eq!(registry.room_of("alice"), Some(DEFAULT_ROOM));
    }

    #[test]
    fn test_join_moves_atomically() {
        let mut registry = RoomRegistry::new();
        registry.insert("alice", DEFAULT_ROOM);

        registry.join("alice", DEFAULT_ROOM, "lounge").unwrap();

        // In exactly one room: the new one
        assert!(!registry.members(DEFAULT_ROOM).unwrap().contains("alice"));
        assert!(registry.members("lounge").unwrap().contains("alice"));
        assert_eq!(registry.room_of("alice"), Some("lounge"));
    }

    #[test]
    fn test_join_same_room_is_error_and_noop() {
        let mut registry = RoomRegistry::new();
        registry.insert("alice", DEFAULT_ROOM);

        let err = registry.join("alice", DEFAULT_ROOM, DEFAULT_ROOM);
        assert!(matches!(err, Err(AppError::AlreadyInRoom)));
        assert!(registry.members(DEFAULT_ROOM).unwrap().contains("alice"));
    }

    #[test]
    fn test_join_creates_room() {
        let mut registry = RoomRegistry::new();
        registry.insert("alice", DEFAULT_ROOM);

        assert!(registry.members("lounge").is_none());
        registry.join("alice", DEFAULT_ROOM, "lounge").unwrap();
        assert!(registry.members("lounge").is_some());
    }

    #[test]
    fn test_leave_is_idempotent() {
        let mut registry = RoomRegistry::new();
        registry.insert("alice", DEFAULT_ROOM);

        registry.leave("alice", DEFAULT_ROOM);
        assert!(!registry.members(DEFAULT_ROOM).unwrap().contains("alice"));

        // Leaving again (or from a room never joined) is a logged no-op
        registry.leave("alice", DEFAULT_ROOM);
        registry.leave("alice", "nowhere");
    }

    #[test]
    fn test_empty_room_is_pruned() {
        let mut registry = RoomRegistry::new();
        registry.insert("alice", DEFAULT_ROOM);
        registry.join("alice", DEFAULT_ROOM, "lounge").unwrap();

        registry.join("alice", "lounge", DEFAULT_ROOM).unwrap();
        assert!(registry.members("lounge").is_none());
    }

    #[test]
    fn test_default_room_is_never_pruned() {
        let mut registry = RoomRegistry::new();
        registry.insert("alice", DEFAULT_ROOM);
        registry.leave("alice", DEFAULT_ROOM);
        assert!(registry.members(DEFAULT_ROOM).is_some());
    }

    #[test]
    fn test_rename_swaps_membership_key() {
        let mut registry = RoomRegistry::new();
        registry.insert("guest-abc123", DEFAULT_ROOM);

        registry.rename("guest-abc123", "alice", DEFAULT_ROOM);

        let members = registry.members(DEFAULT_ROOM).unwrap();
        assert!(members.contains("alice"));
        assert!(!members.contains("guest-abc123"));
    }

    #[test]
    fn test_listing_is_sorted() {
        let mut registry = RoomRegistry::new();
        registry.insert("bob", DEFAULT_ROOM);
        registry.insert("alice", DEFAULT_ROOM);
        registry.insert("carol", "lounge");

        let listing = registry.listing();
        assert_eq!(
            listing,
            vec![
                (
                    DEFAULT_ROOM.to_string(),
                    vec!["alice".to_string(), "bob".to_string()]
                ),
                ("lounge".to_string(), vec!["carol".to_string()]),
            ]
        );
    }
}
