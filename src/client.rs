//! Client struct definition
//!
//! The actor-side record for one connected session: identity, current
//! room, and the channel its write task drains.

use tokio::sync::mpsc;

use crate::error::SendError;
use crate::message::ServerMessage;
use crate::types::{SessionId, DEFAULT_ROOM};

/// Connected client information
///
/// Holds all per-session state the actor tracks: the session ID, the
/// nickname, the current room name, and the reply sender channel.
#[derive(Debug)]
pub struct Client {
    /// Unique identifier for this session
    pub id: SessionId,
    /// Current nickname; starts as a generated placeholder
    pub nickname: String,
    /// Name of the room this client is in; exactly one at a time
    pub room: String,
    /// Server → Client reply channel
    pub sender: mpsc::Sender<ServerMessage>,
}

impl Client {
    /// Create a new client in the default room
    pub fn new(id: SessionId, nickname: String, sender: mpsc::Sender<ServerMessage>) -> Self {
        Self {
            id,
            nickname,
            room: DEFAULT_ROOM.to_string(),
            sender,
        }
    }

    /// Send a reply to this client
    ///
    /// Returns an error if the channel is closed (client disconnected).
    pub async fn send(&self, msg: ServerMessage) -> Result<(), SendError> {
        self.sender
            .send(msg)
            .await
            .map_err(|_| SendError::ChannelClosed)
    }

    /// Update the nickname field
    ///
    /// The caller keeps the room registry's membership key in sync.
    pub fn rename(&mut self, nickname: String) {
        self.nickname = nickname;
    }
}
