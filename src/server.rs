//! ChatServer Actor implementation
//!
//! The central actor that owns all shared state: the session registry and
//! the room registry. Handlers never touch state directly; they send
//! `ServerCommand`s over an mpsc mailbox, so every mutation and every
//! broadcast recipient computation happens inside this single task.

use std::collections::{HashMap, HashSet};

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::client::Client;
use crate::error::AppError;
use crate::message::ServerMessage;
use crate::room::RoomRegistry;
use crate::types::{generate_nickname, SessionId, DEFAULT_ROOM};

/// Commands sent from handlers to the ChatServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// New session connected
    Connect {
        session_id: SessionId,
        sender: mpsc::Sender<ServerMessage>,
    },
    /// Session ended (quit, end-of-stream, or I/O error)
    Disconnect {
        session_id: SessionId,
    },
    /// `/nick` - change nickname
    Nick {
        session_id: SessionId,
        nickname: String,
    },
    /// `/rooms` - list rooms and members
    ListRooms {
        session_id: SessionId,
    },
    /// `/join` - move into a room
    Join {
        session_id: SessionId,
        room: String,
    },
    /// `/myroom` - report current room
    MyRoom {
        session_id: SessionId,
    },
    /// `/personal` - message sender and one target
    Personal {
        session_id: SessionId,
        to: String,
        text: String,
    },
    /// `/help` - command summary
    Help {
        session_id: SessionId,
    },
    /// Chat line for the sender's current room
    Chat {
        session_id: SessionId,
        text: String,
    },
    /// Unrecognized command line
    Invalid {
        session_id: SessionId,
    },
    /// Server is shutting down; notify every client
    Shutdown {
        ack: oneshot::Sender<()>,
    },
}

/// The main ChatServer actor
///
/// Manages all state and processes commands from session handlers.
pub struct ChatServer {
    /// All connected sessions: SessionId -> Client
    sessions: HashMap<SessionId, Client>,
    /// Room membership, keyed by room name
    rooms: RoomRegistry,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
}

impl ChatServer {
    /// Create a new ChatServer with the given command receiver
    pub fn new(receiver: mpsc::Receiver<ServerCommand>) -> Self {
        Self {
            sessions: HashMap::new(),
            rooms: RoomRegistry::new(),
            receiver,
        }
    }

    /// Run the ChatServer event loop
    ///
    /// Continuously receives and processes commands until all senders are dropped.
    pub async fn run(mut self) {
        info!("ChatServer started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd).await;
        }

        info!("ChatServer shutting down");
    }

    /// Process a single command
    async fn handle_command(&mut self, cmd: ServerCommand) {
        match cmd {
            ServerCommand::Connect { session_id, sender } => {
                self.handle_connect(session_id, sender).await;
            }
            ServerCommand::Disconnect { session_id } => {
                self.handle_disconnect(session_id).await;
            }
            ServerCommand::Nick { session_id, nickname } => {
                self.handle_nick(session_id, nickname).await;
            }
            ServerCommand::ListRooms { session_id } => {
                self.handle_list_rooms(session_id).await;
            }
            ServerCommand::Join { session_id, room } => {
                self.handle_join(session_id, room).await;
            }
            ServerCommand::MyRoom { session_id } => {
                self.handle_my_room(session_id).await;
            }
            ServerCommand::Personal { session_id, to, text } => {
                self.handle_personal(session_id, to, text).await;
            }
            ServerCommand::Help { session_id } => {
                self.handle_help(session_id).await;
            }
            ServerCommand::Chat { session_id, text } => {
                self.handle_chat(session_id, text).await;
            }
            ServerCommand::Invalid { session_id } => {
                self.handle_invalid(session_id).await;
            }
            ServerCommand::Shutdown { ack } => {
                self.handle_shutdown(ack).await;
            }
        }
    }

    /// Handle new session: placeholder nickname, default room, welcome line
    async fn handle_connect(&mut self, session_id: SessionId, sender: mpsc::Sender<ServerMessage>) {
        // Generate a placeholder nickname not held by any live session
        let nickname = loop {
            let candidate = generate_nickname();
            if !self.nickname_in_use(&candidate) {
                break candidate;
            }
        };

        let client = Client::new(session_id, nickname.clone(), sender);
        self.rooms.insert(&nickname, DEFAULT_ROOM);
        let _ = client.send(ServerMessage::Welcome).await;
        self.sessions.insert(session_id, client);

        info!("Session {} connected as '{}'", session_id, nickname);
        debug!("Total sessions: {}", self.sessions.len());
    }

    /// Handle session end: leave room, notify the former room, drop the session
    async fn handle_disconnect(&mut self, session_id: SessionId) {
        let Some(client) = self.sessions.remove(&session_id) else {
            debug!("Disconnect for unknown session {}", session_id);
            return;
        };

        self.rooms.leave(&client.nickname, &client.room);

        // Departure notice goes to whoever is still in the former room
        let recipients: HashSet<String> = self
            .rooms
            .members(&client.room)
            .cloned()
            .unwrap_or_default();
        self.broadcast(
            ServerMessage::Departure {
                nickname: client.nickname.clone(),
            },
            &recipients,
        )
        .await;

        info!("Session {} ('{}') disconnected", session_id, client.nickname);
        debug!("Total sessions: {}", self.sessions.len());
    }

    /// Handle `/nick`: reject collisions, swap the membership key atomically
    async fn handle_nick(&mut self, session_id: SessionId, nickname: String) {
        let taken = self
            .sessions
            .values()
            .any(|c| c.id != session_id && c.nickname == nickname);

        let Some(client) = self.sessions.get_mut(&session_id) else {
            return;
        };

        if taken {
            let _ = client.send(AppError::NicknameTaken(nickname).into()).await;
            return;
        }

        let old = client.nickname.clone();
        client.rename(nickname.clone());
        self.rooms.rename(&old, &nickname, &client.room);

        info!("'{}' is now known as '{}'", old, nickname);
        let _ = client.send(ServerMessage::NicknameChanged { nickname }).await;
    }

    /// Handle `/rooms`
    async fn handle_list_rooms(&mut self, session_id: SessionId) {
        let Some(client) = self.sessions.get(&session_id) else {
            return;
        };
        let rooms = self.rooms.listing();
        let _ = client.send(ServerMessage::RoomList { rooms }).await;
    }

    /// Handle `/join`: move rooms, creating the target on first join
    async fn handle_join(&mut self, session_id: SessionId, room: String) {
        let Some(client) = self.sessions.get_mut(&session_id) else {
            return;
        };

        match self.rooms.join(&client.nickname, &client.room, &room) {
            Ok(()) => {
                info!("'{}' moved from '{}' to '{}'", client.nickname, client.room, room);
                client.room = room;
                let _ = client.send(ServerMessage::RoomChanged).await;
            }
            Err(err) => {
                let _ = client.send(err.into()).await;
            }
        }
    }

    /// Handle `/myroom`
    async fn handle_my_room(&mut self, session_id: SessionId) {
        let Some(client) = self.sessions.get(&session_id) else {
            return;
        };
        let room = client.room.clone();
        let _ = client.send(ServerMessage::CurrentRoom { room }).await;
    }

    /// Handle `/personal`: deliver to sender and target, wherever they are
    ///
    /// A target with no live session is silently skipped; the sender still
    /// receives its own copy.
    async fn handle_personal(&mut self, session_id: SessionId, to: String, text: String) {
        let Some(client) = self.sessions.get(&session_id) else {
            return;
        };
        let from = client.nickname.clone();

        let mut recipients = HashSet::new();
        recipients.insert(from.clone());
        recipients.insert(to);

        self.broadcast(ServerMessage::Personal { from, text }, &recipients)
            .await;
    }

    /// Handle `/help`
    async fn handle_help(&mut self, session_id: SessionId) {
        let Some(client) = self.sessions.get(&session_id) else {
            return;
        };
        let _ = client.send(ServerMessage::Help).await;
    }

    /// Handle a chat line: broadcast to the sender's current room
    ///
    /// The recipient set is the room's member set at dispatch time, which
    /// includes the sender (the message echoes back). Empty payloads are
    /// suppressed.
    async fn handle_chat(&mut self, session_id: SessionId, text: String) {
        if text.is_empty() {
            debug!("Suppressing empty chat line from {}", session_id);
            return;
        }

        let Some(client) = self.sessions.get(&session_id) else {
            return;
        };
        let from = client.nickname.clone();
        let room = client.room.clone();

        let recipients: HashSet<String> =
            self.rooms.members(&room).cloned().unwrap_or_default();
        self.broadcast(ServerMessage::Chat { from, text }, &recipients)
            .await;
    }

    /// Handle an unrecognized command line
    async fn handle_invalid(&mut self, session_id: SessionId) {
        let Some(client) = self.sessions.get(&session_id) else {
            return;
        };
        let _ = client.send(ServerMessage::InvalidCommand).await;
    }

    /// Handle server shutdown: send the quit notice to every session
    async fn handle_shutdown(&mut self, ack: oneshot::Sender<()>) {
        info!("Notifying {} session(s) of shutdown", self.sessions.len());

        let recipients: HashSet<String> = self
            .sessions
            .values()
            .map(|c| c.nickname.clone())
            .collect();
        self.broadcast(ServerMessage::Shutdown, &recipients).await;

        let _ = ack.send(());
    }

    /// Deliver a payload to every session whose nickname is in `recipients`
    ///
    /// Recipients without a live session are silently skipped; a failed
    /// send means that session is tearing down, which its own supervisor
    /// handles.
    async fn broadcast(&self, msg: ServerMessage, recipients: &HashSet<String>) {
        for client in self.sessions.values() {
            if recipients.contains(&client.nickname) {
                if client.send(msg.clone()).await.is_err() {
                    debug!("Dropping message for closing session {}", client.id);
                }
            }
        }
    }

    /// Check whether any live session holds this nickname
    fn nickname_in_use(&self, nickname: &str) -> bool {
        self.sessions.values().any(|c| c.nickname == nickname)
    }
}
