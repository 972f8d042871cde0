//! Error types for the chat server
//!
//! Defines application-level errors and message send errors.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Application-level errors
///
/// Covers both fatal errors (connection termination) and
/// protocol errors (send an error line back to the client).
#[derive(Debug, Error)]
pub enum AppError {
    /// IO error (fatal for the affected session)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Channel send error (fatal - internal channel broken)
    #[error("Channel send error")]
    ChannelSend,

    /// Client tried to join the room it is already in
    #[error("Already in room")]
    AlreadyInRoom,

    /// Requested nickname is held by another live session
    #[error("Nickname taken: {0}")]
    NicknameTaken(String),
}

/// Message send errors
///
/// Occurs when attempting to send messages through closed channels.
#[derive(Debug, Error)]
pub enum SendError {
    /// The receiving end of the channel has been closed
    #[error("Channel closed")]
    ChannelClosed,
}
