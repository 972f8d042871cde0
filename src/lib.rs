//! Multi-room TCP Chat Server Library
//!
//! A line-protocol chat server built on tokio, using the Actor pattern
//! for state management.
//!
//! # Features
//! - Plain TCP connections, newline-delimited UTF-8 in both directions
//! - `/`-prefixed command protocol (`/nick`, `/rooms`, `/join`, `/myroom`,
//!   `/personal`, `/help`)
//! - Named rooms created on first join; everyone starts in `default`
//! - Room-scoped chat broadcast and cross-room personal messages
//! - Departure notices and server-wide shutdown notice
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `ChatServer` is the central actor owning the session and room registries
//! - Each connection has a `handler` task communicating with the server
//! - No locks needed - all state access goes through message passing
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use tokio::sync::mpsc;
//! use room_chat_server::{ChatServer, handle_connection};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await.unwrap();
//!     let (cmd_tx, cmd_rx) = mpsc::channel(256);
//!
//!     tokio::spawn(ChatServer::new(cmd_rx).run());
//!
//!     while let Ok((stream, _)) = listener.accept().await {
//!         let cmd_tx = cmd_tx.clone();
//!         tokio::spawn(handle_connection(stream, cmd_tx));
//!     }
//! }
//! ```

pub mod client;
pub mod command;
pub mod error;
pub mod handler;
pub mod message;
pub mod room;
pub mod server;
pub mod types;

// Re-export main types for convenience
pub use client::Client;
pub use command::Command;
pub use error::{AppError, SendError};
pub use handler::handle_connection;
pub use message::ServerMessage;
pub use room::RoomRegistry;
pub use server::{ChatServer, ServerCommand};
pub use types::{generate_nickname, SessionId, DEFAULT_ROOM};
