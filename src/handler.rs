//! TCP connection handler
//!
//! Supervises one session: reads newline-delimited lines off the socket,
//! parses them into commands for the ChatServer, and drains the session's
//! reply channel back onto the socket.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::command::Command;
use crate::error::AppError;
use crate::message::ServerMessage;
use crate::server::ServerCommand;
use crate::types::SessionId;

/// Reply channel depth per session
const SESSION_BUFFER_SIZE: usize = 32;

/// Handle a new TCP connection
///
/// Registers the session with the ChatServer, runs the read and write
/// tasks, and on either one ending sends `Disconnect` exactly once.
pub async fn handle_connection(
    stream: TcpStream,
    cmd_tx: mpsc::Sender<ServerCommand>,
) -> Result<(), AppError> {
    let peer_addr = stream.peer_addr()?;

    let (read_half, mut write_half) = stream.into_split();

    let session_id = SessionId::new();
    info!("Session {} connected from {}", session_id, peer_addr);

    // Channel for server -> client replies
    let (msg_tx, mut msg_rx) = mpsc::channel::<ServerMessage>(SESSION_BUFFER_SIZE);

    // Register with ChatServer; the actor joins us to the default room
    // and queues the welcome line
    if cmd_tx
        .send(ServerCommand::Connect {
            session_id,
            sender: msg_tx,
        })
        .await
        .is_err()
    {
        error!("Failed to register session {} - server closed", session_id);
        return Err(AppError::ChannelSend);
    }

    // Clone cmd_tx for read task
    let cmd_tx_read = cmd_tx.clone();

    // Spawn read task (socket lines -> ServerCommand)
    let read_task = tokio::spawn(async move {
        let mut lines = BufReader::new(read_half).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let Some(cmd) = command_to_server_command(session_id, Command::parse(&line))
                    else {
                        debug!("Session {} sent quit", session_id);
                        break;
                    };
                    if cmd_tx_read.send(cmd).await.is_err() {
                        debug!("Server closed, ending read task for {}", session_id);
                        break;
                    }
                }
                Ok(None) => {
                    debug!("Session {} reached end of stream", session_id);
                    break;
                }
                Err(e) => {
                    error!("Read error for session {}: {}", session_id, e);
                    break;
                }
            }
        }
        debug!("Read task ended for {}", session_id);
    });

    // Spawn write task (ServerMessage -> socket, one newline-terminated
    // line per reply; multi-line replies carry their own interior newlines)
    let write_task = tokio::spawn(async move {
        while let Some(msg) = msg_rx.recv().await {
            let line = format!("{}\n", msg);
            if write_half.write_all(line.as_bytes()).await.is_err() {
                debug!("Socket write failed, ending write task");
                break;
            }
        }
        debug!("Write task ended for session");

        let _ = write_half.shutdown().await;
    });

    // Wait for either task to complete
    tokio::select! {
        _ = read_task => {
            debug!("Read task completed for {}", session_id);
        }
        _ = write_task => {
            debug!("Write task completed for {}", session_id);
        }
    }

    // Closing sequence, triggered exactly once per session
    let _ = cmd_tx.send(ServerCommand::Disconnect { session_id }).await;

    info!("Session {} disconnected", session_id);

    Ok(())
}

/// Convert a parsed Command into a ServerCommand
///
/// `Quit` returns `None`: it ends the read loop rather than reaching the
/// actor, and the supervisor then runs the disconnect sequence.
fn command_to_server_command(session_id: SessionId, command: Command) -> Option<ServerCommand> {
    match command {
        Command::Nick(nickname) => Some(ServerCommand::Nick { session_id, nickname }),
        Command::Rooms => Some(ServerCommand::ListRooms { session_id }),
        Command::Join(room) => Some(ServerCommand::Join { session_id, room }),
        Command::MyRoom => Some(ServerCommand::MyRoom { session_id }),
        Command::Personal { to, text } => Some(ServerCommand::Personal { session_id, to, text }),
        Command::Help => Some(ServerCommand::Help { session_id }),
        Command::Chat(text) => Some(ServerCommand::Chat { session_id, text }),
        Command::Invalid => Some(ServerCommand::Invalid { session_id }),
        Command::Quit => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::ChatServer;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_loopback_session() {
        let (cmd_tx, cmd_rx) = mpsc::channel(64);
        tokio::spawn(ChatServer::new(cmd_rx).run());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let accept_tx = cmd_tx.clone();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let _ = handle_connection(stream, accept_tx).await;
        });

        let stream = TcpStream::connect(addr).await.unwrap();
        let (read_half, mut write_half) = stream.into_split();
        let mut lines = BufReader::new(read_half).lines();

        assert_eq!(lines.next_line().await.unwrap().unwrap(), "Write /help");

        write_half.write_all(b"/myroom\r\n").await.unwrap();
        assert_eq!(
            lines.next_line().await.unwrap().unwrap(),
            "Your room is default"
        );

        write_half.write_all(b"/frobnicate\n").await.unwrap();
        assert_eq!(
            lines.next_line().await.unwrap().unwrap(),
            "Invalid Command use /help"
        );

        // quit tears the session down and the server closes its half
        write_half.write_all(b"quit\n").await.unwrap();
        assert_eq!(lines.next_line().await.unwrap(), None);
    }
}
