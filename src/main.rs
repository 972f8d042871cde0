//! Multi-room TCP Chat Server - Entry Point
//!
//! Parses the HOST PORT arguments, starts the ChatServer actor and the
//! TCP listener, and accepts connections until interrupted.

use std::env;
use std::process;

use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use room_chat_server::{handle_connection, ChatServer, ServerCommand};

/// Channel buffer size for server commands
const CHANNEL_BUFFER_SIZE: usize = 256;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging with environment filter
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=room_chat_server=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("room_chat_server=info")),
        )
        .init();

    // Positional HOST PORT arguments; missing or malformed is fatal
    let mut args = env::args();
    let program = args
        .next()
        .unwrap_or_else(|| "room_chat_server".to_string());
    let (Some(host), Some(port)) = (args.next(), args.next()) else {
        eprintln!("Usage: {} HOST PORT", program);
        process::exit(1);
    };
    let Ok(port) = port.parse::<u16>() else {
        eprintln!("Usage: {} HOST PORT", program);
        process::exit(1);
    };

    // Start TCP listener
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Chat server listening on {}", addr);

    // Create ChatServer actor channel and start
    let (cmd_tx, cmd_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
    let server = ChatServer::new(cmd_rx);
    tokio::spawn(server.run());

    info!("ChatServer actor started");

    // Connection accept loop, interrupted by ctrl-c
    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer)) => {
                        info!("New connection from {}", peer);
                        let cmd_tx = cmd_tx.clone();

                        // Spawn handler task for each connection
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(stream, cmd_tx).await {
                                error!("Connection handler error: {}", e);
                            }
                        });
                    }
                    Err(e) => {
                        error!("Failed to accept connection: {}", e);
                    }
                }
            }
            _ = signal::ctrl_c() => {
                info!("Interrupt received, shutting down");
                break;
            }
        }
    }

    // Fire the quit notice to every client, then release the listener.
    // Sessions are torn down with the runtime; no protocol exchange is
    // awaited beyond the actor processing the shutdown.
    let (ack_tx, ack_rx) = oneshot::channel();
    if cmd_tx
        .send(ServerCommand::Shutdown { ack: ack_tx })
        .await
        .is_ok()
    {
        let _ = ack_rx.await;
    }
    drop(listener);
    info!("Server stopped");

    Ok(())
}
