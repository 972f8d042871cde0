//! Wire reply definitions
//!
//! Every line the server can send to a client, as a tagged enum rendered
//! to its exact wire text through `Display`. The write task appends the
//! trailing newline, so multi-line replies (`RoomList`, `Help`) join their
//! lines with `\n` and leave the last line bare.

use crate::error::AppError;

/// Static help text, one directive per line.
const HELP_TEXT: &str = "/nick <nickname> to change nickname\n\
/rooms to see list of rooms\n\
/join <room> to join room\n\
/myroom to see your room\n\
/personal <nick> <message> to send personal message";

/// Server → Client reply
///
/// Rendered to the wire with `Display`; the literals are part of the
/// protocol and covered by tests.
#[derive(Debug, Clone)]
pub enum ServerMessage {
    /// Greeting sent once per connection
    Welcome,
    /// `/nick` succeeded
    NicknameChanged { nickname: String },
    /// Requested nickname is held by another session
    NicknameTaken { nickname: String },
    /// `/rooms` listing: (room, members), one line per room
    RoomList { rooms: Vec<(String, Vec<String>)> },
    /// `/join` succeeded
    RoomChanged,
    /// `/join` into the room the client is already in
    AlreadyInRoom,
    /// `/myroom` answer
    CurrentRoom { room: String },
    /// Room chat payload
    Chat { from: String, text: String },
    /// Personal message payload, delivered to sender and target only
    Personal { from: String, text: String },
    /// `/help` answer
    Help,
    /// Unrecognized or malformed command
    InvalidCommand,
    /// A member's session closed
    Departure { nickname: String },
    /// Server is shutting down
    Shutdown,
}

impl std::fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Welcome => write!(f, "Write /help"),
            Self::NicknameChanged { nickname } => {
                write!(f, "Nickname changed to {}", nickname)
            }
            Self::NicknameTaken { nickname } => {
                write!(f, "Nickname {} is already taken", nickname)
            }
            Self::RoomList { rooms } => {
                let lines: Vec<String> = rooms
                    .iter()
                    .map(|(room, members)| format!("{}: {}", room, members.join(", ")))
                    .collect();
                write!(f, "{}", lines.join("\n"))
            }
            Self::RoomChanged => write!(f, "Room changed"),
            Self::AlreadyInRoom => write!(f, "You already in this room"),
            Self::CurrentRoom { room } => write!(f, "Your room is {}", room),
            Self::Chat { from, text } => write!(f, "{}: {}", from, text),
            Self::Personal { from, text } => write!(f, "personal:{}: {}", from, text),
            Self::Help => write!(f, "{}", HELP_TEXT),
            Self::InvalidCommand => write!(f, "Invalid Command use /help"),
            Self::Departure { nickname } => write!(f, "{} has left!", nickname),
            Self::Shutdown => write!(f, "quit"),
        }
    }
}

/// Convert a protocol-level AppError into the reply line for the client
impl From<AppError> for ServerMessage {
    fn from(err: AppError) -> Self {
        match err {
            AppError::AlreadyInRoom => ServerMessage::AlreadyInRoom,
            AppError::NicknameTaken(nickname) => ServerMessage::NicknameTaken { nickname },
            // Fatal errors never reach a client as a reply line
            _ => ServerMessage::InvalidCommand,
        }
    }
}
