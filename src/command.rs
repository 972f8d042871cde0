//! Command interpreter
//!
//! Turns one decoded line of client input into a tagged `Command` variant.
//! Verb matching is case-sensitive and exact; any `/`-prefixed line that
//! fails to match a verb (or arrives with a bad argument count) becomes
//! `Command::Invalid`, never an error.

/// One parsed line of client input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/nick <name>` - change nickname
    Nick(String),
    /// `/rooms` - list rooms and their members
    Rooms,
    /// `/join <room>` - move into a room, creating it if new
    Join(String),
    /// `/myroom` - report current room
    MyRoom,
    /// `/personal <nick> <text...>` - message sender and target only
    Personal { to: String, text: String },
    /// `/help` - command summary
    Help,
    /// `quit` (exact, no slash) - end the session
    Quit,
    /// Unrecognized command or bad argument count
    Invalid,
    /// Anything else: a chat message for the sender's current room
    Chat(String),
}

impl Command {
    /// Parse one inbound line (without its `\n`; a trailing `\r` is stripped)
    pub fn parse(line: &str) -> Command {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if line == "quit" {
            return Command::Quit;
        }
        if !line.starts_with('/') {
            return Command::Chat(line.to_string());
        }

        let verb = line.split(' ').next().unwrap_or(line);
        match verb {
            // First argument wins; extras are ignored
            "/nick" => match line.split_whitespace().nth(1) {
                Some(name) => Command::Nick(name.to_string()),
                None => Command::Invalid,
            },
            "/rooms" => Command::Rooms,
            // Exactly one argument
            "/join" => {
                let args: Vec<&str> = line.split_whitespace().skip(1).collect();
                match args.as_slice() {
                    [room] => Command::Join((*room).to_string()),
                    _ => Command::Invalid,
                }
            }
            "/myroom" => Command::MyRoom,
            "/personal" => {
                let mut parts = line.splitn(3, ' ');
                parts.next(); // verb
                match (parts.next(), parts.next()) {
                    (Some(to), Some(text)) if !to.is_empty() && !text.is_empty() => {
                        Command::Personal {
                            to: to.to_string(),
                            text: text.to_string(),
                        }
                    }
                    _ => Command::Invalid,
                }
            }
            "/help" => Command::Help,
            _ => Command::Invalid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nick() {
        assert_eq!(
            Command::parse("/nick alice"),
            Command::Nick("alice".to_string())
        );
    }

    #[test]
    fn test_parse_nick_extra_args_ignored() {
        // The original keeps only the first argument
        assert_eq!(
            Command::parse("/nick alice bob"),
            Command::Nick("alice".to_string())
        );
    }

    #[test]
    fn test_parse_nick_without_arg_is_invalid() {
        assert_eq!(Command::parse("/nick"), Command::Invalid);
        assert_eq!(Command::parse("/nick "), Command::Invalid);
    }

    #[test]
    fn test_parse_rooms() {
        assert_eq!(Command::parse("/rooms"), Command::Rooms);
    }

    #[test]
    fn test_parse_join() {
        assert_eq!(
            Command::parse("/join lounge"),
            Command::Join("lounge".to_string())
        );
    }

    #[test]
    fn test_parse_join_wrong_arity_is_invalid() {
        assert_eq!(Command::parse("/join"), Command::Invalid);
        assert_eq!(Command::parse("/join a b"), Command::Invalid);
    }

    #[test]
    fn test_parse_myroom() {
        assert_eq!(Command::parse("/myroom"), Command::MyRoom);
    }

    #[test]
    fn test_parse_personal() {
        assert_eq!(
            Command::parse("/personal bob hello there"),
            Command::Personal {
                to: "bob".to_string(),
                text: "hello there".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_personal_without_text_is_invalid() {
        assert_eq!(Command::parse("/personal bob"), Command::Invalid);
        assert_eq!(Command::parse("/personal"), Command::Invalid);
    }

    #[test]
    fn test_parse_help() {
        assert_eq!(Command::parse("/help"), Command::Help);
    }

    #[test]
    fn test_parse_quit_is_exact() {
        assert_eq!(Command::parse("quit"), Command::Quit);
        // Near-misses are ordinary chat
        assert_eq!(
            Command::parse("quit now"),
            Command::Chat("quit now".to_string())
        );
        assert_eq!(Command::parse("quitx"), Command::Chat("quitx".to_string()));
    }

    #[test]
    fn test_parse_unknown_slash_command_is_invalid() {
        assert_eq!(Command::parse("/frobnicate"), Command::Invalid);
        // Verb match is exact, not prefix-based
        assert_eq!(Command::parse("/roomsx"), Command::Invalid);
        assert_eq!(Command::parse("/helpme"), Command::Invalid);
    }

    #[test]
    fn test_parse_chat_fallthrough() {
        assert_eq!(
            Command::parse("hello world"),
            Command::Chat("hello world".to_string())
        );
    }

    #[test]
    fn test_parse_empty_line_is_empty_chat() {
        assert_eq!(Command::parse(""), Command::Chat(String::new()));
    }

    #[test]
    fn test_parse_strips_carriage_return() {
        assert_eq!(Command::parse("quit\r"), Command::Quit);
        assert_eq!(
            Command::parse("/join lounge\r"),
            Command::Join("lounge".to_string())
        );
    }
}
