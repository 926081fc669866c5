//! Slash command parsing.
//!
//! Anything that does not start with `/` is a chat message, sent as typed.

use parley_client::Language;

/// Help text shown by `/help`.
pub const HELP: &str =
    "/join <name> <language> [room] | /lang <language> | /leave | /quit | Esc quits";

/// Parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Submit the join form.
    Join {
        /// Display name.
        name: String,
        /// Display language.
        language: Language,
        /// Room, possibly blank.
        room: String,
    },
    /// Switch display language.
    Language {
        /// New language.
        language: Language,
    },
    /// Leave the room and exit.
    Leave,
    /// Exit without leaving.
    Quit,
    /// Show the command list.
    Help,
    /// Chat message.
    Message {
        /// Text as typed.
        content: String,
    },
    /// Unrecognized slash command.
    Unknown {
        /// Whole input line.
        input: String,
    },
    /// Known command with bad arguments.
    InvalidArgs {
        /// Command name without the slash.
        command: String,
        /// What was wrong.
        error: String,
    },
}

/// Parse one input line.
pub fn parse(input: &str) -> Command {
    let Some(rest) = input.trim_start().strip_prefix('/') else {
        return Command::Message { content: input.to_string() };
    };

    let mut parts = rest.split_whitespace();
    let Some(command) = parts.next() else {
        return Command::Unknown { input: input.to_string() };
    };
    let args: Vec<&str> = parts.collect();

    match command {
        "join" => parse_join(&args),
        "lang" | "language" => match args.as_slice() {
            [tag] => match tag.parse() {
                Ok(language) => Command::Language { language },
                Err(e) => invalid("lang", e),
            },
            _ => invalid("lang", "usage: /lang <language>"),
        },
        "leave" => Command::Leave,
        "quit" | "exit" => Command::Quit,
        "help" => Command::Help,
        _ => Command::Unknown { input: input.to_string() },
    }
}

fn parse_join(args: &[&str]) -> Command {
    let (name, tag, room) = match args {
        [name, tag] => (*name, *tag, ""),
        [name, tag, room] => (*name, *tag, *room),
        _ => return invalid("join", "usage: /join <name> <language> [room]"),
    };

    match tag.parse() {
        Ok(language) => {
            Command::Join { name: name.to_string(), language, room: room.to_string() }
        },
        Err(e) => invalid("join", e),
    }
}

fn invalid(command: &str, error: impl ToString) -> Command {
    Command::InvalidArgs { command: command.to_string(), error: error.to_string() }
}
