//! Line-level semantics of the IRC subset spoken by Twitch chat.
//!
//! Note, that this module does not implement the corresponding IRC RFCs in
//! any general way. It knows exactly as much as the bot needs: which lines
//! are keep-alive probes, which carry channel chat, and how to pull a bot
//! command out of the chat text.

/// Prefix character turning a chat message into a bot command.
pub const COMMAND_PREFIX: char = '!';

/// Message type carrying channel chat.
const PRIVMSG: &str = "PRIVMSG";

/// Returns true if the line's first whitespace-delimited token is `PING`.
pub fn is_ping(line: &str) -> bool {
    line == "PING" || line.starts_with("PING ")
}

/// Strips the sender-prefix token from a server line.
///
/// Lines that do not begin with the `:` marker are not application messages
/// and yield `None`. For retained lines the first whitespace-delimited token
/// is dropped, leaving the message body.
pub fn strip_source(line: &str) -> Option<&str> {
    if !line.starts_with(':') {
        return None;
    }
    Some(line.split_once(' ').map_or("", |(_, rest)| rest))
}

/// Extracts the chat text of a channel message.
///
/// Accepts a raw server line or a body with the sender prefix already
/// stripped; any line whose message type is not `PRIVMSG` yields `None`.
/// The type and target tokens are dropped, the remainder is rejoined and a
/// single leading `:` payload marker is removed.
pub fn chat_text(line: &str) -> Option<String> {
    let body = strip_source(line).unwrap_or(line);
    let mut tokens = body.split(' ');
    if tokens.next() != Some(PRIVMSG) {
        return None;
    }
    tokens.next(); // channel target
    let text = tokens.collect::<Vec<_>>().join(" ");
    let text = text.strip_prefix(':').unwrap_or(&text);
    Some(text.to_string())
}

/// Splits a channel message into command tokens.
///
/// The first token is the command name, the rest are its arguments. Yields
/// `None` when the line carries no chat text or the text does not begin
/// with [`COMMAND_PREFIX`].
pub fn chat_command(line: &str) -> Option<Vec<String>> {
    let text = chat_text(line)?;
    let command = text.strip_prefix(COMMAND_PREFIX)?;
    Some(command.split(' ').map(str::to_string).collect())
}
