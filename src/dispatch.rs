//! Maps chat commands to outbound actions, with the command table as the
//! sole source of truth.

use log::*;

use crate::config::CommandTable;
use crate::error::Error;
use crate::irc;

const HELP: &str = "help";
const WHOAMI: &str = "whoami";

/// What a dispatched command is allowed to do. The session and the API
/// client sit behind this, so rules never reach into globals.
pub trait Responder {
    /// Sends one chat message to the channel.
    fn send(&mut self, text: &str) -> Result<(), Error>;

    /// Profile description of the authenticated user, fetched live. `None`
    /// when the lookup is unavailable.
    fn user_description(&mut self) -> Option<String>;
}

/// Evaluates the dispatch rules against one raw chat line.
///
/// The rules are independent guard clauses in a fixed order, and more than
/// one may fire for the same input: a section colliding with the `help` or
/// `whoami` special cases also gets its `message` entry sent. Unknown
/// commands fall through silently.
pub fn handle(line: &str, commands: &CommandTable, responder: &mut dyn Responder) -> Result<(), Error> {
    let Some(tokens) = irc::chat_command(line) else {
        return Ok(());
    };
    let Some((name, args)) = tokens.split_first() else {
        return Ok(());
    };
    debug!("command: {:?}", tokens);

    if name == HELP {
        match args.first() {
            Some(section) => {
                if let Some(help) = commands.get(section).and_then(|s| s.help.as_deref()) {
                    responder.send(help)?;
                }
            }
            None => {
                let listing: Vec<String> = commands
                    .iter()
                    .filter(|(_, section)| section.help.is_some())
                    .map(|(name, _)| format!("{}{}", irc::COMMAND_PREFIX, name))
                    .collect();
                let message = format!("commands: {}", listing.join(" "));
                responder.send(message.trim_end())?;
            }
        }
    }

    if name == WHOAMI && commands.contains_key(WHOAMI) {
        if let Some(description) = responder.user_description() {
            responder.send(&description)?;
        }
    }

    if let Some(message) = commands.get(name.as_str()).and_then(|s| s.message.as_deref()) {
        responder.send(message)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::CommandSection;

    #[derive(Default)]
    struct StubResponder {
        sent: Vec<String>,
        description: Option<String>,
    }

    impl Responder for StubResponder {
        fn send(&mut self, text: &str) -> Result<(), Error> {
            self.sent.push(text.to_string());
            Ok(())
        }

        fn user_description(&mut self) -> Option<String> {
            self.description.clone()
        }
    }

    fn table(entries: &[(&str, Option<&str>, Option<&str>)]) -> CommandTable {
        entries
            .iter()
            .map(|(name, help, message)| {
                (
                    name.to_string(),
                    CommandSection {
                        help: help.map(str::to_string),
                        message: message.map(str::to_string),
                    },
                )
            })
            .collect()
    }

    fn privmsg(text: &str) -> String {
        format!(":user!u@h PRIVMSG #chan :{}", text)
    }

    #[test]
    fn test_canned_message_is_sent_verbatim() {
        let commands = table(&[("foo", None, Some("bar"))]);
        let mut responder = StubResponder::default();
        handle(&privmsg("!foo"), &commands, &mut responder).unwrap();
        assert_eq!(responder.sent, vec!["bar"]);
    }

    #[test]
    fn test_help_with_argument_sends_the_section_help() {
        let commands = table(&[("foo", None, Some("bar")), ("baz", Some("baz help text"), None)]);
        let mut responder = StubResponder::default();
        handle(&privmsg("!help baz"), &commands, &mut responder).unwrap();
        assert_eq!(responder.sent, vec!["baz help text"]);
    }

    #[test]
    fn test_help_with_unhelped_argument_stays_silent() {
        let commands = table(&[("foo", None, Some("bar"))]);
        let mut responder = StubResponder::default();
        handle(&privmsg("!help foo"), &commands, &mut responder).unwrap();
        assert!(responder.sent.is_empty());
    }

    #[test]
    fn test_bare_help_lists_sections_defining_help() {
        let commands = table(&[("foo", None, Some("bar")), ("baz", Some("baz help text"), None)]);
        let mut responder = StubResponder::default();
        handle(&privmsg("!help"), &commands, &mut responder).unwrap();
        assert_eq!(responder.sent, vec!["commands: !baz"]);
    }

    #[test]
    fn test_plain_chat_is_ignored() {
        let commands = table(&[("foo", None, Some("bar"))]);
        let mut responder = StubResponder::default();
        handle(&privmsg("hello world"), &commands, &mut responder).unwrap();
        assert!(responder.sent.is_empty());
    }

    #[test]
    fn test_unknown_command_is_silently_ignored() {
        let commands = table(&[("foo", None, Some("bar"))]);
        let mut responder = StubResponder::default();
        handle(&privmsg("!nope"), &commands, &mut responder).unwrap();
        assert!(responder.sent.is_empty());
    }

    #[test]
    fn test_non_chat_lines_are_ignored() {
        let commands = table(&[("foo", None, Some("bar"))]);
        let mut responder = StubResponder::default();
        handle(":user!u@h JOIN #chan", &commands, &mut responder).unwrap();
        assert!(responder.sent.is_empty());
    }

    #[test]
    fn test_whoami_sends_the_live_description() {
        let commands = table(&[("whoami", None, None)]);
        let mut responder = StubResponder {
            description: Some("streams chess".to_string()),
            ..Default::default()
        };
        handle(&privmsg("!whoami"), &commands, &mut responder).unwrap();
        assert_eq!(responder.sent, vec!["streams chess"]);
    }

    #[test]
    fn test_whoami_without_a_section_is_ignored() {
        let commands = table(&[("foo", None, Some("bar"))]);
        let mut responder = StubResponder {
            description: Some("streams chess".to_string()),
            ..Default::default()
        };
        handle(&privmsg("!whoami"), &commands, &mut responder).unwrap();
        assert!(responder.sent.is_empty());
    }

    #[test]
    fn test_whoami_stays_silent_when_the_lookup_fails() {
        let commands = table(&[("whoami", None, None)]);
        let mut responder = StubResponder::default();
        handle(&privmsg("!whoami"), &commands, &mut responder).unwrap();
        assert!(responder.sent.is_empty());
    }

    #[test]
    fn test_colliding_section_fires_both_rules() {
        let commands = table(&[("whoami", None, Some("also canned"))]);
        let mut responder = StubResponder {
            description: Some("streams chess".to_string()),
            ..Default::default()
        };
        handle(&privmsg("!whoami"), &commands, &mut responder).unwrap();
        assert_eq!(responder.sent, vec!["streams chess", "also canned"]);
    }
}
