//! A Twitch chat bot: authenticates against the Helix API, joins one chat
//! channel over IRC, and answers `!commands` with canned responses from its
//! configuration file.

use std::net::Shutdown;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{info, warn};

pub mod api;
pub mod config;
pub mod dispatch;
pub mod irc;
pub mod messaging;

mod error;

pub use error::Error;

use api::Identity;
use config::Config;
use dispatch::Responder;
use messaging::Session;

/// Wires the dispatcher to the live session and API client.
struct LiveResponder<'a> {
    session: &'a Session,
    api: &'a api::Client,
    identity: &'a Identity,
    username: &'a str,
}

impl Responder for LiveResponder<'_> {
    fn send(&mut self, text: &str) -> Result<(), Error> {
        self.session.send(text)
    }

    fn user_description(&mut self) -> Option<String> {
        match self.api.user(self.username, &self.identity.access_token) {
            Ok(Some(user)) => Some(user.description),
            Ok(None) => None,
            Err(err) => {
                warn!("user lookup failed: {}", err);
                None
            }
        }
    }
}

/// Runs the bot to completion: authenticate, join chat, then drive the
/// read-dispatch loop until the connection closes or the operator
/// interrupts. Interruption is a clean shutdown, not an error.
pub fn run(cfg: Config) -> Result<(), Error> {
    let credentials = &cfg.credentials;

    let api = api::Client::new(
        &credentials.client_id,
        &credentials.client_secret,
        &credentials.oauth,
    );
    let identity = api.authenticate(&credentials.username)?;

    match api.moderators(&identity.user_id)? {
        Some(moderators) => {
            let names: Vec<&str> = moderators.iter().map(|m| m.user_name.as_str()).collect();
            info!("moderators: [{}]", names.join(", "));
        }
        None => warn!("moderator list is unavailable"),
    }

    let mut session = Session::connect(
        messaging::CHAT_HOST,
        messaging::CHAT_PORT,
        &credentials.username,
        &credentials.channel,
    )?;
    session.login(&credentials.oauth)?;

    // An interrupt shuts the socket down; the blocked read then sees EOF and
    // the loop winds down without further protocol interaction.
    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let flag = interrupted.clone();
        let handle = session.shutdown_handle()?;
        ctrlc::set_handler(move || {
            flag.store(true, Ordering::SeqCst);
            let _ = handle.shutdown(Shutdown::Both);
        })?;
    }

    let result = session.listen(|session, line| {
        let mut responder = LiveResponder {
            session,
            api: &api,
            identity: &identity,
            username: &credentials.username,
        };
        dispatch::handle(line, &cfg.commands, &mut responder)
    });

    session.disconnect();

    match result {
        Err(err) if interrupted.load(Ordering::SeqCst) => {
            info!("interrupted: {}", err);
            Ok(())
        }
        other => other,
    }
}
