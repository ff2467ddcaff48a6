//! Chat connection handling: login handshake, the blocking read loop, and
//! outbound message sending.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{Shutdown, TcpStream};

use log::*;

use crate::error::Error;
use crate::irc;

pub const CHAT_HOST: &str = "irc.chat.twitch.tv";
pub const CHAT_PORT: u16 = 6667;

const TERMINATOR: &str = "\r\n";

/// A single chat session: one exclusively-owned connection to the chat
/// server, opened during login and closed exactly once.
pub struct Session {
    username: String,
    channel: String,
    stream: Option<TcpStream>,
}

impl Session {
    /// Opens the TCP connection. No retries; a failure here is fatal. The
    /// channel name is normalized with the leading `#` marker.
    pub fn connect(host: &str, port: u16, username: &str, channel: &str) -> Result<Session, Error> {
        info!("connecting to {}:{}...", host, port);
        let stream = TcpStream::connect((host, port))?;
        Ok(Session {
            username: username.to_string(),
            channel: format!("#{}", channel.trim_start_matches('#')),
            stream: Some(stream),
        })
    }

    /// Three-line login handshake: credential, nickname, channel join. No
    /// acknowledgement is awaited between lines; a rejected login only shows
    /// up as a later connection error.
    pub fn login(&self, credential: &str) -> Result<(), Error> {
        let pass = format!("PASS oauth:{}", credential);
        let nick = format!("NICK {}", self.username);
        let join = format!("JOIN {}", self.channel);
        self.send_line(&pass)?;
        self.send_line(&nick)?;
        self.send_line(&join)?;
        Ok(())
    }

    /// Sends a chat message to the channel. The formatted line (minus
    /// terminator) is echoed to the log.
    pub fn send(&self, text: &str) -> Result<(), Error> {
        let line = format!("PRIVMSG {} :{}", self.channel, text);
        info!("sending: {}", line);
        self.send_line(&line)?;
        Ok(())
    }

    /// Blocking read loop driving the whole bot once login completes.
    ///
    /// Keep-alive probes are answered here and never dispatched: a raw line
    /// whose first token is `PING`, or a retained line whose body starts
    /// with the `PING` token, gets exactly one `PONG` reply. Lines without
    /// the `:` sender-prefix marker are discarded. Everything else is handed
    /// to `callback` together with the session. Returns when the peer closes
    /// the connection; I/O errors are fatal.
    pub fn listen<F>(&self, mut callback: F) -> Result<(), Error>
    where
        F: FnMut(&Session, &str) -> Result<(), Error>,
    {
        let reader = BufReader::new(self.stream()?.try_clone()?);
        for line in reader.lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            if irc::is_ping(&line) {
                info!("responding to PING...");
                self.pong()?;
                continue;
            }
            let Some(body) = irc::strip_source(&line) else {
                debug!("discarding: {}", line);
                continue;
            };
            if irc::is_ping(body) {
                info!("responding to PING...");
                self.pong()?;
                continue;
            }
            info!("{}", line);
            callback(self, &line)?;
        }
        Ok(())
    }

    /// Closes the connection. Safe to call more than once.
    pub fn disconnect(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.shutdown(Shutdown::Both);
        }
    }

    /// Clone of the underlying socket handle. Shutting it down unblocks the
    /// read loop, which then winds down as if the peer had closed.
    pub fn shutdown_handle(&self) -> Result<TcpStream, Error> {
        Ok(self.stream()?.try_clone()?)
    }

    fn pong(&self) -> Result<(), Error> {
        self.send_line("PONG")?;
        Ok(())
    }

    fn send_line(&self, line: &str) -> io::Result<()> {
        let mut stream = self.stream()?;
        stream.write_all(line.as_bytes())?;
        stream.write_all(TERMINATOR.as_bytes())
    }

    fn stream(&self) -> io::Result<&TcpStream> {
        self.stream
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "session is disconnected"))
    }
}
