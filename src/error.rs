use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the bot. Everything surfacing out of `run` before the
/// read loop starts is a fatal startup condition.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot read config {path}: {source}")]
    ConfigRead { path: PathBuf, source: io::Error },

    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config has no [config] section")]
    MissingCredentials,

    #[error("token exchange refused; check client_id and client_secret")]
    TokenRefused,

    #[error("cannot resolve user '{0}'")]
    UnknownUser(String),

    #[error("api request failed: {0}")]
    Api(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("failed to install interrupt handler: {0}")]
    Interrupt(#[from] ctrlc::Error),
}
