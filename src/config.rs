//! Bot configuration.
//!
//! One reserved `[config]` table holds credentials and identity; every other
//! table names a chat command, optionally carrying `help` and/or `message`
//! entries. The whole structure is read once at startup and never mutated.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::Error;

const RESERVED_SECTION: &str = "config";

/// Contents of the reserved `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub channel: String,
    pub client_id: String,
    pub client_secret: String,
    pub oauth: String,
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
    #[serde(default = "default_scope")]
    pub scope: String,
}

fn default_redirect_uri() -> String {
    "https://localhost".to_string()
}

fn default_scope() -> String {
    "chat:edit chat:read moderation:read openid".to_string()
}

/// One command section. `help` feeds the `!help` command; `message` is the
/// canned reply, sent verbatim.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommandSection {
    pub help: Option<String>,
    pub message: Option<String>,
}

/// Command sections by name, reserved section excluded.
pub type CommandTable = BTreeMap<String, CommandSection>;

#[derive(Debug)]
pub struct Config {
    pub credentials: Credentials,
    pub commands: CommandTable,
}

/// Reads and parses a configuration file. A missing file, malformed
/// contents, or an absent `[config]` section are fatal.
pub fn load(path: &Path) -> Result<Config, Error> {
    let text = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text)
}

fn parse(text: &str) -> Result<Config, Error> {
    let mut sections: toml::Table = text.parse()?;
    let credentials = sections
        .remove(RESERVED_SECTION)
        .ok_or(Error::MissingCredentials)?
        .try_into()?;

    let mut commands = CommandTable::new();
    for (name, section) in sections {
        commands.insert(name, section.try_into()?);
    }

    Ok(Config { credentials, commands })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    const SAMPLE: &str = r#"
[config]
username = "alice"
channel = "wonderland"
client_id = "id"
client_secret = "secret"
oauth = "tok"

[foo]
message = "bar"

[baz]
help = "baz help text"
"#;

    #[test]
    fn test_parses_credentials_and_commands() {
        let cfg = parse(SAMPLE).expect("sample should parse");
        assert_eq!(cfg.credentials.username, "alice");
        assert_eq!(cfg.credentials.channel, "wonderland");
        assert_eq!(cfg.commands["foo"].message.as_deref(), Some("bar"));
        assert_eq!(cfg.commands["foo"].help, None);
        assert_eq!(cfg.commands["baz"].help.as_deref(), Some("baz help text"));
    }

    #[test]
    fn test_reserved_section_is_not_a_command() {
        let cfg = parse(SAMPLE).expect("sample should parse");
        assert!(!cfg.commands.contains_key(RESERVED_SECTION));
    }

    #[test]
    fn test_redirect_uri_and_scope_have_defaults() {
        let cfg = parse(SAMPLE).expect("sample should parse");
        assert_eq!(cfg.credentials.redirect_uri, "https://localhost");
        assert_eq!(cfg.credentials.scope, "chat:edit chat:read moderation:read openid");
    }

    #[test]
    fn test_missing_credentials_section_is_fatal() {
        let result = parse("[foo]\nmessage = \"bar\"\n");
        assert!(matches!(result, Err(Error::MissingCredentials)));
    }

    #[test]
    fn test_malformed_file_is_fatal() {
        assert!(matches!(parse("not = [toml"), Err(Error::ConfigParse(_))));
    }

    #[test]
    fn test_load_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(SAMPLE.as_bytes()).expect("write sample");
        let cfg = load(file.path()).expect("sample should load");
        assert_eq!(cfg.credentials.oauth, "tok");
    }

    #[test]
    fn test_unreadable_file_is_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = load(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(Error::ConfigRead { .. })));
    }
}
