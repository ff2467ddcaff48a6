//! Client for the Twitch OAuth and Helix endpoints the bot consumes.
//!
//! Every lookup maps a non-200 status or an empty result set to `None`;
//! transport and decode failures surface as `Err`. The caller decides which
//! of those are fatal.

use log::info;
use serde::Deserialize;
use url::Url;

use crate::error::Error;

const ID_BASE: &str = "https://id.twitch.tv";
const HELIX_BASE: &str = "https://api.twitch.tv/helix";

pub struct Client {
    http: reqwest::blocking::Client,
    id_base: String,
    helix_base: String,
    client_id: String,
    client_secret: String,
    oauth: String,
}

/// Identity resolved during startup. Both fields are written once and stay
/// fixed for the life of the process.
#[derive(Debug, Clone)]
pub struct Identity {
    pub access_token: String,
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
struct TokenGrant {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct Listing<T> {
    data: Vec<T>,
}

/// Subset of the Helix user object the bot reads.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    pub login: String,
    #[serde(default)]
    pub description: String,
}

/// One entry of the Helix moderator listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Moderator {
    pub user_id: String,
    pub user_name: String,
}

impl Client {
    pub fn new(client_id: &str, client_secret: &str, oauth: &str) -> Client {
        Client {
            http: reqwest::blocking::Client::new(),
            id_base: ID_BASE.to_string(),
            helix_base: HELIX_BASE.to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            oauth: oauth.to_string(),
        }
    }

    #[cfg(test)]
    fn with_base(mut self, base: &str) -> Client {
        self.id_base = base.to_string();
        self.helix_base = base.to_string();
        self
    }

    /// Exchanges the client credentials for an app access token. A refused
    /// exchange yields `None`.
    pub fn access_token(&self) -> Result<Option<String>, Error> {
        let response = self
            .http
            .post(format!("{}/oauth2/token", self.id_base))
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()?;
        if !response.status().is_success() {
            return Ok(None);
        }
        let grant: TokenGrant = response.json()?;
        Ok(Some(grant.access_token))
    }

    /// Looks up a user by login name. A refused request or an empty listing
    /// yields `None`.
    pub fn user(&self, login: &str, access_token: &str) -> Result<Option<User>, Error> {
        let response = self
            .http
            .get(format!("{}/users", self.helix_base))
            .query(&[("login", login)])
            .bearer_auth(access_token)
            .header("Client-Id", &self.client_id)
            .send()?;
        if !response.status().is_success() {
            return Ok(None);
        }
        let mut listing: Listing<User> = response.json()?;
        if listing.data.is_empty() {
            return Ok(None);
        }
        Ok(Some(listing.data.remove(0)))
    }

    /// Lists the moderators of a channel. Authenticated with the
    /// channel-scoped oauth credential, not the app access token.
    pub fn moderators(&self, broadcaster_id: &str) -> Result<Option<Vec<Moderator>>, Error> {
        let response = self
            .http
            .get(format!("{}/moderation/moderators", self.helix_base))
            .query(&[("broadcaster_id", broadcaster_id)])
            .bearer_auth(&self.oauth)
            .header("Client-Id", &self.client_id)
            .send()?;
        if !response.status().is_success() {
            return Ok(None);
        }
        let listing: Listing<Moderator> = response.json()?;
        Ok(Some(listing.data))
    }

    /// Token exchange followed by user resolution. Either coming back empty
    /// is fatal: the bot must not enter chat without a resolved identity.
    pub fn authenticate(&self, username: &str) -> Result<Identity, Error> {
        let access_token = self.access_token()?.ok_or(Error::TokenRefused)?;
        let user = self
            .user(username, &access_token)?
            .ok_or_else(|| Error::UnknownUser(username.to_string()))?;
        info!("authenticated as {} (user id {})", user.login, user.id);
        Ok(Identity {
            access_token,
            user_id: user.id,
        })
    }
}

/// Builds the URL an operator visits to authorize the bot and obtain the
/// chat oauth credential.
pub fn authorize_url(client_id: &str, redirect_uri: &str, scope: &str) -> Url {
    let mut url = Url::parse(ID_BASE).expect("base endpoint is a valid url");
    url.set_path("/oauth2/authorize");
    url.query_pairs_mut()
        .append_pair("response_type", "token")
        .append_pair("client_id", client_id)
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("scope", scope);
    url
}
