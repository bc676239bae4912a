use std::{collections::HashMap, fmt, net::IpAddr, path::Path};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use tabled::Tabled;
use tokio::sync::oneshot;

use crate::error::Result;

/// Signing material for developer tokens.
#[derive(Clone)]
pub struct Credential {
    pub team_id: String,
    pub key_id: String,
    pub private_key: String,
}

impl Credential {
    pub fn new(
        team_id: impl Into<String>,
        key_id: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Self {
        Self {
            team_id: team_id.into(),
            key_id: key_id.into(),
            private_key: private_key.into(),
        }
    }

    /// Reads the PEM encoded `.p8` key downloaded from the developer portal.
    pub async fn from_key_file(
        team_id: impl Into<String>,
        key_id: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self> {
        let private_key = async_fs::read_to_string(path.as_ref()).await?;
        Ok(Self::new(team_id, key_id, private_key))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("team_id", &self.team_id)
            .field("key_id", &self.key_id)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

/// Payload of a developer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeveloperTokenClaims {
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

/// A signed developer token and its validity window.
#[derive(Clone, PartialEq, Eq)]
pub struct DeveloperToken {
    value: String,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl DeveloperToken {
    pub(crate) fn new(value: String, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            value,
            issued_at,
            expires_at,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Decodes the payload segment. Returns `None` for a malformed token.
    pub fn claims(&self) -> Option<DeveloperTokenClaims> {
        let payload = self.value.split('.').nth(1)?;
        let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

impl fmt::Debug for DeveloperToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeveloperToken")
            .field("value", &"[REDACTED]")
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Opaque per-user token handed back by the authorization page.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserToken(String);

impl UserToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for UserToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserToken").field(&"[REDACTED]").finish()
    }
}

/// Which token set a request needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum ResourceType {
    /// Public catalog, developer token only.
    Catalog,
    /// The authorized user's library, developer and user token.
    Library,
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceType::Catalog => write!(f, "catalog"),
            ResourceType::Library => write!(f, "library"),
        }
    }
}

/// State of one authorization attempt, shared with the callback handlers.
///
/// Lives exactly as long as the local server of that attempt.
#[derive(Debug)]
pub struct AuthSession {
    pub bind_address: IpAddr,
    pub bind_port: u16,
    /// Rendered authorization page served on every GET.
    pub page: String,
    pub received_token: Option<UserToken>,
    /// Number of page loads seen so far.
    pub request_count: u32,
    /// Resolves the waiting authorizer on the first token POST.
    pub token_tx: Option<oneshot::Sender<UserToken>>,
}

/// Top level document returned by most endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceResponse {
    #[serde(default)]
    pub data: Vec<Resource>,
    pub href: Option<String>,
    pub next: Option<String>,
    pub results: Option<Value>,
    pub meta: Option<Value>,
    pub errors: Option<Vec<ApiError>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Resource {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub href: Option<String>,
    pub attributes: Option<Value>,
    pub relationships: Option<HashMap<String, Relationship>>,
    pub views: Option<HashMap<String, View>>,
}

impl Resource {
    /// Decodes `attributes` into one of the typed attribute records.
    pub fn attributes_as<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        match &self.attributes {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    /// Display name taken from `attributes.name`, if any.
    pub fn name(&self) -> Option<&str> {
        self.attributes.as_ref()?.get("name")?.as_str()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Relationship {
    pub href: Option<String>,
    pub next: Option<String>,
    #[serde(default)]
    pub data: Vec<Resource>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct View {
    pub href: Option<String>,
    pub next: Option<String>,
    pub attributes: Option<ViewAttributes>,
    #[serde(default)]
    pub data: Vec<Resource>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewAttributes {
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artwork {
    pub bg_color: Option<String>,
    pub height: Option<u32>,
    pub width: Option<u32>,
    pub text_color1: Option<String>,
    pub text_color2: Option<String>,
    pub text_color3: Option<String>,
    pub text_color4: Option<String>,
    pub url: Option<String>,
}

impl Artwork {
    /// Fills the `{w}x{h}` placeholders of the artwork url template.
    pub fn url_for_size(&self, width: u32, height: u32) -> Option<String> {
        self.url.as_ref().map(|url| {
            url.replace("{w}", &width.to_string())
                .replace("{h}", &height.to_string())
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditorialNotes {
    pub short: Option<String>,
    pub standard: Option<String>,
    pub name: Option<String>,
    pub tagline: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayParameters {
    pub id: Option<String>,
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumAttributes {
    pub artist_name: Option<String>,
    pub artist_url: Option<String>,
    pub artwork: Option<Artwork>,
    pub content_rating: Option<String>,
    pub copyright: Option<String>,
    pub editorial_notes: Option<EditorialNotes>,
    #[serde(default)]
    pub genre_names: Vec<String>,
    pub is_compilation: Option<bool>,
    pub is_complete: Option<bool>,
    pub is_mastered_for_itunes: Option<bool>,
    pub is_single: Option<bool>,
    pub name: Option<String>,
    pub play_params: Option<PlayParameters>,
    pub record_label: Option<String>,
    pub release_date: Option<String>,
    pub track_count: Option<u32>,
    pub upc: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryAlbumAttributes {
    pub artist_name: Option<String>,
    pub artwork: Option<Artwork>,
    pub content_rating: Option<String>,
    pub date_added: Option<String>,
    pub name: Option<String>,
    pub play_params: Option<PlayParameters>,
    pub release_date: Option<String>,
    pub track_count: Option<u32>,
    #[serde(default)]
    pub genre_names: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistAttributes {
    pub name: Option<String>,
    #[serde(default)]
    pub genre_names: Vec<String>,
    pub artwork: Option<Artwork>,
    pub editorial_notes: Option<EditorialNotes>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongAttributes {
    pub album_name: Option<String>,
    pub artist_name: Option<String>,
    pub artwork: Option<Artwork>,
    pub composer_name: Option<String>,
    pub content_rating: Option<String>,
    pub disc_number: Option<u32>,
    pub duration_in_millis: Option<u64>,
    #[serde(default)]
    pub genre_names: Vec<String>,
    pub isrc: Option<String>,
    pub name: Option<String>,
    pub play_params: Option<PlayParameters>,
    pub release_date: Option<String>,
    pub track_number: Option<u32>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistAttributes {
    pub artwork: Option<Artwork>,
    pub curator_name: Option<String>,
    pub description: Option<EditorialNotes>,
    pub last_modified_date: Option<String>,
    pub name: Option<String>,
    pub play_params: Option<PlayParameters>,
    pub playlist_type: Option<String>,
    pub url: Option<String>,
}

/// Error object returned by the API in the `errors` array.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiError {
    pub id: Option<String>,
    pub title: Option<String>,
    pub detail: Option<String>,
    pub status: Option<String>,
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct ResourceTableRow {
    pub id: String,
    #[tabled(rename = "type")]
    pub kind: String,
    pub name: String,
}
