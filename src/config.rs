//! Configuration management for amkit.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in `<data_local_dir>/amkit/`
//! 3. Defaults listed on [`Settings`]

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use crate::{
    error::{Error, Result},
    types::Credential,
};

pub const DEFAULT_SESSION_LENGTH_HOURS: i64 = 24;
/// Longest developer token lifetime Apple accepts (six months).
pub const MAX_SESSION_LENGTH_HOURS: i64 = 4380;
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_SERVER_PORT: u16 = 8000;
pub const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_MAX_RETRIES: u32 = 10;
pub const DEFAULT_STOREFRONT: &str = "us";

/// Loads `<data_local_dir>/amkit/.env` into the process environment.
///
/// Creates the directory if needed. A missing `.env` file is not an error,
/// the variables may already be exported by the shell.
///
/// The file is looked up in:
/// - Linux: `~/.local/share/amkit/.env`
/// - macOS: `~/Library/Application Support/amkit/.env`
/// - Windows: `%LOCALAPPDATA%/amkit/.env`
pub async fn load_env() -> Result<()> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| {
            Error::Config(format!("cannot load {}: {}", path.display(), e))
        })?;
    }
    Ok(())
}

pub fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("amkit/.env");
    path
}

/// Where the private signing key comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum KeySource {
    Inline(String),
    File(PathBuf),
}

impl std::fmt::Debug for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySource::Inline(_) => f.write_str("Inline([REDACTED])"),
            KeySource::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

/// Runtime settings for the client and the authorization flow.
#[derive(Debug, Clone)]
pub struct Settings {
    /// `APPLE_MUSIC_TEAM_ID`, required.
    pub team_id: String,
    /// `APPLE_MUSIC_KEY_ID`, required.
    pub key_id: String,
    /// `APPLE_MUSIC_PRIVATE_KEY` or `APPLE_MUSIC_PRIVATE_KEY_PATH`, one is required.
    pub private_key: KeySource,
    /// `APPLE_MUSIC_SESSION_LENGTH`, hours, default 24.
    pub session_length_hours: i64,
    /// `APPLE_MUSIC_STOREFRONT`, default `us`.
    pub storefront: String,
    /// `SERVER_ADDRESS`, default `127.0.0.1`.
    pub server_address: String,
    /// `SERVER_PORT`, default 8000.
    pub server_port: u16,
    /// `AUTH_TIMEOUT`, seconds, default 300, `0` waits forever.
    pub auth_timeout: Option<Duration>,
    /// `MAX_RETRIES`, default 10.
    pub max_retries: u32,
    /// `REQUEST_TIMEOUT`, seconds, unset means no timeout.
    pub request_timeout: Option<Duration>,
    /// `SESSION_REUSE`, default true.
    pub session_reuse: bool,
    /// `HTTP_PROXY_URL`, optional.
    pub proxy: Option<String>,
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let private_key = match (
            get("APPLE_MUSIC_PRIVATE_KEY"),
            get("APPLE_MUSIC_PRIVATE_KEY_PATH"),
        ) {
            (Some(pem), _) => KeySource::Inline(pem.replace("\\n", "\n")),
            (None, Some(path)) => KeySource::File(PathBuf::from(path)),
            (None, None) => {
                return Err(Error::Config(
                    "APPLE_MUSIC_PRIVATE_KEY or APPLE_MUSIC_PRIVATE_KEY_PATH must be set".into(),
                ));
            }
        };

        let session_length_hours: i64 = parse_or(
            get("APPLE_MUSIC_SESSION_LENGTH"),
            "APPLE_MUSIC_SESSION_LENGTH",
            DEFAULT_SESSION_LENGTH_HOURS,
        )?;
        if !(1..=MAX_SESSION_LENGTH_HOURS).contains(&session_length_hours) {
            return Err(Error::Config(format!(
                "APPLE_MUSIC_SESSION_LENGTH must be between 1 and {} hours",
                MAX_SESSION_LENGTH_HOURS
            )));
        }

        let auth_timeout_secs: u64 = parse_or(
            get("AUTH_TIMEOUT"),
            "AUTH_TIMEOUT",
            DEFAULT_AUTH_TIMEOUT_SECS,
        )?;

        let request_timeout = match get("REQUEST_TIMEOUT") {
            Some(v) => Some(Duration::from_secs(parse(&v, "REQUEST_TIMEOUT")?)),
            None => None,
        };

        let session_reuse = match get("SESSION_REUSE") {
            Some(v) => parse_bool(&v, "SESSION_REUSE")?,
            None => true,
        };

        Ok(Self {
            team_id: required(get("APPLE_MUSIC_TEAM_ID"), "APPLE_MUSIC_TEAM_ID")?,
            key_id: required(get("APPLE_MUSIC_KEY_ID"), "APPLE_MUSIC_KEY_ID")?,
            private_key,
            session_length_hours,
            storefront: get("APPLE_MUSIC_STOREFRONT").unwrap_or_else(|| DEFAULT_STOREFRONT.into()),
            server_address: get("SERVER_ADDRESS").unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.into()),
            server_port: parse_or(get("SERVER_PORT"), "SERVER_PORT", DEFAULT_SERVER_PORT)?,
            auth_timeout: (auth_timeout_secs > 0).then(|| Duration::from_secs(auth_timeout_secs)),
            max_retries: parse_or(get("MAX_RETRIES"), "MAX_RETRIES", DEFAULT_MAX_RETRIES)?,
            request_timeout,
            session_reuse,
            proxy: get("HTTP_PROXY_URL"),
        })
    }

    /// Resolves the key source into signing material.
    pub async fn credential(&self) -> Result<Credential> {
        match &self.private_key {
            KeySource::Inline(pem) => Ok(Credential::new(&self.team_id, &self.key_id, pem)),
            KeySource::File(path) => Credential::from_key_file(&self.team_id, &self.key_id, path)
                .await
                .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e))),
        }
    }
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    value.ok_or_else(|| Error::Config(format!("{} must be set", name)))
}

fn parse<T: FromStr>(value: &str, name: &str) -> Result<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| Error::Config(format!("{} has an invalid value `{}`", name, value)))
}

fn parse_or<T: FromStr>(value: Option<String>, name: &str, default: T) -> Result<T> {
    match value {
        Some(v) => parse(&v, name),
        None => Ok(default),
    }
}

fn parse_bool(value: &str, name: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Config(format!(
            "{} has an invalid value `{}`",
            name, value
        ))),
    }
}
