//! Error types for amkit.
//!
//! A single error enum covers token signing, the interactive authorization
//! flow, endpoint resolution and request dispatching so callers can match on
//! the failure they care about.

use std::{io, net::SocketAddr};

use reqwest::StatusCode;
use thiserror::Error;

use crate::types::ResourceType;

/// The unified error type for amkit operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The private key could not be used to sign a developer token.
    #[error("signing error: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    /// No user token came back from the browser.
    #[error("authorization failed: {0}")]
    AuthorizationFailed(String),

    /// The endpoint has no route for the requested resource class.
    #[error("endpoint `{endpoint}` does not support {resource} resources")]
    ResourceType {
        endpoint: &'static str,
        resource: ResourceType,
    },

    /// A path template placeholder had no value.
    #[error("endpoint `{endpoint}` requires a value for `{argument}`")]
    MissingPathArgument {
        endpoint: &'static str,
        argument: String,
    },

    /// The local callback listener could not be bound.
    #[error("cannot bind authorization server to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// Network level failure (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-retriable status.
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Every attempt failed with a retriable error.
    #[error("request failed after {attempts} attempts, last error: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },

    /// Missing or malformed configuration value.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the request dispatcher should try the same request again.
    pub fn is_retriable(&self) -> bool {
        match self {
            Error::Transport(_) => true,
            Error::Status { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }

    /// Whether the API rejected the credentials that were sent.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Error::Status { status, .. }
                if *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN
        )
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
