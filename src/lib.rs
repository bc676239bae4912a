//! Apple Music API client library
//!
//! This library signs developer tokens, runs the browser based authorization
//! that yields a user token, and dispatches requests against the Apple Music
//! REST API with bounded retry.
//!
//! # Modules
//!
//! - `api` - HTTP handlers of the local authorization page
//! - `applemusic` - Authorization flow, endpoint table and request dispatcher
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error type shared by every module
//! - `management` - Token state and the user token cache
//! - `server` - Local HTTP server for the authorization callback
//! - `types` - Tokens, credentials and response records
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use amkit::{Authorizer, Client, Credential, Endpoint, PathArgs, TokenAuthority};
//!
//! #[tokio::main]
//! async fn main() -> amkit::Result<()> {
//!     let credential = Credential::from_key_file("TEAMID", "KEYID", "AuthKey_KEYID.p8").await?;
//!     let authority = TokenAuthority::new(credential, 24, Authorizer::default());
//!     let client = Client::builder(authority).build()?;
//!     let album = client
//!         .call(Endpoint::Album, &PathArgs::new().id("1564530719"), &[], None, None)
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod applemusic;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod types;
pub mod utils;

pub use applemusic::{
    auth::Authorizer,
    client::{Client, ClientBuilder, Payload},
    endpoints::{Endpoint, PathArgs, Route},
};
pub use error::{Error, Result};
pub use management::{TokenAuthority, UserTokenCache};
pub use types::{Credential, DeveloperToken, ResourceType, UserToken};

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Opened {} in your browser", url);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Authorization successful");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only the binary uses this macro. Library code returns [`Error`] instead.
///
/// # Example
///
/// ```
/// error!("Cannot load settings. Err: {}", e);
/// // Program exits here
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("Failed to open browser. Please navigate to {}", url);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
