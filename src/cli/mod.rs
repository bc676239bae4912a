//! # CLI Module
//!
//! Command implementations of the `amkit` binary. Every command loads the
//! settings from the environment, builds what it needs from the library and
//! reports through the `info!`/`success!`/`warning!`/`error!` macros.
//!
//! ## Commands
//!
//! - [`auth`] - runs the browser authorization and caches the user token
//! - [`logout`] - drops the cached user token
//! - [`token`] - prints a freshly signed developer token
//! - [`get`] - calls any endpoint of the table
//! - [`search`] - searches the catalog
//! - [`request`] - sends a custom request to an arbitrary url
//!
//! ## Usage
//!
//! ```bash
//! amkit auth
//! amkit get album --id 1564530719
//! amkit get albums --library --param limit=5
//! amkit search "daft punk" --types albums,songs
//! ```
//!
//! Fatal errors terminate the process through [`crate::error!`]. Library
//! calls return [`crate::Error`] so these functions are the only place where
//! errors turn into an exit code.

mod auth;
mod get;
mod output;
mod request;
mod search;
mod shared;
mod token;

pub use auth::auth;
pub use auth::logout;
pub use get::{GetOptions, get};
pub use request::request;
pub use search::search;
pub use token::token;
