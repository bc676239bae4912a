//! # Apple Music Integration Module
//!
//! Client side of the Apple Music API: the interactive user authorization,
//! the declarative endpoint table and the request dispatcher.
//!
//! ## Architecture
//!
//! ```text
//! CLI / library callers
//!          ↓
//! Client (request dispatcher, retry)
//!     ├── Endpoint table (method + path templates per resource class)
//!     └── TokenAuthority (developer token, user token)
//!              └── Authorizer (local page + browser round-trip)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! https://api.music.apple.com/v1/
//! ```
//!
//! ## Authentication
//!
//! Catalog endpoints need a developer token only: an ES256 JWT signed with the
//! team's MusicKit key (`iss` = team id, `kid` header = key id). Library
//! endpoints additionally need a `Music-User-Token`, which only a browser
//! running MusicKit JS can obtain. [`auth::Authorizer`] serves a page embedding
//! the developer token on a local port, opens the browser and waits for the
//! page to post the user token back.
//!
//! ## Error Handling
//!
//! Transport errors, `429` and `5xx` responses are retried without backoff up
//! to the configured attempt count. Other `4xx` responses fail immediately.
//! A `401`/`403` on a library call drops the stored user token so the next
//! call runs the authorization again.

pub mod auth;
pub mod client;
pub mod endpoints;
