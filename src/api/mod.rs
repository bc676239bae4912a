//! # API Module
//!
//! HTTP handlers of the short-lived local server that drives the user
//! authorization flow.
//!
//! ## Endpoints
//!
//! - [`page`] - `GET` on any path. Serves the authorization page, which loads
//!   MusicKit JS, asks the user to sign in and posts the resulting user token
//!   back to `/token`.
//! - [`token`] - `POST /token`. Receives the user token as the raw request
//!   body and hands it to the waiting authorizer.
//!
//! Both handlers share one [`crate::types::AuthSession`] through an axum
//! [`Extension`](axum::Extension).
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use amkit::api::{page, token};
//!
//! let app = Router::new()
//!     .route("/token", get(page).post(token))
//!     .fallback(page);
//! ```

mod page;
mod token;

pub use page::{page, render_page};
pub use token::{TOKEN_PATH, token};
