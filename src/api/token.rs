use std::sync::Arc;

use axum::{Extension, http::StatusCode, response::Json};
use serde_json::{Value, json};
use tokio::sync::Mutex;

use crate::{
    types::{AuthSession, UserToken},
    warning,
};

pub const TOKEN_PATH: &str = "/token";

/// Stores the posted body as the user token and wakes the waiting authorizer.
///
/// Only the first token resolves the wait, later posts just overwrite
/// `received_token`. An empty body is rejected and the wait goes on.
pub async fn token(
    Extension(session): Extension<Arc<Mutex<AuthSession>>>,
    body: String,
) -> (StatusCode, Json<Value>) {
    if body.trim().is_empty() {
        warning!("Authorization page posted an empty user token.");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "details": "missing user token" })),
        );
    }

    let token = UserToken::new(body);
    let mut session = session.lock().await;
    session.received_token = Some(token.clone());
    if let Some(tx) = session.token_tx.take() {
        // receiver is gone once the authorizer gave up
        let _ = tx.send(token);
    }

    (StatusCode::OK, Json(json!({ "details": "success" })))
}
