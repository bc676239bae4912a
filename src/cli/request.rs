use reqwest::Method;
use serde_json::Value;

use crate::{
    cli::{output, shared},
    error,
    types::ResourceType,
};

/// Sends a request to `url`, which may be absolute or relative to the API root.
pub async fn request(
    method: String,
    url: String,
    library: bool,
    params: Vec<(String, String)>,
    body: Option<String>,
    raw_json: bool,
) {
    let method = match Method::from_bytes(method.to_uppercase().as_bytes()) {
        Ok(method) => method,
        Err(_) => error!("Invalid http method `{}`", method),
    };

    let body: Option<Value> = match body {
        Some(body) => match serde_json::from_str(&body) {
            Ok(value) => Some(value),
            Err(e) => error!("Request body is not valid JSON. Err: {}", e),
        },
        None => None,
    };

    let settings = shared::load_settings();
    let client = shared::build_client(&settings).await;

    let url = if url.starts_with("http://") || url.starts_with("https://") {
        url
    } else {
        client.url(&url)
    };
    let resource = if library {
        ResourceType::Library
    } else {
        ResourceType::Catalog
    };

    match client
        .execute(method, &url, &params, resource, body.as_ref())
        .await
    {
        Ok(payload) => output::print_payload(payload, raw_json),
        Err(e) => error!("Request to {} failed. Err: {}", url, e),
    }
}
