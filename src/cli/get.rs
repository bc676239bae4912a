use serde_json::Value;

use crate::{
    Endpoint, PathArgs,
    applemusic::endpoints::rating_body,
    cli::{output, shared},
    error,
    types::ResourceType,
};

pub struct GetOptions {
    pub endpoint: Endpoint,
    pub args: PathArgs,
    pub resource: Option<ResourceType>,
    pub params: Vec<(String, String)>,
    pub rating: Option<i8>,
    pub body: Option<String>,
    pub raw_json: bool,
}

/// Calls one endpoint of the table and prints the result.
pub async fn get(options: GetOptions) {
    let body: Option<Value> = match (&options.body, options.rating) {
        (Some(body), _) => match serde_json::from_str(body) {
            Ok(value) => Some(value),
            Err(e) => error!("Request body is not valid JSON. Err: {}", e),
        },
        (None, Some(rating)) => Some(rating_body(rating)),
        (None, None) => None,
    };

    let settings = shared::load_settings();
    let client = shared::build_client(&settings).await;
    let resource = options
        .resource
        .unwrap_or_else(|| options.endpoint.default_resource());

    // the library flow may open a browser, keep the terminal clear for it
    let pb = (resource == ResourceType::Catalog)
        .then(|| shared::spinner(&format!("Fetching {}...", options.endpoint.name())));

    let result = client
        .call(
            options.endpoint,
            &options.args,
            &options.params,
            Some(resource),
            body.as_ref(),
        )
        .await;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    match result {
        Ok(payload) => output::print_payload(payload, options.raw_json),
        Err(e) => error!("Request to {} failed. Err: {}", options.endpoint.name(), e),
    }
}
