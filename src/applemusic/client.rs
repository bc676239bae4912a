use std::{sync::Arc, time::Duration};

use reqwest::{
    Method, Response, StatusCode,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{
    applemusic::endpoints::{Endpoint, PathArgs},
    config::{DEFAULT_MAX_RETRIES, DEFAULT_STOREFRONT, Settings},
    error::{Error, Result},
    management::{TokenAuthority, UserTokenCache},
    types::{ResourceResponse, ResourceType, UserToken},
    utils, warning,
};

pub const API_ROOT: &str = "https://api.music.apple.com/v1/";
pub const USER_TOKEN_HEADER: &str = "Music-User-Token";

/// Successful response of [`Client::execute`].
#[derive(Debug)]
pub enum Payload {
    /// Decoded body of a 2xx response.
    Json(Value),
    /// Undecoded response for `204 No Content` and empty bodies.
    Raw(Response),
}

impl Payload {
    /// Borrowed JSON body, `None` for raw responses.
    pub fn json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Raw(_) => None,
        }
    }

    /// Owned JSON body.
    ///
    /// # Returns
    ///
    /// The decoded value, or `None` when the response had no body.
    pub fn into_json(self) -> Option<Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Raw(_) => None,
        }
    }

    /// Status of the response. Decoded bodies only come from 2xx responses
    /// and report `200 OK`.
    pub fn status(&self) -> StatusCode {
        match self {
            Payload::Json(_) => StatusCode::OK,
            Payload::Raw(response) => response.status(),
        }
    }

    /// Decodes the body as a resource document, empty for raw responses.
    pub fn into_resources(self) -> Result<ResourceResponse> {
        match self {
            Payload::Json(value) => Ok(serde_json::from_value(value)?),
            Payload::Raw(_) => Ok(ResourceResponse::default()),
        }
    }
}

pub struct ClientBuilder {
    authority: TokenAuthority,
    base_url: String,
    storefront: String,
    max_retries: u32,
    timeout: Option<Duration>,
    session_reuse: bool,
    proxy: Option<String>,
    cache: Option<UserTokenCache>,
}

impl ClientBuilder {
    /// Root every endpoint path is joined to, [`API_ROOT`] by default.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Storefront substituted into catalog paths.
    pub fn storefront(mut self, storefront: impl Into<String>) -> Self {
        self.storefront = storefront.into();
        self
    }

    /// Total attempts per request, `0` is treated as one.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Per request timeout, `None` waits indefinitely.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// `false` builds a new HTTP client for every attempt.
    pub fn session_reuse(mut self, session_reuse: bool) -> Self {
        self.session_reuse = session_reuse;
        self
    }

    /// Proxy url every request is routed through.
    pub fn proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    /// Persists user tokens obtained by the client and drops rejected ones.
    pub fn user_token_cache(mut self, cache: UserTokenCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Applies the dispatching part of `settings`.
    pub fn settings(self, settings: &Settings) -> Self {
        self.storefront(settings.storefront.clone())
            .max_retries(settings.max_retries)
            .timeout(settings.request_timeout)
            .session_reuse(settings.session_reuse)
            .proxy(settings.proxy.clone())
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] when the proxy url is invalid or the HTTP
    /// client cannot be set up.
    pub fn build(self) -> Result<Client> {
        let http = if self.session_reuse {
            Some(build_http_client(self.timeout, self.proxy.as_deref())?)
        } else {
            None
        };

        Ok(Client {
            http,
            authority: Arc::new(Mutex::new(self.authority)),
            base_url: self.base_url,
            storefront: self.storefront,
            max_retries: self.max_retries,
            timeout: self.timeout,
            proxy: self.proxy,
            cache: self.cache,
        })
    }
}

fn build_http_client(timeout: Option<Duration>, proxy: Option<&str>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .user_agent(concat!("amkit/", env!("CARGO_PKG_VERSION")));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(proxy) = proxy {
        builder = builder.proxy(reqwest::Proxy::all(proxy)?);
    }
    Ok(builder.build()?)
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| {
        Error::AuthorizationFailed("token contains characters not allowed in a header".to_string())
    })
}

/// Dispatches requests to the Apple Music API.
///
/// Picks the header set from the resource class, retries transport errors,
/// `429` and `5xx` responses up to `max_retries` attempts and decodes JSON.
pub struct Client {
    http: Option<reqwest::Client>,
    authority: Arc<Mutex<TokenAuthority>>,
    base_url: String,
    storefront: String,
    max_retries: u32,
    timeout: Option<Duration>,
    proxy: Option<String>,
    cache: Option<UserTokenCache>,
}

impl Client {
    /// Starts a builder with the production API root and default settings.
    ///
    /// # Arguments
    ///
    /// * `authority` - token state the client signs and authorizes with
    pub fn builder(authority: TokenAuthority) -> ClientBuilder {
        ClientBuilder {
            authority,
            base_url: API_ROOT.to_string(),
            storefront: DEFAULT_STOREFRONT.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            timeout: None,
            session_reuse: true,
            proxy: None,
            cache: None,
        }
    }

    /// Shared token state, lock it to inspect or seed tokens.
    pub fn authority(&self) -> Arc<Mutex<TokenAuthority>> {
        Arc::clone(&self.authority)
    }

    /// Root the endpoint paths are joined to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Storefront used when a call does not name one.
    pub fn storefront(&self) -> &str {
        &self.storefront
    }

    /// Absolute url for a path relative to the API root.
    pub fn url(&self, path: &str) -> String {
        utils::join_url(&self.base_url, &[path])
    }

    /// Calls one endpoint of the table.
    ///
    /// `resource` defaults to the endpoint's natural class, `args.storefront`
    /// to the client storefront.
    pub async fn call(
        &self,
        endpoint: Endpoint,
        args: &PathArgs,
        params: &[(String, String)],
        resource: Option<ResourceType>,
        body: Option<&Value>,
    ) -> Result<Payload> {
        let resource = resource.unwrap_or_else(|| endpoint.default_resource());
        let args = args.clone().or_storefront(&self.storefront);
        let path = endpoint.path(resource, &args)?;
        let url = self.url(&path);

        self.execute(endpoint.route().method, &url, params, resource, body)
            .await
    }

    /// Like [`Client::call`] but decodes the resource document.
    pub async fn resources(
        &self,
        endpoint: Endpoint,
        args: &PathArgs,
        params: &[(String, String)],
        resource: Option<ResourceType>,
    ) -> Result<ResourceResponse> {
        self.call(endpoint, args, params, resource, None)
            .await?
            .into_resources()
    }

    /// Catalog search in the client storefront.
    pub async fn search(
        &self,
        term: &str,
        types: &str,
        limit: Option<u32>,
    ) -> Result<ResourceResponse> {
        let mut params = vec![
            ("term".to_string(), term.to_string()),
            ("types".to_string(), types.to_string()),
        ];
        if let Some(limit) = limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        self.resources(Endpoint::Search, &PathArgs::new(), &params, None)
            .await
    }

    /// Sends one request, retrying retriable failures.
    ///
    /// # Errors
    ///
    /// - [`Error::Status`] for a non-retriable response, without retry
    /// - [`Error::RetriesExhausted`] when every attempt failed
    /// - token errors from header selection ([`Error::Signing`],
    ///   [`Error::AuthorizationFailed`])
    pub async fn execute(
        &self,
        method: Method,
        url: &str,
        params: &[(String, String)],
        resource: ResourceType,
        body: Option<&Value>,
    ) -> Result<Payload> {
        let headers = self.headers(resource).await?;
        let attempts = self.max_retries.max(1);
        let mut last_error: Option<Error> = None;

        for _ in 0..attempts {
            match self.send(&method, url, params, &headers, body).await {
                Ok(payload) => return Ok(payload),
                Err(e) if e.is_retriable() => last_error = Some(e),
                Err(e) => {
                    if resource == ResourceType::Library && e.is_unauthorized() {
                        self.forget_user_token().await;
                    }
                    return Err(e);
                }
            }
        }

        Err(Error::RetriesExhausted {
            attempts,
            last_error: last_error.map(|e| e.to_string()).unwrap_or_default(),
        })
    }

    async fn send(
        &self,
        method: &Method,
        url: &str,
        params: &[(String, String)],
        headers: &HeaderMap,
        body: Option<&Value>,
    ) -> Result<Payload> {
        let client = match &self.http {
            Some(client) => client.clone(),
            None => build_http_client(self.timeout, self.proxy.as_deref())?,
        };

        let mut request = client.request(method.clone(), url).headers(headers.clone());
        if !params.is_empty() {
            request = request.query(params);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Status { status, body });
        }

        if status == StatusCode::NO_CONTENT || response.content_length() == Some(0) {
            return Ok(Payload::Raw(response));
        }

        // a malformed body is not worth another attempt, keep it out of Transport
        let bytes = response.bytes().await?;
        Ok(Payload::Json(serde_json::from_slice(&bytes)?))
    }

    /// Header set for `resource`, refreshing tokens as needed.
    ///
    /// An expired developer token invalidates the user token, since the user
    /// token was issued for the page that embedded the old one. A user token
    /// loaded from the cache is kept while no developer token has been signed
    /// in this process, so the pairing is only enforced after an expiry.
    async fn headers(&self, resource: ResourceType) -> Result<HeaderMap> {
        let mut authority = self.authority.lock().await;
        let mut headers = HeaderMap::new();

        if resource == ResourceType::Library && authority.is_token_expired() {
            authority.clear_user_token();
        }

        let (developer_token, _) = authority.ensure_developer_token()?;
        headers.insert(
            AUTHORIZATION,
            header_value(&format!("Bearer {}", developer_token.as_str()))?,
        );

        if resource == ResourceType::Library {
            let user_token = match authority.user_token() {
                Some(token) => token.clone(),
                None => {
                    let token = authority.generate_user_token().await?;
                    self.remember_user_token(&token).await;
                    token
                }
            };
            headers.insert(USER_TOKEN_HEADER, header_value(user_token.as_str())?);
        }

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    async fn remember_user_token(&self, token: &UserToken) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.persist(token).await {
                warning!("Failed to cache user token: {}", e);
            }
        }
    }

    async fn forget_user_token(&self) {
        self.authority.lock().await.clear_user_token();
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.clear().await {
                warning!("Failed to clear cached user token: {}", e);
            }
        }
    }
}
