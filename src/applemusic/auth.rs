use std::{
    fmt, io,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
    time::Duration,
};

use tokio::sync::{Mutex, oneshot};

use crate::{
    api,
    config::{DEFAULT_AUTH_TIMEOUT_SECS, DEFAULT_SERVER_PORT, Settings},
    error::{Error, Result},
    info,
    server::{bind_listener, start_callback_server},
    types::{AuthSession, DeveloperToken, UserToken},
    warning,
};

/// Opens a url for the user. Returns an error when no browser could be started.
pub type BrowserLauncher = Arc<dyn Fn(&str) -> io::Result<()> + Send + Sync>;

const DEFAULT_APP_NAME: &str = "amkit";

/// Obtains a user token through MusicKit JS running in the user's browser.
///
/// Each call to [`Authorizer::authorize`] performs one attempt:
/// 1. **Bind**: the local listener is bound first, a busy port fails here
///    before any browser is opened
/// 2. **Serve**: every `GET` returns a page embedding the developer token and
///    the callback url `http://{address}:{port}/token`
/// 3. **Browser Launch**: the root url is opened in the default browser, or
///    printed for the user when no browser can be started
/// 4. **Wait**: the attempt resolves as soon as the page posts a token to
///    `/token`, regardless of how many times the page was loaded
/// 5. **Shutdown**: the listener is stopped before returning
///
/// Without a timeout the wait only ends when a token arrives. Closing the
/// browser tab does not cancel it.
#[derive(Clone)]
pub struct Authorizer {
    address: IpAddr,
    port: u16,
    timeout: Option<Duration>,
    app_name: String,
    launcher: BrowserLauncher,
}

impl Default for Authorizer {
    fn default() -> Self {
        Self::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_SERVER_PORT)
    }
}

impl fmt::Debug for Authorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authorizer")
            .field("address", &self.address)
            .field("port", &self.port)
            .field("timeout", &self.timeout)
            .field("app_name", &self.app_name)
            .finish_non_exhaustive()
    }
}

impl Authorizer {
    pub fn new(address: IpAddr, port: u16) -> Self {
        Self {
            address,
            port,
            timeout: Some(Duration::from_secs(DEFAULT_AUTH_TIMEOUT_SECS)),
            app_name: DEFAULT_APP_NAME.to_string(),
            launcher: Arc::new(|url: &str| webbrowser::open(url)),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let address: IpAddr = settings.server_address.parse().map_err(|_| {
            Error::Config(format!(
                "SERVER_ADDRESS has an invalid value `{}`",
                settings.server_address
            ))
        })?;
        Ok(Self::new(address, settings.server_port).with_timeout(settings.auth_timeout))
    }

    /// `None` waits until a token arrives.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Name MusicKit shows on its sign-in sheet.
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    /// Replaces the default `webbrowser::open` launcher.
    pub fn with_browser_launcher<F>(mut self, launcher: F) -> Self
    where
        F: Fn(&str) -> io::Result<()> + Send + Sync + 'static,
    {
        self.launcher = Arc::new(launcher);
        self
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Runs one authorization attempt for `developer_token`.
    ///
    /// # Errors
    ///
    /// - [`Error::Bind`] when the listener cannot be bound
    /// - [`Error::AuthorizationFailed`] when no token arrived before the
    ///   timeout or the server stopped on its own
    pub async fn authorize(&self, developer_token: &DeveloperToken) -> Result<UserToken> {
        let listener = bind_listener(self.bind_addr())?;
        let local_addr = listener.local_addr().map_err(|source| Error::Bind {
            addr: self.bind_addr(),
            source,
        })?;

        let auth_url = format!("http://{}", local_addr);
        let callback_url = format!("{}{}", auth_url, api::TOKEN_PATH);

        let (token_tx, token_rx) = oneshot::channel();
        let session = Arc::new(Mutex::new(AuthSession {
            bind_address: local_addr.ip(),
            bind_port: local_addr.port(),
            page: api::render_page(developer_token.as_str(), &callback_url, &self.app_name),
            received_token: None,
            request_count: 0,
            token_tx: Some(token_tx),
        }));

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let mut server = tokio::spawn(start_callback_server(
            listener,
            Arc::clone(&session),
            shutdown_rx,
        ));

        if (self.launcher)(&auth_url).is_ok() {
            info!("Opened {} in your browser", auth_url);
        } else {
            warning!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                auth_url
            );
        }

        let deadline = self.timeout;
        let mut server_stopped = false;
        let received = tokio::select! {
            token = token_rx => token.ok(),
            result = &mut server => {
                server_stopped = true;
                match result {
                    Ok(Err(e)) => warning!("Authorization server stopped: {}", e),
                    Err(e) => warning!("Authorization server crashed: {}", e),
                    Ok(Ok(())) => {}
                }
                None
            }
            _ = wait_for(deadline) => None,
        };

        if !server_stopped {
            let _ = shutdown_tx.send(());
            if let Ok(Err(e)) = server.await {
                warning!("Authorization server did not shut down cleanly: {}", e);
            }
        }

        let page_loads = session.lock().await.request_count;
        match received {
            Some(token) => Ok(token),
            None => {
                if page_loads == 0 {
                    warning!("The authorization page was never loaded.");
                }
                Err(Error::AuthorizationFailed(
                    "Cannot retrieve user token".to_string(),
                ))
            }
        }
    }
}

async fn wait_for(limit: Option<Duration>) {
    match limit {
        Some(limit) => tokio::time::sleep(limit).await,
        None => std::future::pending::<()>().await,
    }
}
