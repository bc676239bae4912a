use std::{io, net::SocketAddr, sync::Arc};

use axum::{Extension, Router, routing::get};
use tokio::{
    net::{TcpListener, TcpSocket},
    sync::{Mutex, oneshot},
};

use crate::{
    api,
    error::{Error, Result},
    types::AuthSession,
};

/// Binds the authorization listener with `SO_REUSEADDR` set.
///
/// Port `0` asks the OS for a free port, read it back with `local_addr()`.
pub fn bind_listener(addr: SocketAddr) -> Result<TcpListener> {
    let bind_err = |source: io::Error| Error::Bind { addr, source };

    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()
    } else {
        TcpSocket::new_v6()
    }
    .map_err(bind_err)?;

    socket.set_reuseaddr(true).map_err(bind_err)?;
    socket.bind(addr).map_err(bind_err)?;
    socket.listen(16).map_err(bind_err)
}

pub fn router(session: Arc<Mutex<AuthSession>>) -> Router {
    Router::new()
        .route("/", get(api::page))
        .route(api::TOKEN_PATH, get(api::page).post(api::token))
        .fallback(api::page)
        .layer(Extension(session))
}

/// Serves the authorization routes until `shutdown` fires or its sender is dropped.
pub async fn start_callback_server(
    listener: TcpListener,
    session: Arc<Mutex<AuthSession>>,
    shutdown: oneshot::Receiver<()>,
) -> io::Result<()> {
    axum::serve(listener, router(session))
        .with_graceful_shutdown(async {
            let _ = shutdown.await;
        })
        .await
}
