use crate::{UserTokenCache, cli::shared, error, info, success, warning};

/// Runs the interactive authorization and caches the resulting user token.
pub async fn auth() {
    let settings = shared::load_settings();
    let mut authority = shared::build_authority(&settings).await;

    if let Some(timeout) = authority.authorizer().timeout() {
        info!(
            "Waiting up to {} seconds for authorization in the browser",
            timeout.as_secs()
        );
    }

    let token = match authority.generate_user_token().await {
        Ok(token) => token,
        Err(e) => error!("Authorization failed. Err: {}", e),
    };

    let cache = UserTokenCache::new();
    if let Err(e) = cache.persist(&token).await {
        error!("Failed to cache user token. Err: {}", e);
    }

    success!("Authorization successful");
    info!("User token stored in {}", cache.path().display());
}

/// Removes the cached user token.
pub async fn logout() {
    let cache = UserTokenCache::new();

    match cache.load().await {
        Ok(None) => {
            info!("No user token cached, nothing to do.");
            return;
        }
        Ok(Some(_)) => {}
        Err(e) => warning!("Cached user token is unreadable. Err: {}", e),
    }

    if let Err(e) = cache.clear().await {
        error!("Failed to remove {}. Err: {}", cache.path().display(), e);
    }
    success!("Logged out");
}
