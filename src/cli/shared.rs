use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    Authorizer, Client, TokenAuthority, UserTokenCache, config::Settings, error, warning,
};

pub(crate) fn load_settings() -> Settings {
    match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => error!(
            "Cannot load settings. Check {}. Err: {}",
            crate::config::env_path().display(),
            e
        ),
    }
}

pub(crate) async fn build_authority(settings: &Settings) -> TokenAuthority {
    let credential = match settings.credential().await {
        Ok(credential) => credential,
        Err(e) => error!("Cannot load signing key. Err: {}", e),
    };

    let authorizer = match Authorizer::from_settings(settings) {
        Ok(authorizer) => authorizer.with_app_name(env!("CARGO_PKG_NAME")),
        Err(e) => error!("{}", e),
    };

    TokenAuthority::new(credential, settings.session_length_hours, authorizer)
}

/// Client seeded with the cached user token, if any.
pub(crate) async fn build_client(settings: &Settings) -> Client {
    let mut authority = build_authority(settings).await;
    let cache = UserTokenCache::new();

    match cache.load().await {
        Ok(Some(token)) => authority.set_user_token(token),
        Ok(None) => {}
        Err(e) => warning!("Ignoring unreadable user token cache. Err: {}", e),
    }

    match Client::builder(authority)
        .settings(settings)
        .user_token_cache(cache)
        .build()
    {
        Ok(client) => client,
        Err(e) => error!("Cannot create http client. Err: {}", e),
    }
}

pub(crate) fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
