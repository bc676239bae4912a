use std::sync::Arc;

use axum::{Extension, response::Html};
use tokio::sync::Mutex;

use crate::types::AuthSession;

const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <link rel="shortcut icon" href="#" />
    <title>{{app_name}} authorization</title>
</head>
<body>
    <p>Authorization</p>
    <button onclick="authorize()">Click to authorize</button>
    <p id="status"></p>
    <script src="https://js-cdn.music.apple.com/musickit/v1/musickit.js"></script>
    <script>
        function authorize() {
            const developerToken = '{{developer_token}}';
            const music = MusicKit.configure({
                developerToken: developerToken,
                app: {
                    name: '{{app_name}}',
                    build: '{{app_build}}'
                }
            });

            music.authorize().then(musicUserToken => {
                return fetch('{{callback_url}}', {
                    method: 'POST',
                    headers: {
                        'Content-Type': 'text/plain'
                    },
                    body: musicUserToken
                });
            }).then(() => {
                document.getElementById('status').textContent =
                    'Authorization successful. You can close this window.';
            }).catch(err => {
                document.getElementById('status').textContent =
                    'Authorization failed: ' + err;
            });
        }
    </script>
</body>
</html>
"##;

/// Renders the authorization page.
///
/// The developer token and callback url are substituted verbatim into the
/// script, the app name is escaped for a single quoted JS string.
pub fn render_page(developer_token: &str, callback_url: &str, app_name: &str) -> String {
    PAGE_TEMPLATE
        .replace("{{developer_token}}", developer_token)
        .replace("{{callback_url}}", callback_url)
        .replace("{{app_name}}", &escape_js(app_name))
        .replace("{{app_build}}", env!("CARGO_PKG_VERSION"))
}

fn escape_js(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('<', "\\x3c")
        .replace('>', "\\x3e")
}

pub async fn page(Extension(session): Extension<Arc<Mutex<AuthSession>>>) -> Html<String> {
    let mut session = session.lock().await;
    session.request_count += 1;
    Html(session.page.clone())
}
