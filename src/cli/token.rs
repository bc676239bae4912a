use crate::{cli::shared, error, info};

/// Signs a developer token and prints it, optionally with its claims.
pub async fn token(show_claims: bool) {
    let settings = shared::load_settings();
    let mut authority = shared::build_authority(&settings).await;

    let token = match authority.generate_developer_token() {
        Ok(token) => token,
        Err(e) => error!("Cannot sign developer token. Err: {}", e),
    };

    println!("{}", token.as_str());

    if show_claims {
        match token.claims() {
            Some(claims) => {
                info!("iss: {}", claims.iss);
                info!("iat: {} ({})", claims.iat, token.issued_at());
                info!("exp: {} ({})", claims.exp, token.expires_at());
            }
            None => error!("Cannot decode claims of the signed token"),
        }
    }
}
