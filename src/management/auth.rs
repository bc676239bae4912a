use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};

use crate::{
    applemusic::auth::Authorizer,
    config::MAX_SESSION_LENGTH_HOURS,
    error::{Error, Result},
    types::{Credential, DeveloperToken, DeveloperTokenClaims, UserToken},
};

/// Signs a developer token valid from `now` for `session_length`.
///
/// Header `{alg: ES256, kid}`, payload `{iss: team_id, iat, exp}`.
///
/// # Errors
///
/// - [`Error::Config`] when `now + session_length` is not a representable time
/// - [`Error::Signing`] when the private key is not a usable P-256 key
pub fn sign_developer_token(
    credential: &Credential,
    now: DateTime<Utc>,
    session_length: Duration,
) -> Result<DeveloperToken> {
    let expires_at = now.checked_add_signed(session_length).ok_or_else(|| {
        Error::Config(format!(
            "session length of {} hours is out of range",
            session_length.num_hours()
        ))
    })?;
    let claims = DeveloperTokenClaims {
        iss: credential.team_id.clone(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };

    let mut header = Header::new(Algorithm::ES256);
    header.kid = Some(credential.key_id.clone());

    let key = EncodingKey::from_ec_pem(credential.private_key.as_bytes())?;
    let value = jsonwebtoken::encode(&header, &claims, &key)?;

    Ok(DeveloperToken::new(value, now, expires_at))
}

/// Owns the credential and the two tokens derived from it.
///
/// Tokens are only ever replaced as a whole, a failed regeneration keeps the
/// previous value.
#[derive(Debug)]
pub struct TokenAuthority {
    credential: Credential,
    session_length_hours: i64,
    developer_token: Option<DeveloperToken>,
    user_token: Option<UserToken>,
    authorizer: Authorizer,
}

impl TokenAuthority {
    /// Creates an authority without any token.
    ///
    /// `session_length_hours` is checked when a token is signed, a value
    /// outside `1..=MAX_SESSION_LENGTH_HOURS` makes signing fail with
    /// [`Error::Config`].
    pub fn new(credential: Credential, session_length_hours: i64, authorizer: Authorizer) -> Self {
        TokenAuthority {
            credential,
            session_length_hours,
            developer_token: None,
            user_token: None,
            authorizer,
        }
    }

    /// Lifetime of the developer tokens this authority signs.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] when the configured hours are not in
    /// `1..=MAX_SESSION_LENGTH_HOURS`.
    pub fn session_length(&self) -> Result<Duration> {
        let hours = self.session_length_hours;
        if !(1..=MAX_SESSION_LENGTH_HOURS).contains(&hours) {
            return Err(Error::Config(format!(
                "session length must be between 1 and {} hours, got {}",
                MAX_SESSION_LENGTH_HOURS, hours
            )));
        }
        Duration::try_hours(hours)
            .ok_or_else(|| Error::Config(format!("session length of {} hours is out of range", hours)))
    }

    /// The authorizer used by [`Self::generate_user_token`].
    pub fn authorizer(&self) -> &Authorizer {
        &self.authorizer
    }

    pub fn generate_developer_token(&mut self) -> Result<DeveloperToken> {
        self.generate_developer_token_at(Utc::now())
    }

    pub fn generate_developer_token_at(&mut self, now: DateTime<Utc>) -> Result<DeveloperToken> {
        let token = sign_developer_token(&self.credential, now, self.session_length()?)?;
        self.developer_token = Some(token.clone());
        Ok(token)
    }

    /// `false` when no token was issued yet, check [`Self::developer_token`] for presence.
    pub fn is_token_expired(&self) -> bool {
        self.is_token_expired_at(Utc::now())
    }

    pub fn is_token_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.developer_token
            .as_ref()
            .is_some_and(|token| token.is_expired_at(now))
    }

    /// Last signed developer token, expired or not.
    pub fn developer_token(&self) -> Option<&DeveloperToken> {
        self.developer_token.as_ref()
    }

    /// User token from the last authorization or from [`Self::set_user_token`].
    pub fn user_token(&self) -> Option<&UserToken> {
        self.user_token.as_ref()
    }

    /// Seeds a user token obtained earlier, e.g. from [`crate::UserTokenCache`].
    pub fn set_user_token(&mut self, token: UserToken) {
        self.user_token = Some(token);
    }

    pub fn clear_user_token(&mut self) {
        self.user_token = None;
    }

    /// Returns a usable developer token, signing a new one when it is absent
    /// or expired. The flag tells whether a new token was signed.
    pub fn ensure_developer_token(&mut self) -> Result<(DeveloperToken, bool)> {
        self.ensure_developer_token_at(Utc::now())
    }

    pub fn ensure_developer_token_at(&mut self, now: DateTime<Utc>) -> Result<(DeveloperToken, bool)> {
        match &self.developer_token {
            Some(token) if !token.is_expired_at(now) => Ok((token.clone(), false)),
            _ => Ok((self.generate_developer_token_at(now)?, true)),
        }
    }

    /// Runs the interactive authorization and stores the user token.
    ///
    /// The stored user token is cleared first, so it stays absent when the
    /// authorization fails.
    pub async fn generate_user_token(&mut self) -> Result<UserToken> {
        let (developer_token, _) = self.ensure_developer_token()?;
        self.user_token = None;

        let token = self.authorizer.authorize(&developer_token).await?;
        self.user_token = Some(token.clone());
        Ok(token)
    }
}
