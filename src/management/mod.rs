mod auth;
mod cache;

pub use auth::TokenAuthority;
pub use auth::sign_developer_token;
pub use cache::UserTokenCache;
