// Service exports
pub mod auth;
pub mod spotify;
pub mod token_cache;

pub use auth::{AuthError, SpotifyAuth, SpotifyCredentials};
pub use spotify::{RecommendationQuery, SpotifyClient, SpotifyError};
pub use token_cache::{TokenCache, TokenCacheError, TokenInfo};
