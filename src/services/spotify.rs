use crate::models::spotify::{AudioFeaturesBatch, Paging, Recommendations};
use crate::models::{Artist, AudioFeatureSet, CurrentUser, Playback, Playlist, RecommendationTargets, TimeRange, Track};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

/// Maximum ids per audio-features request and tracks per playlist insert
const BATCH_LIMIT: usize = 100;

/// Maximum number of seeds the recommendation endpoint accepts
pub const MAX_SEEDS: usize = 5;

/// Errors that can occur when talking to the Spotify Web API
#[derive(Debug, Error)]
pub enum SpotifyError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Unauthorized: access token rejected")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Parameters for `GET /recommendations`
#[derive(Debug, Clone, Default)]
pub struct RecommendationQuery {
    pub seed_tracks: Vec<String>,
    pub limit: u32,
    pub min_tempo: Option<f64>,
    pub max_tempo: Option<f64>,
    pub targets: RecommendationTargets,
}

impl RecommendationQuery {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let seeds: Vec<&str> = self
            .seed_tracks
            .iter()
            .take(MAX_SEEDS)
            .map(String::as_str)
            .collect();

        let mut pairs = vec![
            ("seed_tracks", seeds.join(",")),
            ("limit", self.limit.to_string()),
        ];
        if let Some(min) = self.min_tempo {
            pairs.push(("min_tempo", min.to_string()));
        }
        if let Some(max) = self.max_tempo {
            pairs.push(("max_tempo", max.to_string()));
        }
        pairs.extend(self.targets.query_pairs());
        pairs
    }
}

/// Spotify Web API client
///
/// Stateless apart from the connection pool: every call takes the user's
/// access token, so the token cache stays the single owner of credentials.
pub struct SpotifyClient {
    base_url: String,
    client: Client,
}

impl SpotifyClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, SpotifyError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { base_url, client })
    }

    fn request(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        self.client.request(method, url).bearer_auth(token)
    }

    /// Map non-success statuses to errors
    async fn check(response: Response, what: &str) -> Result<Response, SpotifyError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
        tracing::debug!("{} failed: {} - {}", what, status, message);

        match status {
            StatusCode::UNAUTHORIZED => Err(SpotifyError::Unauthorized),
            StatusCode::NOT_FOUND => Err(SpotifyError::NotFound(what.to_string())),
            _ => Err(SpotifyError::ApiError {
                status: status.as_u16(),
                message,
            }),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, SpotifyError> {
        tracing::debug!("GET {}", path);

        let response = self.request(Method::GET, path, token).query(query).send().await?;
        let response = Self::check(response, path).await?;

        response
            .json()
            .await
            .map_err(|e| SpotifyError::InvalidResponse(format!("{}: {}", path, e)))
    }

    async fn command(
        &self,
        method: Method,
        token: &str,
        path: &str,
    ) -> Result<(), SpotifyError> {
        tracing::debug!("{} {}", method, path);

        let response = self
            .request(method, path, token)
            .header(reqwest::header::CONTENT_LENGTH, 0)
            .send()
            .await?;
        Self::check(response, path).await?;
        Ok(())
    }

    /// Current playback state, `None` when no device is active
    pub async fn current_playback(&self, token: &str) -> Result<Option<Playback>, SpotifyError> {
        let response = self.request(Method::GET, "/me/player", token).send().await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let response = Self::check(response, "/me/player").await?;
        let body = response.bytes().await?;
        if body.is_empty() {
            return Ok(None);
        }

        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|e| SpotifyError::InvalidResponse(format!("/me/player: {}", e)))
    }

    pub async fn start_playback(&self, token: &str) -> Result<(), SpotifyError> {
        self.command(Method::PUT, token, "/me/player/play").await
    }

    pub async fn pause_playback(&self, token: &str) -> Result<(), SpotifyError> {
        self.command(Method::PUT, token, "/me/player/pause").await
    }

    pub async fn next_track(&self, token: &str) -> Result<(), SpotifyError> {
        self.command(Method::POST, token, "/me/player/next").await
    }

    pub async fn previous_track(&self, token: &str) -> Result<(), SpotifyError> {
        self.command(Method::POST, token, "/me/player/previous").await
    }

    pub async fn current_user(&self, token: &str) -> Result<CurrentUser, SpotifyError> {
        self.get_json(token, "/me", &[]).await
    }

    pub async fn top_tracks(
        &self,
        token: &str,
        limit: u32,
        time_range: TimeRange,
    ) -> Result<Vec<Track>, SpotifyError> {
        let query = [
            ("limit", limit.to_string()),
            ("time_range", time_range.as_str().to_string()),
        ];
        let page: Paging<Track> = self.get_json(token, "/me/top/tracks", &query).await?;
        Ok(page.items)
    }

    pub async fn top_artists(
        &self,
        token: &str,
        limit: u32,
        time_range: TimeRange,
    ) -> Result<Vec<Artist>, SpotifyError> {
        let query = [
            ("limit", limit.to_string()),
            ("time_range", time_range.as_str().to_string()),
        ];
        let page: Paging<Artist> = self.get_json(token, "/me/top/artists", &query).await?;
        Ok(page.items)
    }

    pub async fn track(&self, token: &str, track_id: &str) -> Result<Track, SpotifyError> {
        let path = format!("/tracks/{}", urlencoding::encode(track_id));
        self.get_json(token, &path, &[]).await
    }

    /// Audio features for each id, in order
    ///
    /// Entries are `None` where the API has no analysis (local or
    /// unavailable tracks).
    pub async fn audio_features(
        &self,
        token: &str,
        ids: &[String],
    ) -> Result<Vec<Option<AudioFeatureSet>>, SpotifyError> {
        let mut features = Vec::with_capacity(ids.len());

        for chunk in ids.chunks(BATCH_LIMIT) {
            let query = [("ids", chunk.join(","))];
            let batch: AudioFeaturesBatch = self.get_json(token, "/audio-features", &query).await?;

            if batch.audio_features.len() != chunk.len() {
                return Err(SpotifyError::InvalidResponse(format!(
                    "expected {} audio features, got {}",
                    chunk.len(),
                    batch.audio_features.len()
                )));
            }
            features.extend(batch.audio_features);
        }

        Ok(features)
    }

    /// Audio features aligned with `tracks`; tracks without an id get `None`
    pub async fn audio_features_for(
        &self,
        token: &str,
        tracks: &[Track],
    ) -> Result<Vec<Option<AudioFeatureSet>>, SpotifyError> {
        let ids: Vec<String> = tracks.iter().filter_map(|t| t.id.clone()).collect();
        let mut fetched = self.audio_features(token, &ids).await?.into_iter();

        Ok(tracks
            .iter()
            .map(|t| match t.id {
                Some(_) => fetched.next().flatten(),
                None => None,
            })
            .collect())
    }

    pub async fn recommendations(
        &self,
        token: &str,
        query: &RecommendationQuery,
    ) -> Result<Vec<Track>, SpotifyError> {
        let recommendations: Recommendations = self
            .get_json(token, "/recommendations", &query.query_pairs())
            .await?;
        Ok(recommendations.tracks)
    }

    pub async fn create_playlist(
        &self,
        token: &str,
        user_id: &str,
        name: &str,
        public: bool,
    ) -> Result<Playlist, SpotifyError> {
        let path = format!("/users/{}/playlists", urlencoding::encode(user_id));
        tracing::debug!("POST {}", path);

        let response = self
            .request(Method::POST, &path, token)
            .json(&json!({ "name": name, "public": public }))
            .send()
            .await?;
        let response = Self::check(response, &path).await?;

        response
            .json()
            .await
            .map_err(|e| SpotifyError::InvalidResponse(format!("{}: {}", path, e)))
    }

    pub async fn add_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<(), SpotifyError> {
        let path = format!("/playlists/{}/tracks", urlencoding::encode(playlist_id));

        for chunk in uris.chunks(BATCH_LIMIT) {
            tracing::debug!("POST {} ({} uris)", path, chunk.len());

            let response = self
                .request(Method::POST, &path, token)
                .json(&json!({ "uris": chunk }))
                .send()
                .await?;
            Self::check(response, &path).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_query_pairs() {
        let query = RecommendationQuery {
            seed_tracks: (1..=7).map(|i| format!("s{}", i)).collect(),
            limit: 25,
            min_tempo: Some(100.0),
            max_tempo: Some(150.0),
            targets: RecommendationTargets {
                target_energy: Some(0.8),
                ..Default::default()
            },
        };

        let pairs = query.query_pairs();
        assert_eq!(pairs[0], ("seed_tracks", "s1,s2,s3,s4,s5".to_string()));
        assert!(pairs.contains(&("limit", "25".to_string())));
        assert!(pairs.contains(&("min_tempo", "100".to_string())));
        assert!(pairs.contains(&("max_tempo", "150".to_string())));
        assert!(pairs.contains(&("target_energy", "0.8".to_string())));
        assert!(!pairs.iter().any(|(k, _)| *k == "target_valence"));
    }

    #[test]
    fn test_client_creation() {
        let client = SpotifyClient::new("https://api.example/v1".to_string(), Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url, "https://api.example/v1");
    }
}
