use serde::{Deserialize, Serialize};
use crate::models::domain::{MoodLabel, ScoredTrack};

/// Response for `/api/now`
///
/// Only `playing` is present when nothing is playing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NowPlayingResponse {
    pub playing: bool,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub track: Option<NowPlayingTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NowPlayingTrack {
    pub is_playing: bool,
    pub track_name: String,
    pub artists: String,
    pub album: String,
    pub album_art: Option<String>,
    pub duration_ms: u64,
    pub progress_ms: Option<u64>,
    pub track_id: Option<String>,
}

/// Error body for `/api/now`, still carrying the `playing` flag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NowPlayingError {
    pub playing: bool,
    #[serde(flatten)]
    pub error: ErrorResponse,
}

/// Response for the playback control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Response for `/api/mood`, averages rounded to two decimals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodResponse {
    pub mood: MoodLabel,
    pub energy: f64,
    pub valence: f64,
    pub danceability: f64,
    pub tempo: f64,
}

/// Response for `/api/create_playlist`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub success: bool,
    pub playlist_name: String,
    pub playlist_id: String,
    pub tracks_added: usize,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WrappedTrack {
    pub name: String,
    pub artists: String,
    pub duration_ms: u64,
    pub album_art: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WrappedArtist {
    pub name: String,
    pub genres: String,
    pub image: Option<String>,
}

/// Response for `/api/wrapped`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WrappedResponse {
    pub top_tracks: Vec<WrappedTrack>,
    pub top_artists: Vec<WrappedArtist>,
    pub chart: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OriginalTrack {
    pub name: String,
    pub artists: String,
}

/// Response for `/api/similar`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarResponse {
    pub original_track: OriginalTrack,
    pub similar_tracks: Vec<ScoredTrack>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub authenticated: bool,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
