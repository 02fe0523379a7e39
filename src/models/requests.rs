use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Request to build a smart playlist
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_tempo_range"))]
pub struct CreatePlaylistRequest {
    #[validate(length(min = 1, max = 100))]
    #[serde(default = "default_playlist_name")]
    pub name: String,
    #[validate(length(min = 1))]
    #[serde(default = "default_mood")]
    pub mood: String,
    #[validate(range(max = 300))]
    #[serde(default = "default_tempo_min")]
    pub tempo_min: u32,
    #[validate(range(max = 300))]
    #[serde(default = "default_tempo_max")]
    pub tempo_max: u32,
}

impl Default for CreatePlaylistRequest {
    fn default() -> Self {
        Self {
            name: default_playlist_name(),
            mood: default_mood(),
            tempo_min: default_tempo_min(),
            tempo_max: default_tempo_max(),
        }
    }
}

fn default_playlist_name() -> String { "Smart Playlist".to_string() }
fn default_mood() -> String { "energetic".to_string() }
fn default_tempo_min() -> u32 { 100 }
fn default_tempo_max() -> u32 { 150 }

fn validate_tempo_range(req: &CreatePlaylistRequest) -> Result<(), ValidationError> {
    if req.tempo_min > req.tempo_max {
        return Err(ValidationError::new("tempo_min_exceeds_tempo_max"));
    }
    Ok(())
}

/// Query for the similar tracks endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarQuery {
    pub track_id: Option<String>,
}

/// Query the accounts service sends back to `/callback`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playlist_request_defaults() {
        let req: CreatePlaylistRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.name, "Smart Playlist");
        assert_eq!(req.mood, "energetic");
        assert_eq!(req.tempo_min, 100);
        assert_eq!(req.tempo_max, 150);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_playlist_request_rejects_inverted_tempo() {
        let req = CreatePlaylistRequest {
            tempo_min: 160,
            tempo_max: 120,
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_playlist_request_rejects_empty_name() {
        let req = CreatePlaylistRequest {
            name: String::new(),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
