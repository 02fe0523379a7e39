//! Tunedash - personal Spotify dashboard
//!
//! Serves now-playing info and playback controls on top of the Spotify Web
//! API, and derives a listening mood, track similarity scores and smart
//! playlists from audio features.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{calculate_similarity, classify_mood, rank_by_similarity};
pub use models::{AudioFeatureSet, MoodLabel, MoodResult, SimilarityScore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let features = AudioFeatureSet {
            danceability: 0.5,
            energy: 0.5,
            valence: 0.5,
            tempo: 110.0,
            acousticness: 0.5,
            instrumentalness: 0.5,
        };
        assert_eq!(calculate_similarity(&features, &features), 1.0);
        assert_eq!(classify_mood(0.3, 0.2, 0.1), MoodLabel::SadMelancholic);
    }
}
