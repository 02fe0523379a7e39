use serde::{Deserialize, Serialize};
use std::fmt;

/// Audio features of a single track as reported by the Spotify API
///
/// Every field except `tempo` lies in [0, 1]; `tempo` is in beats per minute.
/// Extra fields in the API payload (key, loudness, ...) are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatureSet {
    pub danceability: f64,
    pub energy: f64,
    pub valence: f64,
    pub tempo: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
}

/// The features compared by the similarity scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFeature {
    Danceability,
    Energy,
    Valence,
    Tempo,
    Acousticness,
    Instrumentalness,
}

impl AudioFeatureSet {
    #[inline]
    pub fn value(&self, feature: AudioFeature) -> f64 {
        match feature {
            AudioFeature::Danceability => self.danceability,
            AudioFeature::Energy => self.energy,
            AudioFeature::Valence => self.valence,
            AudioFeature::Tempo => self.tempo,
            AudioFeature::Acousticness => self.acousticness,
            AudioFeature::Instrumentalness => self.instrumentalness,
        }
    }
}

/// Mood categories, in the order the classifier evaluates them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoodLabel {
    #[serde(rename = "Energetic & Happy")]
    EnergeticHappy,
    #[serde(rename = "Dance/Party")]
    DanceParty,
    #[serde(rename = "Intense")]
    Intense,
    #[serde(rename = "Sad/Melancholic")]
    SadMelancholic,
    #[serde(rename = "Calm & Happy")]
    CalmHappy,
    #[serde(rename = "Calm/Chill")]
    CalmChill,
    #[serde(rename = "Happy")]
    Happy,
    #[serde(rename = "Sad")]
    Sad,
    #[serde(rename = "Balanced")]
    Balanced,
}

impl MoodLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoodLabel::EnergeticHappy => "Energetic & Happy",
            MoodLabel::DanceParty => "Dance/Party",
            MoodLabel::Intense => "Intense",
            MoodLabel::SadMelancholic => "Sad/Melancholic",
            MoodLabel::CalmHappy => "Calm & Happy",
            MoodLabel::CalmChill => "Calm/Chill",
            MoodLabel::Happy => "Happy",
            MoodLabel::Sad => "Sad",
            MoodLabel::Balanced => "Balanced",
        }
    }
}

impl fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mean values over a batch of feature sets
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureAverages {
    pub energy: f64,
    pub valence: f64,
    pub danceability: f64,
    pub tempo: f64,
}

/// Classified mood together with the averages that produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoodResult {
    pub label: MoodLabel,
    pub averages: FeatureAverages,
}

/// Similarity between two feature sets, 1.0 meaning identical
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityScore {
    pub score: f64,
    pub left: AudioFeatureSet,
    pub right: AudioFeatureSet,
}

/// Target audio features passed to the recommendation endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RecommendationTargets {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_danceability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_energy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_valence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_tempo: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_acousticness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_instrumentalness: Option<f64>,
}

impl RecommendationTargets {
    /// Target every compared feature at the values of `features`
    pub fn matching(features: &AudioFeatureSet) -> Self {
        Self {
            target_danceability: Some(features.danceability),
            target_energy: Some(features.energy),
            target_valence: Some(features.valence),
            target_tempo: Some(features.tempo),
            target_acousticness: Some(features.acousticness),
            target_instrumentalness: Some(features.instrumentalness),
        }
    }

    /// Query string pairs for the targets that are set
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("target_danceability", self.target_danceability),
            ("target_energy", self.target_energy),
            ("target_valence", self.target_valence),
            ("target_tempo", self.target_tempo),
            ("target_acousticness", self.target_acousticness),
            ("target_instrumentalness", self.target_instrumentalness),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v.to_string())))
        .collect()
    }
}

/// Recommended track annotated with its similarity to the seed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredTrack {
    pub name: String,
    pub artists: String,
    pub album: String,
    pub album_art: Option<String>,
    /// Percentage, rounded to one decimal place
    pub similarity: f64,
    pub track_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_set_ignores_extra_fields() {
        let json = r#"{
            "danceability": 0.8, "energy": 0.7, "valence": 0.6, "tempo": 120.0,
            "acousticness": 0.1, "instrumentalness": 0.05,
            "key": 5, "loudness": -5.2, "id": "abc", "type": "audio_features"
        }"#;

        let features: AudioFeatureSet = serde_json::from_str(json).unwrap();
        assert_eq!(features.tempo, 120.0);
        assert_eq!(features.value(AudioFeature::Instrumentalness), 0.05);
    }

    #[test]
    fn test_mood_label_serializes_as_display_string() {
        let json = serde_json::to_string(&MoodLabel::EnergeticHappy).unwrap();
        assert_eq!(json, r#""Energetic & Happy""#);
        assert_eq!(MoodLabel::CalmChill.to_string(), "Calm/Chill");
    }

    #[test]
    fn test_targets_query_pairs_skip_unset() {
        let targets = RecommendationTargets {
            target_energy: Some(0.8),
            target_valence: Some(0.7),
            ..Default::default()
        };

        let pairs = targets.query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("target_energy", "0.8".to_string()),
                ("target_valence", "0.7".to_string()),
            ]
        );
    }
}
