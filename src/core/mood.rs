use crate::models::{AudioFeatureSet, FeatureAverages, MoodLabel, MoodResult, RecommendationTargets};

/// A single classification rule over (energy, valence, danceability)
type MoodRule = (fn(f64, f64, f64) -> bool, MoodLabel);

/// Ordered rules; the first predicate that holds decides the label.
/// Reordering changes results (e.g. high energy + high valence + high
/// danceability is "Energetic & Happy", never "Dance/Party").
const MOOD_RULES: [MoodRule; 8] = [
    (|e, v, _| e > 0.7 && v > 0.6, MoodLabel::EnergeticHappy),
    (|e, _, d| e > 0.7 && d > 0.7, MoodLabel::DanceParty),
    (|e, v, _| e > 0.6 && v < 0.4, MoodLabel::Intense),
    (|e, v, _| e < 0.4 && v < 0.4, MoodLabel::SadMelancholic),
    (|e, v, _| e < 0.5 && v > 0.5, MoodLabel::CalmHappy),
    (|e, _, _| e < 0.4, MoodLabel::CalmChill),
    (|_, v, _| v > 0.6, MoodLabel::Happy),
    (|_, v, _| v < 0.4, MoodLabel::Sad),
];

/// Classify a mood from averaged energy, valence and danceability
///
/// Inputs are expected in [0, 1] but are not validated. NaN never satisfies
/// a comparison, so it falls through to `Balanced`.
pub fn classify_mood(energy: f64, valence: f64, danceability: f64) -> MoodLabel {
    MOOD_RULES
        .iter()
        .find(|(matches, _)| matches(energy, valence, danceability))
        .map(|(_, label)| *label)
        .unwrap_or(MoodLabel::Balanced)
}

/// Average energy, valence, danceability and tempo over a batch
///
/// Returns `None` for an empty batch.
pub fn average_features(features: &[AudioFeatureSet]) -> Option<FeatureAverages> {
    if features.is_empty() {
        return None;
    }

    let n = features.len() as f64;
    let sum = features.iter().fold(
        FeatureAverages { energy: 0.0, valence: 0.0, danceability: 0.0, tempo: 0.0 },
        |mut acc, f| {
            acc.energy += f.energy;
            acc.valence += f.valence;
            acc.danceability += f.danceability;
            acc.tempo += f.tempo;
            acc
        },
    );

    Some(FeatureAverages {
        energy: sum.energy / n,
        valence: sum.valence / n,
        danceability: sum.danceability / n,
        tempo: sum.tempo / n,
    })
}

/// Average a batch of feature sets and classify the result
pub fn analyze_mood(features: &[AudioFeatureSet]) -> Option<MoodResult> {
    let averages = average_features(features)?;
    let label = classify_mood(averages.energy, averages.valence, averages.danceability);

    Some(MoodResult { label, averages })
}

/// Recommendation targets for a named playlist mood (case-insensitive)
///
/// Unknown moods only target a medium energy.
pub fn mood_targets(mood: &str) -> RecommendationTargets {
    let (energy, valence, danceability) = match mood.to_lowercase().as_str() {
        "energetic" => (0.8, Some(0.7), None),
        "calm" => (0.3, Some(0.5), None),
        "happy" => (0.6, Some(0.8), None),
        "sad" => (0.3, Some(0.2), None),
        "dance" => (0.8, None, Some(0.8)),
        _ => (0.5, None, None),
    };

    RecommendationTargets {
        target_energy: Some(energy),
        target_valence: valence,
        target_danceability: danceability,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(energy: f64, valence: f64, danceability: f64, tempo: f64) -> AudioFeatureSet {
        AudioFeatureSet {
            danceability,
            energy,
            valence,
            tempo,
            acousticness: 0.2,
            instrumentalness: 0.0,
        }
    }

    #[test]
    fn test_first_rule_wins_over_dance() {
        assert_eq!(classify_mood(0.8, 0.8, 0.9), MoodLabel::EnergeticHappy);
        assert_eq!(classify_mood(0.75, 0.65, 0.3), MoodLabel::EnergeticHappy);
    }

    #[test]
    fn test_each_rule() {
        assert_eq!(classify_mood(0.8, 0.5, 0.8), MoodLabel::DanceParty);
        assert_eq!(classify_mood(0.65, 0.3, 0.5), MoodLabel::Intense);
        assert_eq!(classify_mood(0.3, 0.2, 0.5), MoodLabel::SadMelancholic);
        assert_eq!(classify_mood(0.45, 0.55, 0.5), MoodLabel::CalmHappy);
        assert_eq!(classify_mood(0.3, 0.45, 0.5), MoodLabel::CalmChill);
        assert_eq!(classify_mood(0.55, 0.7, 0.5), MoodLabel::Happy);
        assert_eq!(classify_mood(0.55, 0.3, 0.5), MoodLabel::Sad);
        assert_eq!(classify_mood(0.55, 0.5, 0.5), MoodLabel::Balanced);
    }

    #[test]
    fn test_thresholds_are_strict() {
        // energy == 0.7 does not count as high energy
        assert_eq!(classify_mood(0.7, 0.9, 0.9), MoodLabel::Happy);
        // energy == 0.4 is not low, valence == 0.6 is not high
        assert_eq!(classify_mood(0.4, 0.45, 0.5), MoodLabel::Balanced);
        assert_eq!(classify_mood(0.55, 0.6, 0.5), MoodLabel::Balanced);
    }

    #[test]
    fn test_nan_falls_through_to_balanced() {
        assert_eq!(classify_mood(f64::NAN, f64::NAN, f64::NAN), MoodLabel::Balanced);
    }

    #[test]
    fn test_average_features() {
        let batch = vec![features(0.2, 0.4, 0.6, 100.0), features(0.4, 0.6, 0.8, 140.0)];
        let avg = average_features(&batch).unwrap();

        assert!((avg.energy - 0.3).abs() < 1e-9);
        assert!((avg.valence - 0.5).abs() < 1e-9);
        assert!((avg.danceability - 0.7).abs() < 1e-9);
        assert!((avg.tempo - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_batch_has_no_mood() {
        assert!(average_features(&[]).is_none());
        assert!(analyze_mood(&[]).is_none());
    }

    #[test]
    fn test_analyze_mood() {
        let batch = vec![features(0.3, 0.2, 0.4, 90.0), features(0.3, 0.2, 0.4, 110.0)];
        let result = analyze_mood(&batch).unwrap();

        assert_eq!(result.label, MoodLabel::SadMelancholic);
        assert!((result.averages.tempo - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_mood_targets() {
        let dance = mood_targets("DANCE");
        assert_eq!(dance.target_energy, Some(0.8));
        assert_eq!(dance.target_danceability, Some(0.8));
        assert_eq!(dance.target_valence, None);

        let sad = mood_targets("sad");
        assert_eq!(sad.target_energy, Some(0.3));
        assert_eq!(sad.target_valence, Some(0.2));

        let unknown = mood_targets("spooky");
        assert_eq!(unknown, RecommendationTargets { target_energy: Some(0.5), ..Default::default() });
    }
}
