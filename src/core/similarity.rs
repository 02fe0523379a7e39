use crate::models::{AudioFeature, AudioFeatureSet, ScoredTrack, SimilarityScore, Track};

/// Tempo difference (BPM) at which tempo similarity reaches zero
pub const TEMPO_RANGE_BPM: f64 = 150.0;

/// Weight of each compared feature. Tempo counts less since it varies more.
pub const FEATURE_WEIGHTS: [(AudioFeature, f64); 6] = [
    (AudioFeature::Danceability, 1.0),
    (AudioFeature::Energy, 1.0),
    (AudioFeature::Valence, 1.0),
    (AudioFeature::Tempo, 0.5),
    (AudioFeature::Acousticness, 0.8),
    (AudioFeature::Instrumentalness, 0.8),
];

/// Per-feature similarity
///
/// Tempo is normalized over `TEMPO_RANGE_BPM` and clamped at zero. The other
/// features are assumed to lie in [0, 1] already and are left unclamped.
#[inline]
fn feature_similarity(feature: AudioFeature, a: f64, b: f64) -> f64 {
    let diff = (a - b).abs();
    match feature {
        AudioFeature::Tempo => (1.0 - diff / TEMPO_RANGE_BPM).max(0.0),
        _ => 1.0 - diff,
    }
}

/// Weighted similarity (0-1) between two tracks' audio features
///
/// score = Σ(similarity_i * weight_i) / Σ(weight_i)
pub fn calculate_similarity(a: &AudioFeatureSet, b: &AudioFeatureSet) -> f64 {
    let (total_similarity, total_weight) = FEATURE_WEIGHTS.iter().fold(
        (0.0, 0.0),
        |(similarity, weight), &(feature, w)| {
            let s = feature_similarity(feature, a.value(feature), b.value(feature));
            (similarity + s * w, weight + w)
        },
    );

    if total_weight > 0.0 {
        total_similarity / total_weight
    } else {
        0.0
    }
}

/// Score a pair and keep both inputs alongside the result
pub fn score_pair(a: &AudioFeatureSet, b: &AudioFeatureSet) -> SimilarityScore {
    SimilarityScore {
        score: calculate_similarity(a, b),
        left: *a,
        right: *b,
    }
}

/// Annotate recommended tracks with their similarity to `seed`
///
/// `candidates` pairs each track with its features as returned by the
/// audio-feature lookup; tracks without features are dropped. Scores are
/// percentages rounded to one decimal, sorted descending. The sort is stable,
/// so ties keep the provider's ranking.
pub fn rank_by_similarity(
    seed: &AudioFeatureSet,
    candidates: impl IntoIterator<Item = (Track, Option<AudioFeatureSet>)>,
) -> Vec<ScoredTrack> {
    let mut scored: Vec<ScoredTrack> = candidates
        .into_iter()
        .filter_map(|(track, features)| {
            let features = features?;
            let similarity = round_to(calculate_similarity(seed, &features) * 100.0, 1);

            Some(ScoredTrack {
                artists: track.artist_names(),
                album_art: track.album_art(),
                album: track.album.name,
                name: track.name,
                similarity,
                track_id: track.id,
            })
        })
        .collect();

    scored.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    scored
}

/// Round to a fixed number of decimal places, ties to even
#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
