// Core algorithm exports
pub mod chart;
pub mod mood;
pub mod similarity;

pub use chart::{duration_bars, render_duration_chart, truncate_label, ChartBar};
pub use mood::{analyze_mood, average_features, classify_mood, mood_targets};
pub use similarity::{calculate_similarity, rank_by_similarity, round_to, score_pair, FEATURE_WEIGHTS};
