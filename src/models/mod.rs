// Model exports
pub mod domain;
pub mod requests;
pub mod responses;
pub mod spotify;

pub use domain::{AudioFeature, AudioFeatureSet, FeatureAverages, MoodLabel, MoodResult, RecommendationTargets, ScoredTrack, SimilarityScore};
pub use requests::{CallbackQuery, CreatePlaylistRequest, SimilarQuery};
pub use responses::{CreatePlaylistResponse, ErrorResponse, HealthResponse, MoodResponse, NowPlayingError, NowPlayingResponse, NowPlayingTrack, OriginalTrack, SimilarResponse, SuccessResponse, WrappedArtist, WrappedResponse, WrappedTrack};
pub use spotify::{Artist, CurrentUser, Playback, Playlist, TimeRange, Track};
