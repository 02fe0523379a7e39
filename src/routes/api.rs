use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{analyze_mood, duration_bars, mood_targets, rank_by_similarity, render_duration_chart, round_to};
use crate::models::{
    CreatePlaylistRequest, CreatePlaylistResponse, HealthResponse, MoodResponse, NowPlayingError,
    NowPlayingResponse, NowPlayingTrack, OriginalTrack, RecommendationTargets, SimilarQuery,
    SimilarResponse, SuccessResponse, TimeRange, WrappedArtist, WrappedResponse, WrappedTrack,
};
use crate::routes::{access_token, error_response, respond, upstream_body, upstream_error, AppState};
use crate::services::RecommendationQuery;

/// Configure the JSON API routes (mounted under `/api`)
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/now", web::get().to(now_playing))
        .route("/play", web::post().to(play))
        .route("/pause", web::post().to(pause))
        .route("/next", web::post().to(next_track))
        .route("/previous", web::post().to(previous_track))
        .route("/mood", web::get().to(mood))
        .route("/create_playlist", web::post().to(create_playlist))
        .route("/wrapped", web::get().to(wrapped))
        .route("/similar", web::get().to(similar));
}

/// Health check endpoint
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let authenticated = state.auth.has_valid_token().await;

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        authenticated,
        timestamp: chrono::Utc::now(),
    })
}

/// Currently playing track
///
/// GET /api/now
async fn now_playing(state: web::Data<AppState>) -> HttpResponse {
    let token = match access_token(&state).await {
        Ok(token) => token,
        Err(response) => return response,
    };

    let playback = match state.spotify.current_playback(&token).await {
        Ok(playback) => playback,
        Err(e) => {
            let error = upstream_body("Failed to fetch playback", e);
            return respond(error.status_code, NowPlayingError { playing: false, error });
        }
    };

    let response = match playback {
        Some(playback) => match playback.item {
            Some(track) => NowPlayingResponse {
                playing: true,
                track: Some(NowPlayingTrack {
                    is_playing: playback.is_playing,
                    artists: track.artist_names(),
                    album_art: track.album_art(),
                    album: track.album.name,
                    track_name: track.name,
                    duration_ms: track.duration_ms,
                    progress_ms: playback.progress_ms,
                    track_id: track.id,
                }),
            },
            None => NowPlayingResponse { playing: false, track: None },
        },
        None => NowPlayingResponse { playing: false, track: None },
    };

    HttpResponse::Ok().json(response)
}

#[derive(Debug, Clone, Copy)]
enum PlaybackCommand {
    Play,
    Pause,
    Next,
    Previous,
}

async fn playback_command(state: web::Data<AppState>, command: PlaybackCommand) -> HttpResponse {
    let token = match access_token(&state).await {
        Ok(token) => token,
        Err(response) => return response,
    };

    let result = match command {
        PlaybackCommand::Play => state.spotify.start_playback(&token).await,
        PlaybackCommand::Pause => state.spotify.pause_playback(&token).await,
        PlaybackCommand::Next => state.spotify.next_track(&token).await,
        PlaybackCommand::Previous => state.spotify.previous_track(&token).await,
    };

    match result {
        Ok(()) => {
            tracing::info!("Playback command {:?} sent", command);
            HttpResponse::Ok().json(SuccessResponse { success: true })
        }
        Err(e) => upstream_error(&format!("Playback command {:?} failed", command), e),
    }
}

async fn play(state: web::Data<AppState>) -> HttpResponse {
    playback_command(state, PlaybackCommand::Play).await
}

async fn pause(state: web::Data<AppState>) -> HttpResponse {
    playback_command(state, PlaybackCommand::Pause).await
}

async fn next_track(state: web::Data<AppState>) -> HttpResponse {
    playback_command(state, PlaybackCommand::Next).await
}

async fn previous_track(state: web::Data<AppState>) -> HttpResponse {
    playback_command(state, PlaybackCommand::Previous).await
}

/// Mood of the user's recent top tracks
///
/// GET /api/mood
async fn mood(state: web::Data<AppState>) -> HttpResponse {
    let token = match access_token(&state).await {
        Ok(token) => token,
        Err(response) => return response,
    };

    let tracks = match state
        .spotify
        .top_tracks(&token, state.dashboard.mood_sample_size, TimeRange::ShortTerm)
        .await
    {
        Ok(tracks) => tracks,
        Err(e) => return upstream_error("Failed to fetch top tracks", e),
    };

    if tracks.is_empty() {
        return error_response(404, "No top tracks found", "No short-term top tracks for this user");
    }

    let features: Vec<_> = match state.spotify.audio_features_for(&token, &tracks).await {
        Ok(features) => features.into_iter().flatten().collect(),
        Err(e) => return upstream_error("Failed to fetch audio features", e),
    };

    let Some(result) = analyze_mood(&features) else {
        return error_response(404, "No audio features found", "None of the top tracks have audio features");
    };

    tracing::info!(
        "Mood {} from {} of {} top tracks",
        result.label,
        features.len(),
        tracks.len()
    );

    HttpResponse::Ok().json(MoodResponse {
        mood: result.label,
        energy: round_to(result.averages.energy, 2),
        valence: round_to(result.averages.valence, 2),
        danceability: round_to(result.averages.danceability, 2),
        tempo: round_to(result.averages.tempo, 2),
    })
}

/// Create a smart playlist from recommendations
///
/// POST /api/create_playlist
///
/// Request body:
/// ```json
/// {
///   "name": "Smart Playlist",
///   "mood": "energetic|calm|happy|sad|dance",
///   "tempo_min": 100,
///   "tempo_max": 150
/// }
/// ```
async fn create_playlist(
    state: web::Data<AppState>,
    req: web::Json<CreatePlaylistRequest>,
) -> HttpResponse {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for create_playlist request: {:?}", errors);
        return error_response(400, "Validation failed", errors.to_string());
    }

    let token = match access_token(&state).await {
        Ok(token) => token,
        Err(response) => return response,
    };

    let user = match state.spotify.current_user(&token).await {
        Ok(user) => user,
        Err(e) => return upstream_error("Failed to fetch current user", e),
    };

    let playlist = match state
        .spotify
        .create_playlist(&token, &user.id, &req.name, false)
        .await
    {
        Ok(playlist) => playlist,
        Err(e) => return upstream_error("Failed to create playlist", e),
    };

    tracing::info!("Created playlist {} ({}) for {}", req.name, playlist.id, user.id);

    let seeds = match state
        .spotify
        .top_tracks(&token, state.dashboard.playlist_seed_count, TimeRange::ShortTerm)
        .await
    {
        Ok(tracks) => tracks.into_iter().filter_map(|t| t.id).collect::<Vec<_>>(),
        Err(e) => return upstream_error("Failed to fetch seed tracks", e),
    };

    let query = RecommendationQuery {
        seed_tracks: seeds,
        limit: state.dashboard.playlist_track_limit,
        min_tempo: Some(req.tempo_min as f64),
        max_tempo: Some(req.tempo_max as f64),
        targets: mood_targets(&req.mood),
    };

    let recommendations = match state.spotify.recommendations(&token, &query).await {
        Ok(tracks) => tracks,
        Err(e) => return upstream_error("Failed to fetch recommendations", e),
    };

    let uris: Vec<String> = recommendations
        .into_iter()
        .map(|t| t.uri)
        .filter(|uri| !uri.is_empty())
        .collect();

    if !uris.is_empty() {
        if let Err(e) = state.spotify.add_tracks(&token, &playlist.id, &uris).await {
            return upstream_error("Failed to add tracks", e);
        }
    }

    tracing::info!("Added {} tracks to playlist {}", uris.len(), playlist.id);

    HttpResponse::Ok().json(CreatePlaylistResponse {
        success: true,
        playlist_name: req.name.clone(),
        playlist_id: playlist.id,
        tracks_added: uris.len(),
        url: playlist.external_urls.spotify,
    })
}

/// Top tracks, top artists and a duration chart
///
/// GET /api/wrapped
async fn wrapped(state: web::Data<AppState>) -> HttpResponse {
    let token = match access_token(&state).await {
        Ok(token) => token,
        Err(response) => return response,
    };

    let tracks = match state
        .spotify
        .top_tracks(&token, state.dashboard.wrapped_track_limit, TimeRange::MediumTerm)
        .await
    {
        Ok(tracks) => tracks,
        Err(e) => return upstream_error("Failed to fetch top tracks", e),
    };

    let artists = match state
        .spotify
        .top_artists(&token, state.dashboard.wrapped_artist_limit, TimeRange::MediumTerm)
        .await
    {
        Ok(artists) => artists,
        Err(e) => return upstream_error("Failed to fetch top artists", e),
    };

    let bars = duration_bars(
        tracks.iter().map(|t| (t.name.as_str(), t.duration_ms)),
        state.dashboard.chart_track_limit,
    );
    let chart = render_duration_chart(&bars);

    let top_tracks = tracks
        .into_iter()
        .map(|t| WrappedTrack {
            artists: t.artist_names(),
            album_art: t.album_art(),
            name: t.name,
            duration_ms: t.duration_ms,
        })
        .collect();

    let top_artists = artists
        .into_iter()
        .map(|a| WrappedArtist {
            genres: a.genres.iter().take(3).cloned().collect::<Vec<_>>().join(", "),
            image: a.image(),
            name: a.name,
        })
        .collect();

    HttpResponse::Ok().json(WrappedResponse {
        top_tracks,
        top_artists,
        chart,
    })
}

/// Recommendations ranked by audio-feature similarity
///
/// GET /api/similar?track_id={id}
///
/// Uses the currently playing track when `track_id` is omitted.
async fn similar(state: web::Data<AppState>, query: web::Query<SimilarQuery>) -> HttpResponse {
    let token = match access_token(&state).await {
        Ok(token) => token,
        Err(response) => return response,
    };

    let track_id = match query.track_id.clone().filter(|id| !id.is_empty()) {
        Some(id) => id,
        None => {
            let playing = match state.spotify.current_playback(&token).await {
                Ok(playback) => playback.and_then(|p| p.item).and_then(|t| t.id),
                Err(e) => return upstream_error("Failed to fetch playback", e),
            };

            match playing {
                Some(id) => id,
                None => {
                    return error_response(
                        400,
                        "No track playing and no track_id provided",
                        "Pass ?track_id= or start playback",
                    );
                }
            }
        }
    };

    let track = match state.spotify.track(&token, &track_id).await {
        Ok(track) => track,
        Err(e) => return upstream_error("Failed to fetch track", e),
    };

    let seed = match state.spotify.audio_features(&token, &[track_id.clone()]).await {
        Ok(features) => features.into_iter().next().flatten(),
        Err(e) => return upstream_error("Failed to fetch audio features", e),
    };
    let Some(seed) = seed else {
        return error_response(404, "Could not get audio features", format!("No audio features for {}", track_id));
    };

    let rec_query = RecommendationQuery {
        seed_tracks: vec![track_id.clone()],
        limit: state.dashboard.similar_limit,
        min_tempo: None,
        max_tempo: None,
        targets: RecommendationTargets::matching(&seed),
    };

    let recommendations = match state.spotify.recommendations(&token, &rec_query).await {
        Ok(tracks) => tracks,
        Err(e) => return upstream_error("Failed to fetch recommendations", e),
    };

    let rec_features = match state.spotify.audio_features_for(&token, &recommendations).await {
        Ok(features) => features,
        Err(e) => return upstream_error("Failed to fetch audio features", e),
    };

    let similar_tracks = rank_by_similarity(&seed, recommendations.into_iter().zip(rec_features));

    tracing::debug!("Ranked {} similar tracks for {}", similar_tracks.len(), track_id);

    HttpResponse::Ok().json(SimilarResponse {
        original_track: OriginalTrack {
            artists: track.artist_names(),
            name: track.name,
        },
        similar_tracks,
    })
}
