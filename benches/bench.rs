// Criterion benchmarks for Tunedash scoring

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tunedash::core::{analyze_mood, calculate_similarity, classify_mood, rank_by_similarity};
use tunedash::models::spotify::{Album, SimplifiedArtist};
use tunedash::models::{AudioFeatureSet, Track};

fn features(i: usize) -> AudioFeatureSet {
    let f = (i % 100) as f64 / 100.0;
    AudioFeatureSet {
        danceability: f,
        energy: 1.0 - f,
        valence: (f * 7.0) % 1.0,
        tempo: 60.0 + (i % 140) as f64,
        acousticness: (f * 3.0) % 1.0,
        instrumentalness: (f * 5.0) % 1.0,
    }
}

fn track(i: usize) -> Track {
    Track {
        id: Some(format!("track{}", i)),
        name: format!("Track {}", i),
        uri: format!("spotify:track:track{}", i),
        duration_ms: 180_000,
        artists: vec![SimplifiedArtist { name: "Artist".to_string() }],
        album: Album::default(),
    }
}

fn bench_similarity(c: &mut Criterion) {
    let a = features(3);
    let b = features(42);

    c.bench_function("calculate_similarity", |bench| {
        bench.iter(|| calculate_similarity(black_box(&a), black_box(&b)));
    });
}

fn bench_classify_mood(c: &mut Criterion) {
    c.bench_function("classify_mood", |b| {
        b.iter(|| classify_mood(black_box(0.55), black_box(0.5), black_box(0.5)));
    });
}

fn bench_analyze_mood(c: &mut Criterion) {
    let batch: Vec<AudioFeatureSet> = (0..20).map(features).collect();

    c.bench_function("analyze_mood_20", |b| {
        b.iter(|| analyze_mood(black_box(&batch)));
    });
}

fn bench_rank_by_similarity(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank_by_similarity");
    let seed = features(7);

    for size in [12, 100, 1000] {
        let candidates: Vec<(Track, Option<AudioFeatureSet>)> = (0..size)
            .map(|i| (track(i), if i % 10 == 0 { None } else { Some(features(i)) }))
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &candidates, |b, candidates| {
            b.iter(|| rank_by_similarity(black_box(&seed), candidates.clone()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_similarity,
    bench_classify_mood,
    bench_analyze_mood,
    bench_rank_by_similarity
);
criterion_main!(benches);
