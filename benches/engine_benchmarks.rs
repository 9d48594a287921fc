use std::time::Duration;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use recitalist::engine::{PracticeMode, create_mask, generate_options};
use recitalist::session::Session;

const SAMPLE: &str = "学而时习之，不亦说乎？有朋自远方来，不亦乐乎？人不知而不愠，不亦君子乎？";

fn long_passage(repeats: usize) -> Vec<char> {
    SAMPLE.repeat(repeats).chars().collect()
}

fn bench_mask(c: &mut Criterion) {
    let passage = long_passage(40);
    let mut rng = SmallRng::seed_from_u64(7);

    c.bench_function("create_mask random (1.5k chars)", |b| {
        b.iter(|| create_mask(black_box(&passage), PracticeMode::Random, &mut rng))
    });
}

fn bench_options(c: &mut Criterion) {
    let passage = long_passage(40);
    let mut rng = SmallRng::seed_from_u64(7);

    c.bench_function("generate_options (1.5k chars)", |b| {
        b.iter(|| generate_options(black_box(&passage), '君', &mut rng))
    });
}

fn bench_choice_walkthrough(c: &mut Criterion) {
    let content = SAMPLE.repeat(10);

    c.bench_function("answer every blank, all mode (370 chars)", |b| {
        b.iter(|| {
            let mut s = Session::new(
                black_box(&content),
                0,
                PracticeMode::All,
                Duration::from_millis(600),
                SmallRng::seed_from_u64(1),
            );
            while let Some(cursor) = s.cursor() {
                let target = s.passage()[cursor];
                let idx = s.options().iter().position(|&ch| ch == target).unwrap_or(0);
                s.pick(idx);
            }
            s
        })
    });
}

fn bench_free_validation(c: &mut Criterion) {
    let content = SAMPLE.repeat(10);
    let segments: Vec<&str> = content
        .split(['，', '？'])
        .filter(|s| !s.is_empty())
        .collect();

    c.bench_function("free mode, validate every segment (370 chars)", |b| {
        b.iter(|| {
            let mut s = Session::new(
                black_box(&content),
                0,
                PracticeMode::Free,
                Duration::from_millis(600),
                SmallRng::seed_from_u64(1),
            );
            let now = std::time::Instant::now();
            for seg in &segments {
                s.type_str(seg, now);
                s.flush();
            }
            s
        })
    });
}

criterion_group!(
    benches,
    bench_mask,
    bench_options,
    bench_choice_walkthrough,
    bench_free_validation
);
criterion_main!(benches);
