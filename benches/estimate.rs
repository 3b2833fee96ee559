use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mana_sources::config::DrawConvention;
use mana_sources::requirement::Requirement;
use mana_sources::simulation::{estimate, Deck, TrialSettings};

fn benchmark_estimate(c: &mut Criterion) {
    let req = Requirement::new(40, 17, 4, [2, 1], [6, 5, 3], 12345).expect("valid requirement");
    let settings = TrialSettings {
        trials: 10_000,
        mulligan_floor: 2,
        draw_convention: DrawConvention::OnThePlay,
    };

    c.bench_function("estimate_10k_trials", |b| {
        b.iter(|| estimate(black_box(&req), black_box(&settings)))
    });
}

fn benchmark_draw_whole_deck(c: &mut Criterion) {
    let req = Requirement::new(40, 17, 4, [2, 1], [6, 5, 3], 0).expect("valid requirement");

    c.bench_function("draw_40_cards", |b| {
        b.iter(|| {
            let mut deck = Deck::new(black_box(&req), black_box(99));
            while !deck.is_empty() {
                black_box(deck.draw_card());
            }
        })
    });
}

criterion_group!(benches, benchmark_estimate, benchmark_draw_whole_deck);
criterion_main!(benches);
