//! Criterion benchmarks for the turn engine hot path.
//!
//! Run with:
//!     cargo bench --bench turn_engine

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crypto_poly_engine::engine::arena::play_one_game;
use crypto_poly_engine::engine::bot_strategy::RandomStrategy;
use crypto_poly_engine::engine::config::GameConfig;
use crypto_poly_engine::games::crypto_poly::bot::BotPlanner;
use crypto_poly_engine::games::crypto_poly::players::{create_initial_players, default_roster, BotSeat};
use crypto_poly_engine::games::crypto_poly::rules::CryptoPolyRules;
use crypto_poly_engine::games::crypto_poly::types::{Action, Dice, Side};

fn bench_human_turn(c: &mut Criterion) {
    let rules = CryptoPolyRules::default();
    let players = create_initial_players("Alice", "0xa11ce", &default_roster(), 1500);
    let state = rules.create_initial_state(players);

    c.bench_function("human_purchase_turn", |b| {
        b.iter(|| {
            let s = rules.apply_action(&state, &Action::Roll(Dice(3, 3)));
            let s = rules.apply_action(&s, &Action::ChooseOutcome(Side::Yes));
            let s = rules.apply_action(&s, &Action::Confirm);
            rules.apply_action(&s, &Action::EndTurn)
        });
    });

    let awaiting = rules.apply_action(&state, &Action::Roll(Dice(3, 3)));
    c.bench_function("ignored_action", |b| {
        b.iter(|| rules.apply_action(&awaiting, &Action::Roll(Dice(1, 1))));
    });
}

fn bench_bot_turn(c: &mut Criterion) {
    let rules = CryptoPolyRules::default();
    let players = create_initial_players("Alice", "", &default_roster(), 1500);
    let mut state = rules.create_initial_state(players);
    state.current_player_index = 1;
    let planner = BotPlanner::new(Box::new(RandomStrategy { purchase_threshold: 500 }));

    c.bench_function("bot_turn", |b| {
        let mut rng = StdRng::seed_from_u64(1);
        b.iter(|| planner.play_turn(&rules, &state, &mut rng));
    });
}

fn bench_full_game(c: &mut Criterion) {
    let mut group = c.benchmark_group("bot_game");
    for seats in [2usize, 4] {
        let config = GameConfig {
            bots: (0..seats)
                .map(|i| BotSeat { name: format!("bot{i}"), token_color: "purple".into() })
                .collect(),
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::new("turns_200", seats), &config, |b, cfg| {
            b.iter(|| play_one_game(cfg, &cfg.bots, 42, 200));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_human_turn, bench_bot_turn, bench_full_game);
criterion_main!(benches);
