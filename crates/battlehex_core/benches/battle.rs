//! Battle benchmarks for battlehex_core.
//!
//! Run with: `cargo bench -p battlehex_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use battlehex_core::battle::BattleManager;
use battlehex_core::battlefield::Battlefield;
use battlehex_core::events::EventLog;
use battlehex_test_utils::fixtures::{melee, ranged, seeded_rng, standard_duel};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Full standard duel, start to finish.
pub fn duel_benchmark(c: &mut Criterion) {
    c.bench_function("standard_duel", |b| {
        b.iter(|| {
            let mut battle = standard_duel();
            let report = battle.run(Vec::new(), &mut seeded_rng(42));
            black_box(report)
        })
    });
}

/// Crowded free-for-all on fields of growing size.
pub fn crowd_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("free_for_all");
    for size in [32usize, 128, 512] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut battle = BattleManager::new(Battlefield::new(size));
                let spacing = i32::try_from(size / 16).unwrap_or(1).max(1);
                for i in 0..16u32 {
                    let x = i32::try_from(i).unwrap_or(0) * spacing;
                    let unit = if i % 2 == 0 {
                        melee(i + 1, x)
                    } else {
                        ranged(i + 1, x, 5)
                    };
                    battle.add_unit(unit).expect("distinct cells");
                }
                let mut log = EventLog::new();
                let winner = battle.run_with_observer(Vec::new(), &mut seeded_rng(7), &mut log);
                black_box(winner)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, duel_benchmark, crowd_benchmark);
criterion_main!(benches);
