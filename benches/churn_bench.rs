use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use dense_slotmap::{Key, SlotMap};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

// Mixed insert/erase workload at a steady population of ~10k values.
fn churn(m: &mut SlotMap<u64>, live: &mut Vec<Key>, seed: u64, ops: usize) {
    for x in lcg(seed).take(ops) {
        if x % 2 == 0 || live.is_empty() {
            live.push(m.insert(x));
        } else {
            let k = live.swap_remove((x as usize) % live.len());
            m.erase(k);
        }
    }
}

fn bench_churn(c: &mut Criterion) {
    c.bench_function("slot_map::churn_100k_ops", |b| {
        b.iter_batched(
            || {
                let mut m = SlotMap::new();
                let live: Vec<Key> = lcg(17).take(10_000).map(|x| m.insert(x)).collect();
                (m, live)
            },
            |(mut m, mut live)| {
                churn(&mut m, &mut live, 19, 100_000);
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("slot_map::churn_then_check_invariants", |b| {
        let mut m = SlotMap::new();
        let mut live = Vec::new();
        churn(&mut m, &mut live, 23, 50_000);
        b.iter(|| {
            m.check_invariants();
            black_box(m.len())
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches_churn;
    config = bench_config();
    targets = bench_churn
}
criterion_main!(benches_churn);
