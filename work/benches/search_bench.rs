use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use alloy_primitives::{Address, U256};
use wormfarm_crypto::derive_commitment;
use wormfarm_work::{search_burn_key, validate_burn_key};

fn bench_burn_key_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("burn_key_search");
    let commitment = derive_commitment(Address::repeat_byte(0x42), U256::ZERO, U256::ZERO, b"");
    let reveal = U256::from(49_990_000_000_000_000u128);

    // Difficulty 2 (the production target, ~65k expected attempts) is too
    // slow for a tight benchmark loop; 0 and 1 measure per-attempt cost.
    for difficulty in [0usize, 1] {
        group.bench_with_input(
            BenchmarkId::new("search", difficulty),
            &difficulty,
            |b, &diff| {
                b.iter(|| {
                    black_box(
                        search_burn_key(black_box(diff), black_box(commitment), black_box(reveal))
                            .unwrap(),
                    )
                });
            },
        );
    }

    group.finish();
}

fn bench_burn_key_validation(c: &mut Criterion) {
    let commitment = derive_commitment(Address::repeat_byte(0x42), U256::ZERO, U256::ZERO, b"");
    let reveal = U256::from(49_990_000_000_000_000u128);
    let key = search_burn_key(1, commitment, reveal).unwrap();

    c.bench_function("validate_burn_key", |b| {
        b.iter(|| {
            black_box(validate_burn_key(
                black_box(&key),
                black_box(1),
                black_box(commitment),
                black_box(reveal),
            ))
        });
    });
}

criterion_group!(benches, bench_burn_key_search, bench_burn_key_validation);
criterion_main!(benches);
