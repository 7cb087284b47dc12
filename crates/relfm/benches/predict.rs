//! Scoring benchmarks: relation-block compression vs. the expanded matrix.

use std::time::Duration;

use relfm::testing::data::{random_fm, random_one_hot, random_relation_block};
use relfm::testing::reference::expand_relations;
use relfm::FactorizationMachinePredict;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const N_PRIMARY: usize = 50;
const BLOCK_SIZE: usize = 200;
const N_FACTORS: usize = 16;

fn bench_criterion() -> Criterion {
	Criterion::default()
		.configure_from_args()
		.warm_up_time(Duration::from_secs(1))
		.measurement_time(Duration::from_secs(5))
		.sample_size(10)
}

fn bench_relation_vs_expanded(c: &mut Criterion) {
	let n_cases = 10_000usize;
	let fm = random_fm(N_PRIMARY + BLOCK_SIZE, N_FACTORS, 0.1, 42);
	let x = random_one_hot(n_cases, N_PRIMARY, 1);

	let mut group = c.benchmark_group("predict/n_groups");

	for n_groups in [10usize, 100, 1_000] {
		let blocks = [random_relation_block(n_cases, n_groups, BLOCK_SIZE, 0.1, 2)];
		let expanded = expand_relations(&x, &blocks);

		group.throughput(Throughput::Elements(n_cases as u64));
		group.bench_with_input(BenchmarkId::new("relation", n_groups), &blocks, |b, blocks| {
			b.iter(|| black_box(fm.predict(black_box(&x), blocks)))
		});
		group.bench_with_input(BenchmarkId::new("expanded", n_groups), &expanded, |b, expanded| {
			b.iter(|| black_box(fm.predict(black_box(expanded), &[])))
		});
	}

	group.finish();
}

fn bench_batch_sizes(c: &mut Criterion) {
	let fm = random_fm(N_PRIMARY + BLOCK_SIZE, N_FACTORS, 0.1, 42);

	let mut group = c.benchmark_group("predict/batch_size");

	for n_cases in [1usize, 100, 10_000] {
		let x = random_one_hot(n_cases, N_PRIMARY, 3);
		let blocks = [random_relation_block(n_cases, 100, BLOCK_SIZE, 0.1, 4)];

		group.throughput(Throughput::Elements(n_cases as u64));
		group.bench_with_input(BenchmarkId::new("relation", n_cases), &x, |b, x| {
			b.iter(|| black_box(fm.predict(black_box(x), &blocks)))
		});
	}

	group.finish();
}

criterion_group! {
	name = benches;
	config = bench_criterion();
	targets = bench_relation_vs_expanded, bench_batch_sizes
}
criterion_main!(benches);
