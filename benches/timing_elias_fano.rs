use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;

use criterion::{
    criterion_group, criterion_main, measurement::WallTime, BenchmarkGroup, Criterion, SamplingMode,
};

use eliasfano::EliasFanoArray;

const SAMPLE_SIZE: usize = 30;
const WARM_UP_TIME: Duration = Duration::from_secs(5);
const MEASURE_TIME: Duration = Duration::from_secs(10);

const SEED_INTS: u64 = 334;
const SEED_QUERIES: u64 = 114514;

const NUM_INTS: &[usize] = &[1 << 10, 1 << 15, 1 << 20];
const NUM_QUERIES: usize = 1000;

fn gen_random_ints(len: usize, min: i64, max: i64, seed: u64) -> Vec<i64> {
    let mut rng = ChaChaRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(min..max)).collect()
}

fn gen_random_indices(len: usize, max: usize, seed: u64) -> Vec<usize> {
    let mut rng = ChaChaRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(0..max)).collect()
}

fn criterion_dense(c: &mut Criterion) {
    let mut group = c.benchmark_group("timing_elias_fano_dense");
    group.sample_size(SAMPLE_SIZE);
    group.warm_up_time(WARM_UP_TIME);
    group.measurement_time(MEASURE_TIME);
    group.sampling_mode(SamplingMode::Flat);

    // Universe about twice the length.
    perform(&mut group, 2);
}

fn criterion_sparse(c: &mut Criterion) {
    let mut group = c.benchmark_group("timing_elias_fano_sparse");
    group.sample_size(SAMPLE_SIZE);
    group.warm_up_time(WARM_UP_TIME);
    group.measurement_time(MEASURE_TIME);
    group.sampling_mode(SamplingMode::Flat);

    perform(&mut group, 1 << 20);
}

fn perform(group: &mut BenchmarkGroup<WallTime>, density: i64) {
    for &nints in NUM_INTS {
        let max = nints as i64 * density;
        let ints = gen_random_ints(nints, -max / 2, max / 2, SEED_INTS);
        let efa = EliasFanoArray::build(ints.iter().copied(), false).unwrap();
        let indices = gen_random_indices(NUM_QUERIES, nints, SEED_QUERIES);
        let values = gen_random_ints(NUM_QUERIES, -max / 2, max / 2, SEED_QUERIES);

        let nints_str = format!("n_{nints}");

        group.bench_function(format!("{nints_str}/get"), |b| {
            b.iter(|| {
                let mut sum = 0i64;
                for &i in &indices {
                    sum = sum.wrapping_add(efa.get(i).unwrap());
                }
                sum
            });
        });

        group.bench_function(format!("{nints_str}/contains"), |b| {
            b.iter(|| values.iter().filter(|&&x| efa.contains(x)).count());
        });

        group.bench_function(format!("{nints_str}/iter"), |b| {
            b.iter(|| efa.iter().fold(0i64, |acc, x| acc.wrapping_add(x)));
        });
    }
}

criterion_group!(benches, criterion_dense, criterion_sparse);

criterion_main!(benches);
