use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use genome::SimRng;
use population::{
    BreedingGoal, EngineConfig, FounderSource, GenerationPlan, Grm, IdAllocator, KinshipCache, LitterSize, Population, Strategy,
};

fn founders(size: usize, n_markers: usize) -> Population {
    let config = EngineConfig{n_markers, ..EngineConfig::default()};
    Population::founders(&config, &FounderSource::Simulated, size, BreedingGoal::default(), 42)
        .expect("Failed to found the population")
}

fn bench_mating(c: &mut Criterion) {
    let mut group = c.benchmark_group("mating");
    for n_markers in [200, 1000, 5000] {
        let pop = founders(2, n_markers);
        let (sire, dam) = (&pop.current()[0], &pop.current()[1]);
        let mut rng = SimRng::with_seed(7);
        let mut ids = IdAllocator::starting_at(3);
        group.bench_with_input(BenchmarkId::from_parameter(n_markers), &n_markers, |b, _| b.iter(|| {
            pop.breeder().mate(black_box(sire), black_box(dam), &mut ids, Some(LitterSize::Exact(6)), &mut rng)
        }));
    }
    group.finish();
}

fn bench_grm(c: &mut Criterion) {
    let mut group = c.benchmark_group("grm");
    group.sample_size(20);
    for size in [20, 50, 100] {
        let pop = founders(size, 1000);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| b.iter(|| {
            Grm::compute(black_box(pop.current()))
        }));
    }
    group.finish();
}

fn bench_kinship(c: &mut Criterion) {
    let mut group = c.benchmark_group("kinship");
    for generations in [5, 10] {
        let mut pop = founders(10, 200);
        let plan = GenerationPlan::new(Strategy::Random).capacity(20);
        for _ in 0..generations {
            pop.next_generation(&plan).expect("Failed to advance generation");
        }
        let ids: Vec<_> = pop.current().iter().map(|m| m.id()).collect();
        group.bench_with_input(BenchmarkId::from_parameter(generations), &generations, |b, _| b.iter(|| {
            // Fresh memo: measure the full recursion.
            let mut cache = KinshipCache::new();
            for x in &ids {
                for y in &ids {
                    let _ = cache.kinship(pop.registry(), black_box(*x), black_box(*y));
                }
            }
        }));
    }
    group.finish();
}

criterion_group!(benches, bench_mating, bench_grm, bench_kinship);
criterion_main!(benches);
