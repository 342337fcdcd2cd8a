use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kolosal_fairness::fairness::{
    FairnessConfig, FairnessEvaluator, FairnessObject, ModelEvaluation, ProtectedInput,
};
use ndarray::Array1;
use rand::prelude::*;

const LEVELS: [&str; 4] = ["a", "b", "c", "d"];

fn create_data(n_rows: usize, n_models: usize) -> (Vec<ModelEvaluation>, ProtectedInput) {
    let mut rng = rand::thread_rng();

    let y: Vec<f64> = (0..n_rows).map(|_| if rng.gen::<bool>() { 1.0 } else { 0.0 }).collect();
    let protected: Vec<&str> = (0..n_rows)
        .map(|_| LEVELS[rng.gen_range(0..LEVELS.len())])
        .collect();

    let models = (0..n_models)
        .map(|i| {
            let y_hat: Vec<f64> = y
                .iter()
                .map(|&t| (0.6 * t + 0.4 * rng.gen::<f64>()).clamp(0.0, 1.0))
                .collect();
            ModelEvaluation::new(
                format!("model_{}", i),
                Array1::from(y.clone()),
                Array1::from(y_hat),
            )
        })
        .collect();

    (models, ProtectedInput::categorical(protected, LEVELS))
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    group.sample_size(20);

    for n_rows in [1000, 10000, 100000].iter() {
        let (models, protected) = create_data(*n_rows, 4);

        for parallel in [false, true] {
            let evaluator = FairnessEvaluator::new(FairnessConfig::quiet().with_parallel(parallel));
            let name = if parallel { "parallel" } else { "sequential" };

            group.bench_with_input(BenchmarkId::new(name, n_rows), &models, |b, models| {
                b.iter(|| {
                    evaluator
                        .evaluate(black_box(models), protected.clone(), "a", &[])
                        .unwrap()
                })
            });
        }
    }

    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");

    let (models, protected) = create_data(10000, 8);
    let evaluator = FairnessEvaluator::new(FairnessConfig::quiet());
    let priors: Vec<FairnessObject> = models[1..]
        .iter()
        .map(|m| evaluator.evaluate(std::slice::from_ref(m), protected.clone(), "a", &[]).unwrap())
        .collect();

    group.bench_function("merge_7_priors", |b| {
        b.iter(|| {
            evaluator
                .evaluate(&models[..1], protected.clone(), "a", black_box(&priors))
                .unwrap()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_merge);
criterion_main!(benches);
