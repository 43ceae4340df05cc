//! Criterion benchmarks for the differential classifier.
//!
//! Covers:
//! - Symptom analysis
//! - Snapshot construction over the bundled corpus
//! - Prediction with and without patient context
//! - Held-out evaluation

use std::hint::black_box;
use std::path::PathBuf;
use std::sync::Arc;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use differential::analysis::analyzer::{Analyzer, SymptomAnalyzer};
use differential::classifier::QueryContext;
use differential::corpus::{CorpusStore, TrainingRecord};
use differential::engine::{ClassifierConfig, EngineSnapshot, SymptomEngine};
use differential::evaluation::{EvaluationConfig, Evaluator};

const QUERIES: &[&str] = &[
    "crushing chest pain radiating to my left arm with sweating",
    "wheezing and chest tightness at night",
    "high fever body aches dry cough",
    "burning when I pee and cloudy urine",
    "throbbing headache on one side with flashing lights",
    "excessive thirst frequent urination blurred vision",
];

fn bundled_corpus() -> CorpusStore {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/corpus.json");
    CorpusStore::load(path).unwrap()
}

/// Replicate the bundled corpus `factor` times with per-copy suffix terms.
fn scaled_corpus(factor: usize) -> CorpusStore {
    let base = bundled_corpus();
    let records = (0..factor)
        .flat_map(|copy| {
            base.records().iter().map(move |record| {
                TrainingRecord::new(format!("{} variant{copy}", record.text), &record.label)
            })
        })
        .collect();
    CorpusStore::new(records, base.metadata_map().clone())
}

fn bench_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis");
    let analyzer = SymptomAnalyzer::new().unwrap();
    let corpus = bundled_corpus();

    group.throughput(Throughput::Elements(corpus.len() as u64));
    group.bench_function("analyze_corpus", |b| {
        b.iter(|| {
            for record in corpus.records() {
                let _ = black_box(analyzer.terms(black_box(&record.text)));
            }
        })
    });

    group.finish();
}

fn bench_snapshot_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_build");
    group.sample_size(20);
    let analyzer: Arc<dyn Analyzer> = Arc::new(SymptomAnalyzer::new().unwrap());
    let config = ClassifierConfig::default();

    for factor in [1, 10] {
        let corpus = scaled_corpus(factor);
        group.throughput(Throughput::Elements(corpus.len() as u64));
        group.bench_function(format!("build_x{factor}"), |b| {
            b.iter_with_setup(
                || corpus.clone(),
                |corpus| black_box(EngineSnapshot::build(corpus, analyzer.clone(), &config)),
            )
        });
    }

    group.finish();
}

fn bench_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("predict");
    let engine = SymptomEngine::from_corpus(bundled_corpus(), ClassifierConfig::default()).unwrap();
    let context = QueryContext::new()
        .with_age(67)
        .with_sex("male")
        .with_history(vec!["smoker", "hypertension"]);

    group.throughput(Throughput::Elements(QUERIES.len() as u64));
    group.bench_function("predict_top5", |b| {
        b.iter(|| {
            for query in QUERIES {
                let _ = black_box(engine.predict(black_box(query), 5, None));
            }
        })
    });
    group.bench_function("predict_top5_with_context", |b| {
        b.iter(|| {
            for query in QUERIES {
                let _ = black_box(engine.predict(black_box(query), 5, Some(&context)));
            }
        })
    });

    let large = SymptomEngine::from_corpus(scaled_corpus(20), ClassifierConfig::default()).unwrap();
    group.bench_function("predict_top5_x20_corpus", |b| {
        b.iter(|| {
            for query in QUERIES {
                let _ = black_box(large.predict(black_box(query), 5, None));
            }
        })
    });

    group.finish();
}

fn bench_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluation");
    group.sample_size(10);
    let corpus = bundled_corpus();
    let evaluator = Evaluator::new(ClassifierConfig::default(), EvaluationConfig::default()).unwrap();

    group.bench_function("evaluate_bundled_corpus", |b| {
        b.iter(|| black_box(evaluator.evaluate(&corpus)))
    });

    group.finish();
}

criterion_group!(benches, bench_analysis, bench_snapshot_build, bench_predict);

// Separate group for slower benchmarks
criterion_group!(slow_benches, bench_evaluation);

criterion_main!(benches, slow_benches);
