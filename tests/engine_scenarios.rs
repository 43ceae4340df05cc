use std::path::PathBuf;
use std::sync::Arc;

use differential::analysis::analyzer::{Analyzer, SymptomAnalyzer};
use differential::classifier::{
    CorpusMatrix, QueryContext, Ranker, Vectorizer, VocabularyIndexer, cosine_similarity,
};
use differential::corpus::{CorpusStore, TrainingRecord, UNKNOWN};
use differential::engine::{ClassifierConfig, SymptomEngine};
use differential::error::{DifferentialError, Result};

fn bundled_corpus() -> Result<CorpusStore> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/corpus.json");
    CorpusStore::load(path)
}

fn small_corpus() -> CorpusStore {
    CorpusStore::from_records(vec![
        TrainingRecord::new("fever cough", "flu"),
        TrainingRecord::new("fever chills", "flu"),
        TrainingRecord::new("rash itching", "allergy"),
        TrainingRecord::new("itching swelling", "allergy"),
    ])
}

#[test]
fn flu_ranks_above_allergy_for_fever_cough() -> Result<()> {
    let engine = SymptomEngine::from_corpus(small_corpus(), ClassifierConfig::default())?;

    let predictions = engine.predict("fever cough", 2, None)?;
    assert_eq!(predictions.len(), 2);
    assert_eq!(predictions[0].label, "flu");
    assert_eq!(predictions[1].label, "allergy");
    assert!(predictions[0].confidence > predictions[1].confidence);

    let total: f64 = predictions.iter().map(|p| p.confidence).sum();
    assert!((total - 1.0).abs() < 1e-6);

    // No metadata was supplied.
    assert_eq!(predictions[0].category, UNKNOWN);
    assert_eq!(predictions[0].severity, UNKNOWN);
    assert!(predictions[0].description.is_empty());
    assert!(predictions[0].care_advice.is_empty());

    Ok(())
}

#[test]
fn predict_before_load_is_empty() -> Result<()> {
    let engine = SymptomEngine::new(ClassifierConfig::default())?;
    assert!(engine.predict("fever cough", 5, None)?.is_empty());
    assert!(
        engine
            .predict("fever", 5, Some(&QueryContext::new().with_age(10)))?
            .is_empty()
    );
    Ok(())
}

#[test]
fn empty_corpus_fails_to_build() -> Result<()> {
    let engine = SymptomEngine::new(ClassifierConfig::default())?;
    let result = engine.load(CorpusStore::from_json_str(r#"{"training_data": []}"#)?);
    assert!(matches!(result, Err(DifferentialError::EmptyCorpus)));
    assert!(!engine.is_ready());
    Ok(())
}

#[test]
fn out_of_vocabulary_query_scores_zero() -> Result<()> {
    let corpus = bundled_corpus()?;
    let engine = SymptomEngine::from_corpus(corpus, ClassifierConfig::default())?;
    let snapshot = engine.snapshot().expect("snapshot loaded");

    let query = snapshot.vectorizer().vectorize("xyzzy qwerty", None)?;
    assert!(query.is_zero());
    assert_eq!(query.len(), snapshot.vocabulary().len());

    let similarities = snapshot.ranker().similarities(&query, snapshot.matrix());
    assert!(similarities.iter().all(|s| *s == 0.0));

    // Every label ties at zero: uniform confidences in corpus order.
    let predictions = engine.predict("xyzzy qwerty", 5, None)?;
    assert_eq!(predictions.len(), 5);
    assert_eq!(predictions[0].label, "Myocardial Infarction");
    assert_eq!(predictions[1].label, "Atrial Fibrillation");
    for prediction in &predictions {
        assert!((prediction.confidence - 0.2).abs() < 1e-9);
    }

    Ok(())
}

#[test]
fn empty_and_punctuation_queries_are_not_errors() -> Result<()> {
    let engine = SymptomEngine::from_corpus(small_corpus(), ClassifierConfig::default())?;
    for text in ["", "   ", "!!! ??? ...", "a b c"] {
        let predictions = engine.predict(text, 5, None)?;
        assert_eq!(predictions.len(), 2, "query {text:?}");
    }
    Ok(())
}

#[test]
fn age_context_changes_query_vector() -> Result<()> {
    let corpus = bundled_corpus()?;
    let analyzer: Arc<dyn Analyzer> = Arc::new(SymptomAnalyzer::new()?);
    let (vocabulary, idf) = VocabularyIndexer::new(analyzer.clone()).build(corpus.records())?;
    assert!(vocabulary.contains("child"));

    let vectorizer = Vectorizer::new(analyzer, Arc::new(vocabulary), Arc::new(idf));
    let plain = vectorizer.vectorize("wheezing and cough at night", None)?;
    let context = QueryContext::new().with_age(10);
    let enriched = vectorizer.vectorize("wheezing and cough at night", Some(&context))?;

    assert_ne!(plain, enriched);
    assert_eq!(plain.len(), enriched.len());
    let child = vectorizer.vocabulary().get("child").expect("child indexed");
    assert_eq!(plain.get(child), Some(0.0));
    assert!(enriched.get(child).unwrap_or(0.0) > 0.0);

    Ok(())
}

#[test]
fn training_vectors_have_vocabulary_length_and_unit_self_similarity() -> Result<()> {
    let corpus = bundled_corpus()?;
    let analyzer: Arc<dyn Analyzer> = Arc::new(SymptomAnalyzer::new()?);
    let (vocabulary, idf) = VocabularyIndexer::new(analyzer.clone()).build(corpus.records())?;
    assert!(idf.weights().iter().all(|w| *w > 0.0));

    let dimension = vocabulary.len();
    let vectorizer = Vectorizer::new(analyzer, Arc::new(vocabulary), Arc::new(idf));
    let matrix = CorpusMatrix::build(corpus.records(), &vectorizer)?;

    assert_eq!(matrix.len(), corpus.len());
    for row in matrix.rows() {
        assert_eq!(row.len(), dimension);
        if !row.is_zero() {
            let self_similarity = cosine_similarity(row.as_slice(), row.as_slice());
            assert!((self_similarity - 1.0).abs() < 1e-9);
        }
        let zeros = vec![0.0; dimension];
        assert_eq!(cosine_similarity(row.as_slice(), &zeros), 0.0);
    }

    Ok(())
}

#[test]
fn predictions_are_sorted_truncated_and_normalized() -> Result<()> {
    let corpus = bundled_corpus()?;
    let queries: Vec<String> = corpus.records().iter().map(|r| r.text.clone()).collect();
    let engine = SymptomEngine::from_corpus(corpus, ClassifierConfig::default())?;

    for (i, query) in queries.iter().enumerate() {
        let top_k = 1 + i % 7;
        let predictions = engine.predict(query, top_k, None)?;
        assert!(!predictions.is_empty());
        assert!(predictions.len() <= top_k);
        assert!(
            predictions
                .windows(2)
                .all(|w| w[0].confidence >= w[1].confidence)
        );
        assert!(predictions.iter().all(|p| p.confidence >= 0.0));
        let total: f64 = predictions.iter().map(|p| p.confidence).sum();
        assert!((total - 1.0).abs() < 1e-6, "query {query:?} sums to {total}");
    }

    Ok(())
}

#[test]
fn bundled_corpus_recognizes_classic_presentations() -> Result<()> {
    let engine = SymptomEngine::from_corpus(bundled_corpus()?, ClassifierConfig::default())?;

    let top = |text: &str| -> Result<String> {
        Ok(engine.predict(text, 3, None)?[0].label.clone())
    };

    assert_eq!(
        top("crushing chest pain radiating to my left arm with sweating")?,
        "Myocardial Infarction"
    );
    assert_eq!(
        top("wheezing chest tightness shortness of breath at night")?,
        "Asthma"
    );
    assert_eq!(
        top("excessive thirst frequent urination blurred vision")?,
        "Type 2 Diabetes"
    );
    assert_eq!(top("silvery scales on elbows")?, "Psoriasis");

    let predictions = engine.predict("crushing chest pain radiating to my left arm", 1, None)?;
    assert_eq!(predictions[0].category, "Cardiovascular");
    assert!(!predictions[0].care_advice.is_empty());

    Ok(())
}

#[test]
fn ranker_window_and_temperature_are_configurable() -> Result<()> {
    let sharp = ClassifierConfig {
        temperature: 50.0,
        ..Default::default()
    };
    let flat = ClassifierConfig {
        temperature: 0.0,
        per_label_window: 1,
        ..Default::default()
    };

    let sharp_engine = SymptomEngine::from_corpus(small_corpus(), sharp)?;
    let flat_engine = SymptomEngine::from_corpus(small_corpus(), flat)?;

    let sharp_top = sharp_engine.predict("fever cough", 2, None)?;
    let flat_top = flat_engine.predict("fever cough", 2, None)?;
    assert!(sharp_top[0].confidence > 0.99);
    assert!((flat_top[0].confidence - 0.5).abs() < 1e-12);
    assert_eq!(flat_engine.snapshot().map(|s| *s.ranker()), Some(Ranker::new(1, 0.0)));

    Ok(())
}

#[test]
fn reload_is_atomic_for_concurrent_readers() -> Result<()> {
    let first = CorpusStore::from_records(vec![
        TrainingRecord::new("fever cough", "flu"),
        TrainingRecord::new("fever cough", "flu"),
        TrainingRecord::new("fever rash", "measles"),
        TrainingRecord::new("fever rash", "measles"),
    ]);
    let second = CorpusStore::from_records(vec![
        TrainingRecord::new("fever cough", "bronchitis"),
        TrainingRecord::new("fever cough", "bronchitis"),
        TrainingRecord::new("fever rash", "rubella"),
        TrainingRecord::new("fever rash", "rubella"),
    ]);

    let engine = SymptomEngine::from_corpus(first.clone(), ClassifierConfig::default())?;

    std::thread::scope(|scope| -> Result<()> {
        let readers: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| -> Result<()> {
                    for _ in 0..200 {
                        let predictions = engine.predict("fever cough", 5, None)?;
                        let labels: Vec<&str> =
                            predictions.iter().map(|p| p.label.as_str()).collect();
                        assert!(
                            labels == ["flu", "measles"] || labels == ["bronchitis", "rubella"],
                            "mixed snapshot: {labels:?}"
                        );
                    }
                    Ok(())
                })
            })
            .collect();

        for i in 0..50 {
            let corpus = if i % 2 == 0 { second.clone() } else { first.clone() };
            engine.load(corpus)?;
        }

        for reader in readers {
            reader.join().expect("reader thread panicked")?;
        }
        Ok(())
    })?;

    Ok(())
}
