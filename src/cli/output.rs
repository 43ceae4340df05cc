//! Output formatting for CLI commands.

use std::fmt::Write;

use serde::Serialize;

use crate::api::{DiseaseCatalog, PredictResponse};
use crate::cli::args::{DifferentialArgs, OutputFormat};
use crate::engine::SnapshotStats;
use crate::error::Result;
use crate::evaluation::EvaluationReport;

/// Plain-text rendering for human output.
pub trait HumanOutput {
    fn render_human(&self) -> String;
}

/// Output a result in the specified format.
pub fn output_result<T>(message: &str, result: &T, args: &DifferentialArgs) -> Result<()>
where
    T: Serialize + HumanOutput,
{
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 1 {
                println!("{message}");
                println!();
            }
            print!("{}", result.render_human());
        }
        OutputFormat::Json => println!("{}", render_json(result, args.pretty)?),
    }
    Ok(())
}

/// Serialize `result` as JSON.
pub fn render_json<T: Serialize>(result: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    Ok(json)
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

impl HumanOutput for PredictResponse {
    fn render_human(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Symptoms: {}", self.input_symptoms);
        if let Some(ehr) = &self.ehr_context {
            let mut parts = Vec::new();
            if let Some(age) = ehr.age {
                parts.push(format!("age {age}"));
            }
            if let Some(sex) = &ehr.sex {
                parts.push(sex.clone());
            }
            if let Some(history) = &ehr.medical_history {
                parts.push(format!("history: {}", history.entries().join(", ")));
            }
            let _ = writeln!(out, "Context: {}", parts.join("; "));
        }
        let _ = writeln!(out);

        if self.predictions.is_empty() {
            let _ = writeln!(out, "No conditions matched.");
        }
        for (rank, prediction) in self.predictions.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:>2}. {:<36} {:>6}  [{} / {}]",
                rank + 1,
                prediction.label,
                percent(prediction.confidence),
                prediction.category,
                prediction.severity
            );
            if !prediction.description.is_empty() {
                let _ = writeln!(out, "    {}", prediction.description);
            }
            if !prediction.care_advice.is_empty() {
                let _ = writeln!(out, "    Seek care: {}", prediction.care_advice);
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "{}", self.disclaimer);
        out
    }
}

impl HumanOutput for DiseaseCatalog {
    fn render_human(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} conditions", self.total);
        for (category, entries) in &self.categories {
            let _ = writeln!(out);
            let _ = writeln!(out, "{category} ({})", entries.len());
            for entry in entries {
                let _ = writeln!(out, "  {:<40} {}", entry.name, entry.severity);
            }
        }
        out
    }
}

impl HumanOutput for SnapshotStats {
    fn render_human(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Records:          {}", self.records);
        let _ = writeln!(out, "Labels:           {}", self.labels);
        let _ = writeln!(out, "Vocabulary size:  {}", self.vocabulary_size);
        let _ = writeln!(out, "Zero vectors:     {}", self.zero_vectors);
        let _ = writeln!(out, "Build time:       {}ms", self.build_time_ms);
        out
    }
}

impl HumanOutput for EvaluationReport {
    fn render_human(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Training records: {}", self.train_size);
        let _ = writeln!(out, "Test records:     {}", self.test_size);
        let _ = writeln!(out, "M1 accuracy:      {}", percent(self.m1_accuracy));
        let _ = writeln!(out, "Precision (wt):   {:.4}", self.precision);
        let _ = writeln!(out, "Recall (wt):      {:.4}", self.recall);
        let _ = writeln!(out, "F1 score (wt):    {:.4}", self.f1_score);
        let _ = writeln!(out, "NDCG@{}:           {:.4}", self.k, self.ndcg);

        if !self.bias_report.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Accuracy by category:");
            for (category, accuracy) in &self.bias_report {
                let _ = writeln!(
                    out,
                    "  {:<28} {:>6}  ({} samples)",
                    category,
                    percent(accuracy.accuracy),
                    accuracy.samples
                );
            }
        }
        out
    }
}
