//! Rendering of per-candidate match decisions.
//!
//! Text output keeps the long-standing line formats:
//!
//! ```text
//! Match found for candidate hash 3,cat.jpg to reference hash 17,known-cat.jpg with a distance of 1520
//! cat.jpg,1520
//! ```
//!
//! The first form is printed for matches in first-match and best-match modes;
//! candidates without a match print nothing. The second form is printed for
//! every candidate in score-only mode.

use std::io::Write;

use serde::Serialize;

use crate::catalog::store::HashStore;
use crate::cli::OutputFormat;
use crate::core::types::MatchMode;
use crate::matching::engine::{CandidateResult, Decision};

/// Renders match decisions for one run
pub struct Reporter<'a> {
    references: &'a HashStore,
    format: OutputFormat,
    mode: MatchMode,
    threshold: i64,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    mode: MatchMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    threshold: Option<i64>,
    candidate_count: usize,
    reference_count: usize,
    results: Vec<JsonResult<'a>>,
}

#[derive(Serialize)]
struct JsonResult<'a> {
    candidate_index: usize,
    candidate: &'a str,
    #[serde(flatten)]
    decision: &'a Decision,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference: Option<&'a str>,
}

impl<'a> Reporter<'a> {
    pub fn new(
        references: &'a HashStore,
        format: OutputFormat,
        mode: MatchMode,
        threshold: i64,
    ) -> Self {
        Self {
            references,
            format,
            mode,
            threshold,
        }
    }

    /// Render one decision as a text or TSV line.
    ///
    /// Returns `None` when nothing is printed for this candidate, and always
    /// for JSON, which is written as one document by [`Reporter::write`].
    pub fn render_line(&self, result: &CandidateResult) -> Option<String> {
        match (self.format, &result.decision) {
            (OutputFormat::Json, _) | (_, Decision::NoMatch) => None,
            (OutputFormat::Text, Decision::Matched(m)) => Some(format!(
                "Match found for candidate hash {},{} to reference hash {},{} with a distance of {}",
                result.index,
                result.name,
                m.index,
                self.reference_name(m.index),
                m.distance
            )),
            (OutputFormat::Tsv, Decision::Matched(m)) => Some(format!(
                "{}\t{}\t{}\t{}\t{}",
                result.index,
                result.name,
                m.index,
                self.reference_name(m.index),
                m.distance
            )),
            (OutputFormat::Text, decision @ Decision::Scored { .. }) => Some(format!(
                "{},{}",
                result.name,
                decision.reported_distance().unwrap_or_default()
            )),
            (OutputFormat::Tsv, decision @ Decision::Scored { .. }) => Some(format!(
                "{}\t{}",
                result.name,
                decision.reported_distance().unwrap_or_default()
            )),
        }
    }

    /// TSV column header for the configured mode
    pub fn tsv_header(&self) -> &'static str {
        match self.mode {
            MatchMode::Score => "candidate\tdistance",
            MatchMode::First | MatchMode::Best => {
                "candidate_index\tcandidate\treference_index\treference\tdistance"
            }
        }
    }

    /// Write every decision in the configured format
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails or JSON serialization fails.
    pub fn write<W: Write>(&self, out: &mut W, results: &[CandidateResult]) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => {
                let report = self.json_report(results);
                serde_json::to_writer_pretty(&mut *out, &report)?;
                writeln!(out)?;
            }
            OutputFormat::Tsv => {
                writeln!(out, "{}", self.tsv_header())?;
                self.write_lines(out, results)?;
            }
            OutputFormat::Text => self.write_lines(out, results)?,
        }
        out.flush()?;
        Ok(())
    }

    fn write_lines<W: Write>(&self, out: &mut W, results: &[CandidateResult]) -> std::io::Result<()> {
        for line in results.iter().filter_map(|r| self.render_line(r)) {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }

    fn json_report<'r>(&'r self, results: &'r [CandidateResult]) -> JsonReport<'r> {
        JsonReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            mode: self.mode,
            threshold: self.mode.uses_threshold().then_some(self.threshold),
            candidate_count: results.len(),
            reference_count: self.references.len(),
            results: results
                .iter()
                .map(|r| JsonResult {
                    candidate_index: r.index,
                    candidate: &r.name,
                    decision: &r.decision,
                    reference: match &r.decision {
                        Decision::Matched(m) => Some(self.reference_name(m.index)),
                        Decision::Scored { closest } => {
                            closest.map(|m| self.reference_name(m.index))
                        }
                        Decision::NoMatch => None,
                    },
                })
                .collect(),
        }
    }

    fn reference_name(&self, index: usize) -> &'a str {
        self.references.get(index).map_or("", |r| r.name.as_str())
    }
}
