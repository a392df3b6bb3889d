use serde::Serialize;
use tracing::{info, warn};

use crate::error::ScreeningError;
use crate::llm::{build_screening_prompt, validate_analysis, AnalysisValidation, VerdictProvider};
use crate::models::{AnalysisSummary, ModelAnalysis, Utterance, Verdict, VerdictLabel};
use crate::stages::reconcile;

/// Reconciled outcome of one screening call
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningReport {
    /// Model that produced the verdicts
    pub model: String,
    /// Transcript-level summary as returned by the model
    pub summary: AnalysisSummary,
    /// At most one verdict per utterance, in order of first appearance
    pub verdicts: Vec<Verdict>,
    /// Duplicate verdicts collapsed during reconciliation
    pub duplicates_collapsed: usize,
    /// Verdicts dropped for lacking an utterance id
    pub dropped_without_id: usize,
    /// Problems found when checking verdicts against the script
    pub warnings: Vec<String>,
}

impl ScreeningReport {
    /// Any utterance judged a violation raises the compliance alarm
    pub fn raises_alarm(&self) -> bool {
        self.verdicts
            .iter()
            .any(|v| v.verdict == VerdictLabel::Violation)
    }

    pub fn verdict_for(&self, utterance_id: &str) -> Option<&Verdict> {
        crate::stages::verdict_for(&self.verdicts, utterance_id)
    }

    /// Label used for highlighting; utterances without a verdict count as CLEAR
    pub fn label_for(&self, utterance_id: &str) -> VerdictLabel {
        self.verdict_for(utterance_id)
            .map(|v| v.verdict)
            .unwrap_or_default()
    }

    /// Number of verdicts with the given label
    pub fn count(&self, label: VerdictLabel) -> usize {
        self.verdicts.iter().filter(|v| v.verdict == label).count()
    }
}

/// Screen utterances with a single provider call.
///
/// Builds the prompt, calls the provider once (no retry), parses the reply
/// into the analysis schema, reconciles duplicate verdicts and flags
/// inconsistencies with the script. Callers must not pass an empty list.
pub async fn screen<P: VerdictProvider>(
    provider: &P,
    utterances: &[Utterance],
) -> Result<ScreeningReport, ScreeningError> {
    let prompt = build_screening_prompt(utterances);

    info!(
        "Screening {} utterances with {}",
        utterances.len(),
        provider.model()
    );

    let raw = provider.analyze(&prompt).await?;
    let analysis = parse_analysis(&raw)?;

    let reconciled = reconcile(analysis.results);
    let analysis = ModelAnalysis {
        summary: analysis.summary,
        results: reconciled.verdicts,
    };

    let AnalysisValidation { warnings, .. } = validate_analysis(&analysis, utterances);
    for warning in &warnings {
        warn!("{}", warning);
    }

    let report = ScreeningReport {
        model: provider.model().to_string(),
        summary: analysis.summary,
        verdicts: analysis.results,
        duplicates_collapsed: reconciled.duplicates_collapsed,
        dropped_without_id: reconciled.dropped_without_id,
        warnings,
    };

    info!(
        "Screening: Violations: {}, Cautions: {}, Clear: {} (risk {})",
        report.count(VerdictLabel::Violation),
        report.count(VerdictLabel::Caution),
        report.count(VerdictLabel::Clear),
        report.summary.risk_level.as_str()
    );

    Ok(report)
}

/// Parse raw model text, keeping it on failure for diagnosis
pub fn parse_analysis(raw: &str) -> Result<ModelAnalysis, ScreeningError> {
    ModelAnalysis::from_json(raw).map_err(|source| ScreeningError::MalformedResponse {
        raw: raw.to_string(),
        source,
    })
}
