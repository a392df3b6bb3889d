use std::collections::HashSet;

use crate::models::{ModelAnalysis, Utterance, Verdict, VerdictLabel};

/// Outcome of checking a reconciled analysis against the segmented script
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisValidation {
    /// Verdicts naming an utterance id that was never sent
    pub unknown_ids: Vec<String>,
    /// Utterances the model returned no verdict for
    pub uncovered_ids: Vec<String>,
    /// Issues that do not invalidate the analysis but should be surfaced
    pub warnings: Vec<String>,
}

impl AnalysisValidation {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Flag (without rejecting) the ways an analysis can disagree with the script
///
/// Expects `analysis.results` to be reconciled already.
pub fn validate_analysis(analysis: &ModelAnalysis, utterances: &[Utterance]) -> AnalysisValidation {
    let mut validation = AnalysisValidation::default();

    let known: HashSet<&str> = utterances.iter().map(|u| u.id.as_str()).collect();
    let answered: HashSet<&str> = analysis
        .results
        .iter()
        .map(|v| v.utterance_id.as_str())
        .collect();

    // 1. Verdicts for ids that were not in the prompt
    for verdict in &analysis.results {
        if !known.contains(verdict.utterance_id.as_str()) {
            validation.unknown_ids.push(verdict.utterance_id.clone());
        }
    }
    if !validation.unknown_ids.is_empty() {
        validation.warnings.push(format!(
            "Verdicts reference unknown utterances: {}",
            validation.unknown_ids.join(", ")
        ));
    }

    // 2. Utterances without a verdict (treated as CLEAR downstream)
    validation.uncovered_ids = utterances
        .iter()
        .filter(|u| !answered.contains(u.id.as_str()))
        .map(|u| u.id.clone())
        .collect();
    if !validation.uncovered_ids.is_empty() {
        validation.warnings.push(format!(
            "No verdict returned for {} of {} utterances: {}",
            validation.uncovered_ids.len(),
            utterances.len(),
            validation.uncovered_ids.join(", ")
        ));
    }

    // 3. Confidence outside [0, 1]
    for verdict in &analysis.results {
        if let Some(confidence) = out_of_range_confidence(verdict) {
            validation.warnings.push(format!(
                "Confidence {} for {} is outside [0, 1]",
                confidence, verdict.utterance_id
            ));
        }
    }

    // 4. Summary flag contradicting the per-utterance verdicts
    let any_violation = analysis
        .results
        .iter()
        .any(|v| v.verdict == VerdictLabel::Violation);
    if analysis.summary.has_violation != any_violation {
        validation.warnings.push(format!(
            "Summary has_violation={} but {} utterance is marked VIOLATION",
            analysis.summary.has_violation,
            if any_violation { "at least one" } else { "no" }
        ));
    }

    validation
}

fn out_of_range_confidence(verdict: &Verdict) -> Option<f64> {
    verdict
        .confidence
        .filter(|c| !(0.0..=1.0).contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalysisSummary, RiskLevel};
    use crate::stages::segment;

    fn analysis(has_violation: bool, results: Vec<Verdict>) -> ModelAnalysis {
        ModelAnalysis {
            summary: AnalysisSummary {
                has_violation,
                risk_level: RiskLevel::Low,
                overall_note: String::new(),
            },
            results,
        }
    }

    #[test]
    fn test_consistent_analysis_is_clean() {
        let utterances = segment("Hello\nThere is no loss risk");
        let analysis = analysis(
            true,
            vec![
                Verdict::new("u1", VerdictLabel::Clear),
                Verdict::new("u2", VerdictLabel::Violation),
            ],
        );

        let validation = validate_analysis(&analysis, &utterances);
        assert!(validation.is_clean(), "{:?}", validation.warnings);
    }

    #[test]
    fn test_unknown_and_uncovered_ids() {
        let utterances = segment("a\nb\nc");
        let analysis = analysis(
            false,
            vec![
                Verdict::new("u1", VerdictLabel::Clear),
                Verdict::new("u9", VerdictLabel::Clear),
            ],
        );

        let validation = validate_analysis(&analysis, &utterances);
        assert_eq!(validation.unknown_ids, vec!["u9"]);
        assert_eq!(validation.uncovered_ids, vec!["u2", "u3"]);
        assert_eq!(validation.warnings.len(), 2);
    }

    #[test]
    fn test_confidence_out_of_range() {
        let utterances = segment("a");
        let mut verdict = Verdict::new("u1", VerdictLabel::Clear);
        verdict.confidence = Some(1.5);

        let validation = validate_analysis(&analysis(false, vec![verdict]), &utterances);
        assert_eq!(validation.warnings.len(), 1);
        assert!(validation.warnings[0].contains("outside [0, 1]"));
    }

    #[test]
    fn test_summary_contradiction() {
        let utterances = segment("a");
        let analysis = analysis(true, vec![Verdict::new("u1", VerdictLabel::Caution)]);

        let validation = validate_analysis(&analysis, &utterances);
        assert_eq!(validation.warnings.len(), 1);
        assert!(validation.warnings[0].contains("has_violation=true"));
    }
}
