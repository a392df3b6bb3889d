use serde::{Deserialize, Deserializer, Serialize};

/// Classification of a single utterance - restricted enum so the model cannot invent labels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerdictLabel {
    /// Clear unfair-solicitation concern (misstatement, omitted risk, pressure, ...)
    Violation,
    /// Ambiguous wording or missing context
    Caution,
    /// Low likelihood of a violation
    #[default]
    Clear,
}

impl VerdictLabel {
    /// Whether the label should be highlighted in the transcript
    pub fn is_flagged(self) -> bool {
        !matches!(self, VerdictLabel::Clear)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VerdictLabel::Violation => "VIOLATION",
            VerdictLabel::Caution => "CAUTION",
            VerdictLabel::Clear => "CLEAR",
        }
    }

    /// Short badge shown next to a verdict card
    pub fn badge(self) -> &'static str {
        match self {
            VerdictLabel::Violation => "🛑 VIOLATION",
            VerdictLabel::Caution => "⚠️ CAUTION",
            VerdictLabel::Clear => "✅ CLEAR",
        }
    }
}

/// Overall risk of the transcript as judged by the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::High => "HIGH",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::Low => "LOW",
        }
    }
}

/// Per-utterance judgment returned by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Utterance this verdict refers to (may be missing in malformed entries)
    #[serde(default, deserialize_with = "null_as_default")]
    pub utterance_id: String,
    /// Classification
    #[serde(default, deserialize_with = "null_as_default")]
    pub verdict: VerdictLabel,
    /// Statute clause and violation type
    #[serde(default, deserialize_with = "null_as_default")]
    pub law_reference: String,
    /// Why the wording is (or is not) a problem
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason: String,
    /// Suggested replacement wording
    #[serde(default, deserialize_with = "null_as_default")]
    pub suggested_fix: String,
    /// Model confidence (0-1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Verdict {
    pub fn new(utterance_id: impl Into<String>, verdict: VerdictLabel) -> Self {
        Self {
            utterance_id: utterance_id.into(),
            verdict,
            law_reference: String::new(),
            reason: String::new(),
            suggested_fix: String::new(),
            confidence: None,
        }
    }

    pub fn has_id(&self) -> bool {
        !self.utterance_id.trim().is_empty()
    }
}

/// Treat an explicit `null` like an absent key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Transcript-level summary returned by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_violation: bool,
    pub risk_level: RiskLevel,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overall_note: String,
}

/// Complete analysis document returned by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelAnalysis {
    pub summary: AnalysisSummary,
    pub results: Vec<Verdict>,
}

impl ModelAnalysis {
    /// Parse the raw model output
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw.trim())
    }

    /// Whether any per-utterance verdict is a violation
    pub fn any_violation(&self) -> bool {
        self.results
            .iter()
            .any(|v| v.verdict == VerdictLabel::Violation)
    }
}
