use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::llm::VerdictProvider;
use crate::models::{Utterance, VerdictLabel};
use crate::stages::{screen, segment, ScreeningReport};

/// User-facing message produced by the last submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Nothing went wrong but there was nothing to do
    Warning(String),
    /// The model call failed; the previous report is kept
    Error(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Warning(message) | Notice::Error(message) => message,
        }
    }
}

/// What happened when a script was submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Utterances were screened and the report replaced
    Screened,
    /// The script had no non-blank lines; the model was not called
    NothingToAnalyze,
    /// The model call failed; see the session notice
    Failed,
}

/// State owned by one screening session.
///
/// Created when a session starts and dropped when it ends; nothing is shared
/// between sessions.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    /// Last submitted script, verbatim
    pub raw_script: String,
    /// Utterances the current report was made from
    pub utterances: Vec<Utterance>,
    /// Report from the last successful screening
    pub report: Option<ScreeningReport>,
    /// Utterance selected through a verdict's jump link
    pub focus_id: Option<String>,
    /// Message from the last submission, if any
    pub notice: Option<Notice>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            raw_script: String::new(),
            utterances: Vec::new(),
            report: None,
            focus_id: None,
            notice: None,
        }
    }

    /// Segment and screen a script.
    ///
    /// Utterances, report and focus change together, and only on success, so
    /// verdicts are never shown against lines they were not judged on. An
    /// empty script never reaches the provider. A provider failure is turned
    /// into an error notice and leaves the previous result in place.
    pub async fn submit<P: VerdictProvider>(&mut self, raw: &str, provider: &P) -> SubmitOutcome {
        self.raw_script = raw.to_string();
        self.notice = None;

        let utterances = segment(raw);
        if utterances.is_empty() {
            warn!("Session {}: nothing to analyze", self.id);
            self.notice = Some(Notice::Warning(
                "No utterances to analyze. Paste a transcript first.".to_string(),
            ));
            return SubmitOutcome::NothingToAnalyze;
        }

        match screen(provider, &utterances).await {
            Ok(report) => {
                info!(
                    "Session {}: screened {} utterances",
                    self.id,
                    utterances.len()
                );
                self.utterances = utterances;
                self.report = Some(report);
                self.focus_id = None;
                SubmitOutcome::Screened
            }
            Err(e) => {
                warn!("Session {}: screening failed: {}", self.id, e);
                self.notice = Some(Notice::Error(e.to_string()));
                SubmitOutcome::Failed
            }
        }
    }

    /// Jump to an utterance; unknown ids leave the focus unchanged
    pub fn focus(&mut self, utterance_id: &str) -> bool {
        if self.utterance(utterance_id).is_some() {
            self.focus_id = Some(utterance_id.to_string());
            true
        } else {
            false
        }
    }

    pub fn clear_focus(&mut self) {
        self.focus_id = None;
    }

    pub fn utterance(&self, utterance_id: &str) -> Option<&Utterance> {
        self.utterances.iter().find(|u| u.id == utterance_id)
    }

    pub fn focused_utterance(&self) -> Option<&Utterance> {
        self.focus_id.as_deref().and_then(|id| self.utterance(id))
    }

    /// Highlight label for an utterance; CLEAR when unscreened or without a verdict
    pub fn label_for(&self, utterance_id: &str) -> VerdictLabel {
        self.report
            .as_ref()
            .map(|r| r.label_for(utterance_id))
            .unwrap_or_default()
    }
}
