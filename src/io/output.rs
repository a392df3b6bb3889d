use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{AnalysisSummary, Utterance, Verdict, VerdictLabel};
use crate::session::Session;

/// Shown under every rendering of a screening result
pub const DISCLAIMER: &str =
    "This is an automated pre-screening result; a final judgment requires compliance/legal review.";

/// Shown in the final verdict block when any utterance is a violation
pub const ALARM_MESSAGE: &str = "High-risk alarm raised for the compliance team";

/// Machine-readable screening report
#[derive(Debug, Clone, Serialize)]
pub struct ReportDocument {
    pub session_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub model: String,
    pub utterances: Vec<Utterance>,
    pub summary: AnalysisSummary,
    /// Reconciled verdicts, one per utterance id
    pub results: Vec<Verdict>,
    pub duplicates_collapsed: usize,
    pub dropped_without_id: usize,
    pub warnings: Vec<String>,
    /// Whether any utterance was judged a violation
    pub alarm: bool,
}

impl ReportDocument {
    /// Build from a session; `None` until the session holds a report
    pub fn from_session(session: &Session) -> Option<Self> {
        let report = session.report.as_ref()?;

        Some(Self {
            session_id: session.id,
            generated_at: Utc::now(),
            model: report.model.clone(),
            utterances: session.utterances.clone(),
            summary: report.summary.clone(),
            results: report.verdicts.clone(),
            duplicates_collapsed: report.duplicates_collapsed,
            dropped_without_id: report.dropped_without_id,
            warnings: report.warnings.clone(),
            alarm: report.raises_alarm(),
        })
    }

    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write JSON")?;
        Ok(())
    }
}

/// Two-pane HTML page: highlighted transcript on the left, verdict cards with
/// jump links on the right
pub struct HtmlReport<'a> {
    session: &'a Session,
}

impl<'a> HtmlReport<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Render the full page
    pub fn format(&self) -> String {
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str("<title>Unfair solicitation screening (Article 21)</title>\n");
        html.push_str(
            "<style>\
             body{font-family:sans-serif;margin:24px;}\
             .panes{display:grid;grid-template-columns:1.25fr 1fr;gap:24px;}\
             .card{border:1px solid #ddd;border-radius:8px;padding:8px 12px;margin:8px 0;}\
             .meta{color:#888;margin-left:8px;}\
             .caption{color:#666;font-size:12px;}\
             .alarm{background:#ffdddd;color:#a40000;padding:8px;border-radius:6px;}\
             .clear{background:#ddffdd;color:#1b5e20;padding:8px;border-radius:6px;}\
             </style>\n",
        );
        html.push_str("</head>\n<body>\n");
        html.push_str("<h1>Financial Consumer Protection Act Article 21 screening</h1>\n");

        if let Some(notice) = &self.session.notice {
            html.push_str(&format!(
                "<p class=\"caption\">{}</p>\n",
                html_escape(notice.message())
            ));
        }

        html.push_str("<div class=\"panes\">\n");
        html.push_str(&self.format_transcript_pane());
        html.push_str(&self.format_verdict_pane());
        html.push_str("</div>\n</body>\n</html>\n");

        html
    }

    /// Left pane: every utterance, highlighted by verdict, focused one outlined
    fn format_transcript_pane(&self) -> String {
        let mut pane = String::from("<div>\n<h3>Script (violation/caution highlighted)</h3>\n");
        pane.push_str("<div style=\"line-height:1.6;\">\n");

        for u in &self.session.utterances {
            let style = verdict_style(self.session.label_for(&u.id));
            let border = if self.session.focus_id.as_deref() == Some(u.id.as_str()) {
                "border:2px solid #333; padding:6px; border-radius:8px;"
            } else {
                ""
            };
            let time = u
                .time
                .as_ref()
                .map(|t| format!("[{}] ", html_escape(t)))
                .unwrap_or_default();

            pane.push_str(&format!(
                "<div id=\"{id}\" style=\"margin:6px 0; {border}\"><span style=\"{style}\">{time}{text}</span><span class=\"meta\">({id} / line {line})</span></div>\n",
                id = html_escape(&u.id),
                border = border,
                style = style,
                time = time,
                text = html_escape(&u.text),
                line = u.line_no,
            ));
        }
        pane.push_str("</div>\n");

        if let Some(focused) = self.session.focused_utterance() {
            pane.push_str(&format!(
                "<p class=\"caption\">Selected: {} / {}</p>\n",
                html_escape(&focused.id),
                html_escape(&focused.location())
            ));
        }

        pane.push_str("</div>\n");
        pane
    }

    /// Right pane: summary, verdict cards, final verdict
    fn format_verdict_pane(&self) -> String {
        let mut pane = String::from("<div>\n<h3>Grounds / actions per utterance</h3>\n");

        let report = match &self.session.report {
            Some(report) => report,
            None => {
                pane.push_str("<p>No analysis yet. Submit a script to screen it.</p>\n</div>\n");
                return pane;
            }
        };

        pane.push_str(&format!(
            "<ul><li><b>Risk level</b>: {}</li><li><b>Note</b>: {}</li></ul>\n<hr>\n",
            report.summary.risk_level.as_str(),
            html_escape(&report.summary.overall_note)
        ));

        for verdict in &report.verdicts {
            pane.push_str(&self.format_card(verdict));
        }

        pane.push_str("<hr>\n<h3>Final verdict</h3>\n");
        if report.raises_alarm() {
            pane.push_str(&format!("<div class=\"alarm\">{}</div>\n", ALARM_MESSAGE));
        } else {
            pane.push_str("<div class=\"clear\">CLEAR</div>\n");
        }
        for warning in &report.warnings {
            pane.push_str(&format!("<p class=\"caption\">⚠ {}</p>\n", html_escape(warning)));
        }
        pane.push_str(&format!("<p class=\"caption\">{}</p>\n</div>\n", DISCLAIMER));

        pane
    }

    fn format_card(&self, verdict: &Verdict) -> String {
        let utterance = self.session.utterance(&verdict.utterance_id);
        let id = html_escape(&verdict.utterance_id);
        let location = utterance.map(|u| u.location()).unwrap_or_default();

        let mut card = String::from("<div class=\"card\">\n");
        card.push_str(&format!(
            "<p><b>{} - {} ({})</b></p>\n",
            verdict.verdict.badge(),
            id,
            html_escape(&location)
        ));
        if let Some(u) = utterance {
            card.push_str(&format!("<p>{}</p>\n", html_escape(&u.text)));
        }

        let mut details = String::new();
        if !verdict.law_reference.is_empty() {
            details.push_str(&format!(
                "<li><b>Law / clause</b>: {}</li>",
                html_escape(&verdict.law_reference)
            ));
        }
        if !verdict.reason.is_empty() {
            details.push_str(&format!("<li><b>Reason</b>: {}</li>", html_escape(&verdict.reason)));
        }
        if !verdict.suggested_fix.is_empty() {
            details.push_str(&format!(
                "<li><b>Suggested fix</b>: {}</li>",
                html_escape(&verdict.suggested_fix)
            ));
        }
        if !details.is_empty() {
            card.push_str(&format!("<ul>{}</ul>\n", details));
        }

        if let Some(confidence) = verdict.confidence {
            card.push_str(&format!("<p class=\"caption\">confidence: {}</p>\n", confidence));
        }
        if utterance.is_some() {
            card.push_str(&format!("<a href=\"#{id}\">Jump to {id}</a>\n", id = id));
        }

        card.push_str("</div>\n");
        card
    }

    /// Write to an HTML file
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}

/// Plain-text report for the terminal
pub struct TextReport<'a> {
    session: &'a Session,
}

impl<'a> TextReport<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    pub fn format(&self) -> String {
        let mut output = String::new();

        output.push_str("Screening Result\n");
        output.push_str("================\n");

        let report = match &self.session.report {
            Some(report) => report,
            None => {
                output.push_str("No analysis available.\n");
                return output;
            }
        };

        output.push_str(&format!("Model: {}\n", report.model));
        output.push_str(&format!("Utterances: {}\n", self.session.utterances.len()));
        output.push_str(&format!("Risk level: {}\n", report.summary.risk_level.as_str()));
        output.push_str(&format!("Note: {}\n\n", report.summary.overall_note));

        for verdict in report.verdicts.iter().filter(|v| v.verdict.is_flagged()) {
            let location = self
                .session
                .utterance(&verdict.utterance_id)
                .map(|u| u.location())
                .unwrap_or_else(|| "unknown utterance".to_string());
            output.push_str(&format!(
                "{} {} ({})\n",
                verdict.verdict.badge(),
                verdict.utterance_id,
                location
            ));
            if let Some(u) = self.session.utterance(&verdict.utterance_id) {
                output.push_str(&format!("    \"{}\"\n", u.text));
            }
            if !verdict.reason.is_empty() {
                output.push_str(&format!("    reason: {}\n", verdict.reason));
            }
            if !verdict.suggested_fix.is_empty() {
                output.push_str(&format!("    fix: {}\n", verdict.suggested_fix));
            }
        }

        output.push('\n');
        output.push_str(&format!("Violations: {}\n", report.count(VerdictLabel::Violation)));
        output.push_str(&format!("Cautions: {}\n", report.count(VerdictLabel::Caution)));
        output.push_str(&format!("Clear: {}\n", report.count(VerdictLabel::Clear)));
        if report.raises_alarm() {
            output.push_str(&format!("Final verdict: {}\n", ALARM_MESSAGE));
        } else {
            output.push_str("Final verdict: CLEAR\n");
        }
        for warning in &report.warnings {
            output.push_str(&format!("warning: {}\n", warning));
        }
        output.push_str(DISCLAIMER);
        output.push('\n');

        output
    }
}

/// Inline highlight style for a verdict label
fn verdict_style(label: VerdictLabel) -> &'static str {
    match label {
        VerdictLabel::Violation => {
            "background-color:#ffdddd; color:#a40000; padding:2px 4px; border-radius:4px;"
        }
        VerdictLabel::Caution => {
            "background-color:#fff3cd; color:#7a5a00; padding:2px 4px; border-radius:4px;"
        }
        VerdictLabel::Clear => "",
    }
}

/// Escapes HTML so transcript and model text cannot inject markup
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::stage1_llm_screen::tests::{StubProvider, DUPLICATED_REPLY};

    async fn screened_session() -> Session {
        let mut session = Session::new();
        session
            .submit(
                "[00:01] Hello\n\n[00:05] This has no loss risk at all",
                &StubProvider::replying(DUPLICATED_REPLY),
            )
            .await;
        session
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape("<b>\"a\" & b</b>"),
            "&lt;b&gt;&quot;a&quot; &amp; b&lt;/b&gt;"
        );
    }

    #[tokio::test]
    async fn test_html_highlights_and_jump_links() {
        let mut session = screened_session().await;
        session.focus("u2");

        let html = HtmlReport::new(&session).format();

        assert!(html.contains("<div id=\"u1\""));
        assert!(html.contains("<div id=\"u2\" style=\"margin:6px 0; border:2px solid #333;"));
        assert!(html.contains(verdict_style(VerdictLabel::Violation)));
        assert!(html.contains("<a href=\"#u2\">Jump to u2</a>"));
        assert!(html.contains("Selected: u2 / line 2, time 00:05"));
        assert!(html.contains(ALARM_MESSAGE));
        assert!(html.contains(DISCLAIMER));
    }

    #[tokio::test]
    async fn test_html_escapes_transcript_text() {
        let mut session = Session::new();
        session
            .submit(
                "<script>alert(1)</script>",
                &StubProvider::replying(
                    r#"{"summary": {"has_violation": false, "risk_level": "LOW"}, "results": []}"#,
                ),
            )
            .await;

        let html = HtmlReport::new(&session).format();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("<div class=\"clear\">CLEAR</div>"));
    }

    #[test]
    fn test_html_without_report() {
        let session = Session::new();
        let html = HtmlReport::new(&session).format();
        assert!(html.contains("No analysis yet"));
    }

    #[tokio::test]
    async fn test_text_report_lists_flagged_only() {
        let session = screened_session().await;
        let text = TextReport::new(&session).format();

        assert!(text.contains("VIOLATION u2 (line 2, time 00:05)"));
        assert!(!text.contains("CLEAR u1"));
        assert!(text.contains("Violations: 1\nCautions: 0\nClear: 1\n"));
        assert!(text.contains(ALARM_MESSAGE));
    }

    #[tokio::test]
    async fn test_write_json_report() {
        let session = screened_session().await;
        let document = ReportDocument::from_session(&session).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        document.write_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["alarm"], true);
        assert_eq!(value["results"].as_array().unwrap().len(), 2);
        assert_eq!(value["utterances"][1]["time"], "00:05");
        assert_eq!(value["summary"]["risk_level"], "HIGH");
    }

    #[test]
    fn test_document_requires_report() {
        assert!(ReportDocument::from_session(&Session::new()).is_none());
    }
}
