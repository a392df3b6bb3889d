pub mod error;
pub mod io;
pub mod llm;
pub mod models;
pub mod session;
pub mod stages;

pub use error::ScreeningError;
pub use io::{read_transcript, HtmlReport, ReportDocument, TextReport};
pub use llm::{
    build_screening_prompt, validate_analysis, OpenAiClient, OpenAiConfig, VerdictProvider,
};
pub use models::{
    AnalysisSummary, ModelAnalysis, RiskLevel, Utterance, Verdict, VerdictLabel,
};
pub use session::{Notice, Session, SubmitOutcome};
pub use stages::{
    reconcile, render, screen, segment, ReconcileResult, RenderConfig, RenderResult,
    ScreeningReport, SegmentStats,
};
