use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{info, warn};

use crate::io::{HtmlReport, ReportDocument};
use crate::session::Session;

/// Configuration for rendering
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Whether to generate the JSON report
    pub generate_json: bool,
    /// Whether to generate the HTML report
    pub generate_html: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            generate_json: true,
            generate_html: true,
        }
    }
}

/// Paths written by the render stage
#[derive(Debug, Default)]
pub struct RenderResult {
    pub json_path: Option<PathBuf>,
    pub html_path: Option<PathBuf>,
}

/// Write the session's report views.
///
/// The JSON report needs a screening result and is skipped without one; the
/// HTML page is always written so the transcript can still be reviewed.
pub fn render(
    session: &Session,
    json_output: Option<&Path>,
    html_output: Option<&Path>,
    config: &RenderConfig,
) -> Result<RenderResult> {
    let mut result = RenderResult::default();

    if config.generate_json {
        if let Some(path) = json_output {
            match ReportDocument::from_session(session) {
                Some(document) => {
                    info!("Writing JSON report to {:?}", path);
                    document.write_json(path)?;
                    result.json_path = Some(path.to_path_buf());
                }
                None => warn!("No screening result; skipping JSON report {:?}", path),
            }
        }
    }

    if config.generate_html {
        if let Some(path) = html_output {
            info!("Writing HTML report to {:?}", path);
            HtmlReport::new(session).write_file(path)?;
            result.html_path = Some(path.to_path_buf());
        }
    }

    Ok(result)
}
