use std::path::Path;

use anyhow::{Context, Result};

/// Read a raw transcript from a file, or from stdin when the path is `-`
pub fn read_transcript(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        return std::io::read_to_string(std::io::stdin()).context("Failed to read transcript from stdin");
    }

    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))
}
