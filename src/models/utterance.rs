use serde::{Deserialize, Serialize};

/// One segmented line of a consultation transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    /// Identifier unique within one segmentation run ("u1", "u2", ...)
    pub id: String,
    /// 1-based position among the non-blank input lines
    pub line_no: usize,
    /// Leading timestamp marker, if the line carried one
    #[serde(default)]
    pub time: Option<String>,
    /// Line content with any recognized timestamp marker stripped
    pub text: String,
}

impl Utterance {
    pub fn new(line_no: usize, time: Option<String>, text: impl Into<String>) -> Self {
        Self {
            id: format!("u{}", line_no),
            line_no,
            time,
            text: text.into(),
        }
    }

    /// Position label such as `line 3, time 00:12`
    pub fn location(&self) -> String {
        match &self.time {
            Some(time) => format!("line {}, time {}", self.line_no, time),
            None => format!("line {}", self.line_no),
        }
    }

    /// Identifier tag used when embedding the utterance in a prompt
    pub fn tag(&self) -> String {
        format!("{} ({})", self.id, self.location())
    }
}
