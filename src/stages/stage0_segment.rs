use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::models::Utterance;

/// Leading timestamp patterns, tried in order; the first match wins
struct TimestampPatterns {
    /// `[00:12] text` / `[00:01:12] text`
    bracketed: Regex,
    /// `00:12 - text`, with an ASCII hyphen, en dash or em dash
    dashed: Regex,
}

impl TimestampPatterns {
    fn new() -> Self {
        Self {
            bracketed: Regex::new(r"^\s*\[(\d{1,2}:\d{2}(?::\d{2})?)\]\s*(.*)$")
                .expect("bracketed timestamp pattern is valid"),
            dashed: Regex::new(r"^\s*(\d{1,2}:\d{2}(?::\d{2})?)\s*[-–—]\s*(.*)$")
                .expect("dashed timestamp pattern is valid"),
        }
    }

    /// Split a trimmed line into (time, text)
    fn split<'a>(&self, line: &'a str) -> (Option<&'a str>, &'a str) {
        for pattern in [&self.bracketed, &self.dashed] {
            if let Some(caps) = pattern.captures(line) {
                let time = caps.get(1).map(|m| m.as_str());
                let text = caps.get(2).map(|m| m.as_str()).unwrap_or("");
                return (time, text.trim());
            }
        }
        (None, line)
    }
}

static PATTERNS: LazyLock<TimestampPatterns> = LazyLock::new(TimestampPatterns::new);

/// Line boundaries: CRLF, LF, lone CR, VT, FF, file/group/record separators,
/// NEL, and the Unicode line and paragraph separators
static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\r\n|[\n\r\x0B\x0C\x1C-\x1E\x{85}\x{2028}\x{2029}]")
        .expect("line break pattern is valid")
});

/// Counts describing a segmentation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentStats {
    /// Number of utterances produced
    pub utterances: usize,
    /// Number of utterances carrying a timestamp
    pub timestamped: usize,
}

impl SegmentStats {
    pub fn from_utterances(utterances: &[Utterance]) -> Self {
        Self {
            utterances: utterances.len(),
            timestamped: utterances.iter().filter(|u| u.time.is_some()).count(),
        }
    }
}

/// Split a raw transcript into utterances.
///
/// Blank lines are dropped before numbering, so `line_no` and `id` count
/// only non-blank lines. A line holding only a timestamp yields an utterance
/// with empty text. Never fails: empty input gives an empty list.
pub fn segment(raw: &str) -> Vec<Utterance> {
    let utterances: Vec<Utterance> = LINE_BREAK
        .split(raw)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(index, line)| {
            let (time, text) = PATTERNS.split(line);
            Utterance::new(index + 1, time.map(str::to_string), text)
        })
        .collect();

    let stats = SegmentStats::from_utterances(&utterances);
    debug!(
        "Segmented {} utterances ({} timestamped)",
        stats.utterances, stats.timestamped
    );

    utterances
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracketed_timestamp() {
        let utterances = segment("[00:12] hello");
        assert_eq!(utterances.len(), 1);
        assert_eq!(utterances[0].time.as_deref(), Some("00:12"));
        assert_eq!(utterances[0].text, "hello");
    }

    #[test]
    fn test_dashed_timestamp() {
        let utterances = segment("00:12 - hello");
        assert_eq!(utterances[0].time.as_deref(), Some("00:12"));
        assert_eq!(utterances[0].text, "hello");
    }

    #[test]
    fn test_dash_variants() {
        let utterances = segment("0:05 – en dash\n01:02:03 — em dash\n1:00-tight");
        assert_eq!(utterances[0].time.as_deref(), Some("0:05"));
        assert_eq!(utterances[0].text, "en dash");
        assert_eq!(utterances[1].time.as_deref(), Some("01:02:03"));
        assert_eq!(utterances[1].text, "em dash");
        assert_eq!(utterances[2].time.as_deref(), Some("1:00"));
        assert_eq!(utterances[2].text, "tight");
    }

    #[test]
    fn test_hours_minutes_seconds_not_mis_split() {
        let utterances = segment("[01:02:03] long call");
        assert_eq!(utterances[0].time.as_deref(), Some("01:02:03"));
        assert_eq!(utterances[0].text, "long call");
    }

    #[test]
    fn test_no_timestamp_keeps_line_verbatim() {
        let utterances = segment("   Customer: is this safe?  ");
        assert!(utterances[0].time.is_none());
        assert_eq!(utterances[0].text, "Customer: is this safe?");
    }

    #[test]
    fn test_unrecognized_shapes_are_plain_text() {
        // three-digit hour, one-digit minute, missing separator
        let utterances = segment("[100:12] a\n[0:1] b\n00:12 hello");
        for u in &utterances {
            assert!(u.time.is_none(), "{:?} should have no time", u);
        }
        assert_eq!(utterances[2].text, "00:12 hello");
    }

    #[test]
    fn test_timestamp_only_line_yields_empty_text() {
        let utterances = segment("[00:12]\n00:15 -");
        assert_eq!(utterances.len(), 2);
        assert_eq!(utterances[0].time.as_deref(), Some("00:12"));
        assert_eq!(utterances[0].text, "");
        assert_eq!(utterances[1].time.as_deref(), Some("00:15"));
        assert_eq!(utterances[1].text, "");
    }

    #[test]
    fn test_blank_lines_are_not_numbered() {
        let raw = "[00:01] Hello\n\n[00:05] This has no loss risk at all";
        let utterances = segment(raw);

        assert_eq!(utterances.len(), 2);
        assert_eq!(utterances[0].id, "u1");
        assert_eq!(utterances[0].line_no, 1);
        assert_eq!(utterances[0].time.as_deref(), Some("00:01"));
        assert_eq!(utterances[0].text, "Hello");
        assert_eq!(utterances[1].id, "u2");
        assert_eq!(utterances[1].line_no, 2);
        assert_eq!(utterances[1].time.as_deref(), Some("00:05"));
        assert_eq!(utterances[1].text, "This has no loss risk at all");
    }

    #[test]
    fn test_ids_are_sequential_for_any_input() {
        let raw = "a\n   \n\tb\r\n\nc\n[00:01] d\n\n\n";
        let utterances = segment(raw);
        let non_blank = raw.lines().filter(|l| !l.trim().is_empty()).count();

        assert_eq!(utterances.len(), non_blank);
        for (i, u) in utterances.iter().enumerate() {
            assert_eq!(u.id, format!("u{}", i + 1));
            assert_eq!(u.line_no, i + 1);
        }
    }

    #[test]
    fn test_all_line_boundaries_split() {
        let utterances = segment("[00:01] a\r[00:02] b\u{2028}c\u{2029}d\x0be\x0cf\x1cg\u{85}h");
        let texts: Vec<&str> = utterances.iter().map(|u| u.text.as_str()).collect();

        assert_eq!(texts, vec!["a", "b", "c", "d", "e", "f", "g", "h"]);
        assert_eq!(utterances[1].time.as_deref(), Some("00:02"));
        assert_eq!(utterances[7].id, "u8");
    }

    #[test]
    fn test_crlf_is_one_boundary() {
        let utterances = segment("a\r\nb\r\n\r\nc");
        assert_eq!(utterances.len(), 3);
        assert_eq!(utterances[2].line_no, 3);
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        assert!(segment("").is_empty());
        assert!(segment("  \n\t\n   ").is_empty());
    }

    #[test]
    fn test_segment_stats() {
        let utterances = segment("[00:01] a\nb\n00:03 - c");
        let stats = SegmentStats::from_utterances(&utterances);
        assert_eq!(stats.utterances, 3);
        assert_eq!(stats.timestamped, 2);
    }
}
