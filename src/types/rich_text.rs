use serde::{Deserialize, Serialize};

use super::Font;

/// A single run of text with an optional font override
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RichTextRun {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

impl RichTextRun {
    pub fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            font: None,
        }
    }

    pub fn with_font(text: &str, font: Font) -> Self {
        Self {
            text: text.to_string(),
            font: Some(font),
        }
    }
}

/// Concatenate all run texts.
pub fn concat_runs(runs: &[RichTextRun]) -> String {
    let total_len: usize = runs.iter().map(|r| r.text.len()).sum();
    let mut combined = String::with_capacity(total_len);
    for run in runs {
        combined.push_str(&run.text);
    }
    combined
}

/// Character-index spans of a run list.
///
/// Span `i` is the half-open range `[start, end)` of character indices that
/// run `i` occupies in the concatenated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSpans {
    spans: Vec<(usize, usize)>,
}

impl RunSpans {
    pub fn new(runs: &[RichTextRun]) -> Self {
        let mut start = 0;
        let spans = runs
            .iter()
            .map(|run| {
                let end = start + run.text.chars().count();
                let span = (start, end);
                start = end;
                span
            })
            .collect();
        Self { spans }
    }

    /// Index of the run containing character `index`.
    pub fn run_at(&self, index: usize) -> Option<usize> {
        // Spans are sorted and contiguous, so the first span ending past `index` owns it.
        let pos = self.spans.partition_point(|&(_, end)| end <= index);
        match self.spans.get(pos) {
            Some(&(start, end)) if start <= index && index < end => Some(pos),
            _ => None,
        }
    }
}
