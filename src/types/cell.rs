use serde::{Deserialize, Serialize};

use super::{concat_runs, RichTextRun, Style};

/// A single cell: position, value and optional style
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    /// Row (0-indexed)
    pub row: u32,
    /// Column (0-indexed)
    pub col: u32,
    #[serde(default)]
    pub value: CellValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
}

impl Cell {
    pub fn new(row: u32, col: u32, value: CellValue) -> Self {
        Self {
            row,
            col,
            value,
            style: None,
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }
}

/// Cell value, tagged by kind.
///
/// Serialized as `{"kind": "numeric", "data": {"value": 45000, "dateLike": true}}`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(tag = "kind", content = "data", rename_all = "camelCase")]
pub enum CellValue {
    #[default]
    Empty,
    String(String),
    Numeric {
        value: f64,
        /// The reader recognised a date number format on this cell
        #[serde(default, rename = "dateLike")]
        date_like: bool,
    },
    /// Day serial shown as a full calendar date
    DateSerial(f64),
    Hyperlink {
        /// Friendly text; `target` is shown when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        target: String,
        /// Rich runs when the link text carries mixed formatting
        #[serde(default, skip_serializing_if = "Option::is_none")]
        runs: Option<Vec<RichTextRun>>,
    },
    RichText(Vec<RichTextRun>),
}

impl CellValue {
    /// Rich-text runs carried by this value, if any.
    pub fn runs(&self) -> Option<&[RichTextRun]> {
        match self {
            Self::RichText(runs) => Some(runs),
            Self::Hyperlink {
                runs: Some(runs), ..
            } => Some(runs),
            _ => None,
        }
    }

    pub fn is_hyperlink(&self) -> bool {
        matches!(self, Self::Hyperlink { .. })
    }

    /// Friendly text of a hyperlink, preferring run text when present.
    pub fn hyperlink_text(&self) -> Option<String> {
        match self {
            Self::Hyperlink {
                runs: Some(runs), ..
            } if !runs.is_empty() => Some(concat_runs(runs)),
            Self::Hyperlink { text, target, .. } => {
                Some(text.clone().unwrap_or_else(|| target.clone()))
            }
            _ => None,
        }
    }
}
