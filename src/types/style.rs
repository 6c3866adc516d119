use serde::{Deserialize, Serialize};

/// Cell style as handed over by the workbook reader.
///
/// Every part is optional; readers fill in whatever the source format had and
/// the painter falls back to defaults for the rest.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Fill>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<Borders>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Font {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Size in points
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorSpec>,
}

/// A color given either as packed ARGB hex or as a theme index.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ColorSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub argb: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<u32>,
}

impl ColorSpec {
    pub fn argb(argb: &str) -> Self {
        Self {
            argb: Some(argb.to_string()),
            theme: None,
        }
    }

    pub fn theme(index: u32) -> Self {
        Self {
            argb: None,
            theme: Some(index),
        }
    }
}

/// Pattern fill. Only the foreground color is painted.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Fill {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fg_color: Option<ColorSpec>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Borders {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<BorderSide>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<BorderSide>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<BorderSide>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<BorderSide>,
}

impl Borders {
    /// First side color present, checked left, top, right, bottom.
    pub fn stroke_color(&self) -> Option<&str> {
        [&self.left, &self.top, &self.right, &self.bottom]
            .into_iter()
            .flatten()
            .find_map(|side| side.color.as_ref().and_then(|c| c.argb.as_deref()))
    }
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BorderSide {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorSpec>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Alignment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizontal: Option<HAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical: Option<VAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrap_text: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum HAlign {
    Left,
    Center,
    Right,
    General,
    Fill,
    Justify,
    CenterContinuous,
    Distributed,
    #[serde(other)]
    Other,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum VAlign {
    Top,
    #[serde(alias = "center")]
    Middle,
    Bottom,
    Justify,
    Distributed,
    #[serde(other)]
    Other,
}
