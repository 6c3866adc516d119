use serde::{Deserialize, Serialize};

/// An image embedded in the sheet, carried as a base64 payload.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedImage {
    /// Identifier referenced by [`ImageAnchor::image_id`]
    pub id: String,
    /// MIME type (e.g., "image/png")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Base64-encoded image bytes; images without data are skipped at paint time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// Placement of an image relative to its top-left anchor cell
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnchor {
    pub image_id: String,
    /// Anchor row (0-indexed)
    pub from_row: u32,
    /// Anchor column (0-indexed)
    pub from_col: u32,
    /// Column offset inside the anchor cell, in EMUs
    #[serde(default)]
    pub from_col_off: i64,
    /// Row offset inside the anchor cell, in EMUs
    #[serde(default)]
    pub from_row_off: i64,
    /// Explicit width in EMUs; native width when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extent_cx: Option<i64>,
    /// Explicit height in EMUs; native height when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extent_cy: Option<i64>,
}
