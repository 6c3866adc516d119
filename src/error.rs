//! Structured error types for xlgrid.
//!
//! Only input errors (a malformed sheet model or viewport) escalate to callers.
//! Paint-stage irregularities fall back to defaults and asset failures are
//! logged and skipped, so neither appears here as a frame failure.

/// All errors that can occur while mounting or rendering a sheet.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// The sheet model violates a boundary invariant.
    #[error("Invalid sheet model: {0}")]
    InvalidSheet(String),

    /// Viewport or device pixel ratio is unusable.
    #[error("Invalid viewport: {0}")]
    Viewport(String),

    /// JSON (de)serialization of the sheet model or options.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Embedded image payload is not valid base64.
    #[error("Image payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Embedded image bytes could not be decoded.
    #[error("Image decode: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// Drawing surface failure.
    #[error("Render error: {0}")]
    Render(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<String> for GridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for GridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
