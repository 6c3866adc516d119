//! Decoding and caching of embedded images.

use std::collections::HashMap;
use std::rc::Rc;

use base64::Engine as _;

use super::surface::DecodedImage;
use crate::error::{GridError, Result};
use crate::types::EmbeddedImage;

/// Decoded bitmaps by image id. Failures are remembered so a broken payload
/// is decoded (and reported) once, then skipped.
#[derive(Debug, Default)]
pub struct ImageStore {
    decoded: HashMap<String, Option<Rc<DecodedImage>>>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoded bitmap for `image`, or `None` if it has no usable payload.
    pub fn get_or_decode(&mut self, image: &EmbeddedImage) -> Option<Rc<DecodedImage>> {
        if let Some(entry) = self.decoded.get(&image.id) {
            return entry.clone();
        }
        let entry = match decode_image(image) {
            Ok(decoded) => {
                tracing::debug!(
                    id = %image.id,
                    width = decoded.width,
                    height = decoded.height,
                    "decoded image"
                );
                Some(Rc::new(decoded))
            }
            Err(err) => {
                tracing::warn!(id = %image.id, error = %err, "skipping image");
                None
            }
        };
        self.decoded.insert(image.id.clone(), entry.clone());
        entry
    }

    pub fn len(&self) -> usize {
        self.decoded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoded.is_empty()
    }
}

/// Decode a base64 payload (bare or as a `data:` URL) to RGBA.
pub fn decode_image(image: &EmbeddedImage) -> Result<DecodedImage> {
    let data = image
        .data
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| GridError::Render(format!("image {} has no data", image.id)))?;
    let payload = match data.split_once("base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => data,
    };
    let bytes = base64::engine::general_purpose::STANDARD.decode(payload.trim())?;
    let rgba = image::load_from_memory(&bytes)?.to_rgba8();
    Ok(DecodedImage {
        id: image.id.clone(),
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw().into(),
    })
}
