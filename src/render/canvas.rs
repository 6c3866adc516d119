//! Canvas 2D surface.

use std::collections::HashMap;

use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, ImageData};

use super::surface::{DecodedImage, FontSpec, Surface};
use crate::error::{GridError, Result};

/// [`Surface`] backed by an `HtmlCanvasElement`
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    /// Bitmaps uploaded to offscreen canvases, by image id
    image_canvases: HashMap<String, HtmlCanvasElement>,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| "Failed to get 2d context")?
            .ok_or("No 2d context available")?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| "Failed to cast to CanvasRenderingContext2d")?;
        ctx.set_text_align("left");
        ctx.set_text_baseline("top");
        Ok(Self {
            width: f64::from(canvas.width()),
            height: f64::from(canvas.height()),
            canvas,
            ctx,
            image_canvases: HashMap::new(),
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    /// Offscreen canvas holding `image`, created on first use.
    fn image_canvas(&mut self, image: &DecodedImage) -> Result<&HtmlCanvasElement> {
        if !self.image_canvases.contains_key(&image.id) {
            let document = Self::document().ok_or("No document available")?;
            let canvas = document
                .create_element("canvas")
                .map_err(|_| "Failed to create canvas")?
                .dyn_into::<HtmlCanvasElement>()
                .map_err(|_| "Failed to cast to HtmlCanvasElement")?;
            canvas.set_width(image.width);
            canvas.set_height(image.height);
            let ctx = canvas
                .get_context("2d")
                .map_err(|_| "Failed to get 2d context")?
                .ok_or("No 2d context available")?
                .dyn_into::<CanvasRenderingContext2d>()
                .map_err(|_| "Failed to cast to CanvasRenderingContext2d")?;
            let data = ImageData::new_with_u8_clamped_array_and_sh(
                Clamped(&*image.pixels),
                image.width,
                image.height,
            )
            .map_err(|_| GridError::Render(format!("bad bitmap for image {}", image.id)))?;
            ctx.put_image_data(&data, 0.0, 0.0)
                .map_err(|_| GridError::Render(format!("failed to upload image {}", image.id)))?;
            self.image_canvases.insert(image.id.clone(), canvas);
        }
        self.image_canvases
            .get(&image.id)
            .ok_or_else(|| GridError::Render(format!("image {} not uploaded", image.id)))
    }
}

impl Surface for CanvasSurface {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn resize(&mut self, width: f64, height: f64, dpr: f64) {
        let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.canvas.set_width((self.width * dpr).round() as u32);
        self.canvas.set_height((self.height * dpr).round() as u32);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", self.width));
        let _ = style.set_property("height", &format!("{}px", self.height));
        // Resizing resets the context state.
        let _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
        self.ctx.set_text_align("left");
        self.ctx.set_text_baseline("top");
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
    }

    fn set_font(&mut self, font: &FontSpec) {
        self.ctx.set_font(&font.css());
    }

    fn set_fill_color(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }

    fn set_stroke_color(&mut self, color: &str) {
        self.ctx.set_stroke_style_str(color);
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.fill_rect(x, y, width, height);
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.stroke_rect(x, y, width, height);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let _ = self.ctx.fill_text(text, x, y);
    }

    fn measure_text(&mut self, text: &str) -> f64 {
        self.ctx
            .measure_text(text)
            .map(|m| m.width())
            .unwrap_or(0.0)
    }

    fn draw_image(&mut self, image: &DecodedImage, x: f64, y: f64, width: f64, height: f64) -> Result<()> {
        let source = self.image_canvas(image)?.clone();
        self.ctx
            .draw_image_with_html_canvas_element_and_dw_and_dh(&source, x, y, width, height)
            .map_err(|_| GridError::Render(format!("failed to draw image {}", image.id)))
    }
}
