//! Browser entry point.
//!
//! `GridView` wires DOM input to a [`SheetCanvas`] drawing on a
//! [`CanvasSurface`]: wheel and mousedown on the canvas, mousemove and
//! mouseup on the document.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::{Callbacks, SheetCanvas};
use crate::error::GridError;
use crate::options::GridOptions;
use crate::render::CanvasSurface;
use crate::types::Sheet;

struct SharedState {
    canvas: HtmlCanvasElement,
    width: f64,
    height: f64,
    dpr: f64,
    grid: Option<SheetCanvas<CanvasSurface>>,
    on_init_load: Option<js_sys::Function>,
    on_error: Option<js_sys::Function>,
}

/// Scrollable sheet grid bound to a canvas element
#[wasm_bindgen]
pub struct GridView {
    state: Rc<RefCell<SharedState>>,
    canvas: HtmlCanvasElement,
    document: Option<Document>,
    wheel_closure: Option<Closure<dyn FnMut(WheelEvent)>>,
    mouse_down_closure: Option<Closure<dyn FnMut(MouseEvent)>>,
    mouse_move_closure: Option<Closure<dyn FnMut(MouseEvent)>>,
    mouse_up_closure: Option<Closure<dyn FnMut(MouseEvent)>>,
}

#[wasm_bindgen]
impl GridView {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, width: f64, height: f64, dpr: f64) -> Result<GridView, JsValue> {
        console_error_panic_hook::set_once();

        let state = Rc::new(RefCell::new(SharedState {
            canvas: canvas.clone(),
            width,
            height,
            dpr,
            grid: None,
            on_init_load: None,
            on_error: None,
        }));
        let document = web_sys::window().and_then(|w| w.document());
        let mut view = GridView {
            state,
            canvas,
            document,
            wheel_closure: None,
            mouse_down_closure: None,
            mouse_move_closure: None,
            mouse_up_closure: None,
        };
        view.attach_listeners()?;
        Ok(view)
    }

    #[wasm_bindgen(js_name = "setOnInitLoad")]
    pub fn set_on_init_load(&self, callback: js_sys::Function) {
        self.state.borrow_mut().on_init_load = Some(callback);
    }

    #[wasm_bindgen(js_name = "setOnError")]
    pub fn set_on_error(&self, callback: js_sys::Function) {
        self.state.borrow_mut().on_error = Some(callback);
    }

    /// Mount a sheet model given as JSON, replacing any previous sheet.
    /// Listeners removed by `detach` are added back.
    pub fn load(&mut self, sheet_json: &str, options_json: Option<String>) -> Result<(), JsValue> {
        let (canvas, size, dpr, on_init_load, on_error) = {
            let mut s = self.state.borrow_mut();
            if let Some(old) = s.grid.as_mut() {
                old.detach();
            }
            s.grid = None;
            (
                s.canvas.clone(),
                (s.width, s.height),
                s.dpr,
                s.on_init_load.clone(),
                s.on_error.clone(),
            )
        };

        let report = |err: GridError| -> JsValue {
            if let Some(f) = &on_error {
                let _ = f.call1(&JsValue::NULL, &JsValue::from_str(&err.to_string()));
            }
            err.into()
        };
        let sheet = Sheet::from_json(sheet_json).map_err(report)?;
        let options = match options_json {
            Some(json) => GridOptions::from_json(&json).map_err(report)?,
            None => GridOptions::default(),
        };
        let surface = CanvasSurface::new(canvas).map_err(report)?;

        let mut callbacks = Callbacks::default();
        if let Some(f) = on_init_load {
            callbacks = callbacks.on_init_load(move || {
                let _ = f.call0(&JsValue::NULL);
            });
        }
        if let Some(f) = on_error {
            callbacks = callbacks.on_error(move |err| {
                let _ = f.call1(&JsValue::NULL, &JsValue::from_str(&err.to_string()));
            });
        }

        let grid = SheetCanvas::mount(sheet, surface, size, dpr, options, callbacks)?;
        self.state.borrow_mut().grid = Some(grid);
        self.attach_listeners()
    }

    /// Re-add the listeners and repaint after `detach`. Safe to call twice.
    pub fn attach(&mut self) -> Result<(), JsValue> {
        self.attach_listeners()?;
        if let Some(grid) = self.state.borrow_mut().grid.as_mut() {
            if grid.is_detached() {
                grid.attach();
                let position = grid.scroll().position();
                grid.frame(position.scroll_left, position.scroll_top);
            }
        }
        Ok(())
    }

    /// Scroll to absolute offsets and repaint.
    #[wasm_bindgen(js_name = "scrollTo")]
    pub fn scroll_to(&self, x: f64, y: f64) {
        if let Some(grid) = self.state.borrow_mut().grid.as_mut() {
            grid.scroll_to(x, y);
        }
    }

    pub fn render(&self) -> JsValue {
        let mut s = self.state.borrow_mut();
        let Some(grid) = s.grid.as_mut() else {
            return JsValue::NULL;
        };
        let stats = grid.render();
        serde_wasm_bindgen::to_value(&stats).unwrap_or(JsValue::NULL)
    }

    pub fn resize(&self, width: f64, height: f64) -> Result<(), JsValue> {
        let mut s = self.state.borrow_mut();
        s.width = width;
        s.height = height;
        if let Some(grid) = s.grid.as_mut() {
            grid.resize(width, height)?;
            let position = grid.scroll().position();
            grid.frame(position.scroll_left, position.scroll_top);
        }
        Ok(())
    }

    /// Clear the canvas; a later `render` repaints.
    pub fn destroy(&self) {
        if let Some(grid) = self.state.borrow_mut().grid.as_mut() {
            grid.destroy();
        }
    }

    /// Remove every listener and mark the grid stale. Safe to call twice.
    pub fn detach(&mut self) {
        if let Some(grid) = self.state.borrow_mut().grid.as_mut() {
            grid.detach();
        }
        if let Some(closure) = self.wheel_closure.take() {
            let _ = self
                .canvas
                .remove_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref());
        }
        if let Some(closure) = self.mouse_down_closure.take() {
            let _ = self
                .canvas
                .remove_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
        }
        if let Some(document) = &self.document {
            if let Some(closure) = self.mouse_move_closure.take() {
                let _ = document
                    .remove_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            }
            if let Some(closure) = self.mouse_up_closure.take() {
                let _ = document
                    .remove_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            }
        }
    }

    /// Paint record under a canvas point, or `null`.
    #[wasm_bindgen(js_name = "cellAt")]
    pub fn cell_at(&self, x: f64, y: f64) -> JsValue {
        let s = self.state.borrow();
        s.grid
            .as_ref()
            .and_then(|g| g.cell_at(x, y))
            .and_then(|record| serde_wasm_bindgen::to_value(record).ok())
            .unwrap_or(JsValue::NULL)
    }

    /// Every paint record of the last frame.
    #[wasm_bindgen(js_name = "cellsInfo")]
    pub fn cells_info(&self) -> JsValue {
        let s = self.state.borrow();
        s.grid
            .as_ref()
            .and_then(|g| serde_wasm_bindgen::to_value(g.cells_info()).ok())
            .unwrap_or(JsValue::NULL)
    }
}

impl GridView {
    /// Add whichever listeners are missing.
    fn attach_listeners(&mut self) -> Result<(), JsValue> {
        if self.wheel_closure.is_none() {
            let state = Rc::clone(&self.state);
            let closure = Closure::wrap(Box::new(move |event: WheelEvent| {
                event.prevent_default();
                if let Some(grid) = state.borrow_mut().grid.as_mut() {
                    grid.wheel(event.delta_x(), event.delta_y());
                }
            }) as Box<dyn FnMut(WheelEvent)>);
            self.canvas
                .add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref())?;
            self.wheel_closure = Some(closure);
        }

        if self.mouse_down_closure.is_none() {
            let state = Rc::clone(&self.state);
            let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
                let (x, y) = canvas_point(&state, &event);
                if let Some(grid) = state.borrow_mut().grid.as_mut() {
                    if grid.pointer_down(x, y) {
                        event.prevent_default();
                    }
                }
            }) as Box<dyn FnMut(MouseEvent)>);
            self.canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            self.mouse_down_closure = Some(closure);
        }

        let Some(document) = &self.document else {
            return Ok(());
        };
        if self.mouse_move_closure.is_none() {
            let state = Rc::clone(&self.state);
            let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
                let (x, y) = canvas_point(&state, &event);
                if let Some(grid) = state.borrow_mut().grid.as_mut() {
                    grid.pointer_move(x, y);
                }
            }) as Box<dyn FnMut(MouseEvent)>);
            document.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            self.mouse_move_closure = Some(closure);
        }
        if self.mouse_up_closure.is_none() {
            let state = Rc::clone(&self.state);
            let closure = Closure::wrap(Box::new(move |_event: MouseEvent| {
                if let Some(grid) = state.borrow_mut().grid.as_mut() {
                    grid.pointer_up();
                }
            }) as Box<dyn FnMut(MouseEvent)>);
            document.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref())?;
            self.mouse_up_closure = Some(closure);
        }
        Ok(())
    }
}

impl Drop for GridView {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Mouse position relative to the canvas' top-left corner in CSS pixels.
fn canvas_point(state: &Rc<RefCell<SharedState>>, event: &MouseEvent) -> (f64, f64) {
    let rect = state.borrow().canvas.get_bounding_client_rect();
    (
        f64::from(event.client_x()) - rect.left(),
        f64::from(event.client_y()) - rect.top(),
    )
}
