//! WebAssembly build of the Valentine greeting
//!
//! Draws the same stages as the terminal version onto a canvas. The page
//! forwards keyboard, pointer and wheel events and calls `tick` from
//! `requestAnimationFrame`.

use valentine_core::Content;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, KeyboardEvent};

mod animations;
mod logger;
mod render;
mod theme;
mod view;

// WASM tests require wasm-pack test to run
#[cfg(all(test, target_arch = "wasm32"))]
mod tests;

pub use theme::Theme;
pub use view::{Bounds, ButtonId, ViewState};

// Initialize panic hook and logging
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logger::init(log::LevelFilter::Info);
}

/// The canvas front end
#[wasm_bindgen]
pub struct ValentineApp {
    view: ViewState,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    width: u32,
    height: u32,
    dpr: f64, // Device pixel ratio for crisp rendering
}

#[wasm_bindgen]
impl ValentineApp {
    /// Attach to a canvas element with the built-in texts
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<ValentineApp, JsValue> {
        Self::attach(canvas_id, ViewState::default())
    }

    /// Attach to a canvas element with texts from a JSON document
    #[wasm_bindgen]
    pub fn with_content(canvas_id: &str, json: &str) -> Result<ValentineApp, JsValue> {
        let content = Content::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("using custom content for {}", content.name);
        Self::attach(canvas_id, ViewState::new(content, None))
    }

    fn attach(canvas_id: &str, view: ViewState) -> Result<ValentineApp, JsValue> {
        let window = web_sys::window().ok_or("No window")?;
        let document = window.document().ok_or("No document")?;

        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("Canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;

        let ctx = canvas
            .get_context("2d")?
            .ok_or("Failed to get 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let width = window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(1000.0) as u32;
        let height = window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(700.0) as u32;

        let mut app = ValentineApp {
            view,
            canvas,
            ctx,
            width,
            height,
            dpr: 1.0,
        };
        app.resize(width, height);
        app.view.tick(now_ms());
        app.render();
        log::info!("attached to #{} at {}x{}", canvas_id, app.width, app.height);
        Ok(app)
    }

    /// Handle keyboard input. Returns true if the key was used, so the
    /// page can call `preventDefault`.
    #[wasm_bindgen]
    pub fn handle_key(&mut self, event: &KeyboardEvent) -> bool {
        let handled = self.view.handle_key(&event.key());
        self.render();
        handled
    }

    /// Click or tap at canvas coordinates (logical pixels)
    #[wasm_bindgen]
    pub fn handle_click(&mut self, x: f64, y: f64) -> bool {
        let hit = self.view.handle_click(x, y);
        self.render();
        hit
    }

    /// Pointer movement at canvas coordinates (logical pixels)
    #[wasm_bindgen]
    pub fn handle_pointer_move(&mut self, x: f64, y: f64) -> bool {
        let dodged = self.view.handle_pointer_move(x, y);
        if dodged {
            self.render();
        }
        dodged
    }

    #[wasm_bindgen]
    pub fn handle_wheel(&mut self, delta_y: f64) {
        self.view.handle_wheel(delta_y);
        self.render();
    }

    /// Turn hover dodging off for touch-only devices
    #[wasm_bindgen]
    pub fn set_hover_dodge(&mut self, enabled: bool) {
        self.view.set_hover_dodge(enabled);
    }

    /// Advance animations (call from requestAnimationFrame)
    #[wasm_bindgen]
    pub fn tick(&mut self, now_ms: f64) {
        self.view.tick(now_ms);
        self.render();
    }

    /// Resize the canvas
    #[wasm_bindgen]
    pub fn resize(&mut self, width: u32, height: u32) {
        // Minimum sizes
        let width = width.max(320);
        let height = height.max(480);

        self.width = width;
        self.height = height;

        // Update dpr in case it changed (e.g., moving to different monitor)
        self.dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);

        // Set actual canvas resolution (scaled by dpr for crisp rendering)
        self.canvas.set_width((width as f64 * self.dpr) as u32);
        self.canvas.set_height((height as f64 * self.dpr) as u32);

        // Set CSS display size (logical pixels)
        let html_element: &HtmlElement = self.canvas.as_ref();
        let style = html_element.style();
        let _ = style.set_property("width", &format!("{}px", width));
        let _ = style.set_property("height", &format!("{}px", height));

        // Reset and scale context to account for dpr
        let _ = self.ctx.reset_transform();
        let _ = self.ctx.scale(self.dpr, self.dpr);

        self.view.resize(width as f64, height as f64);
        self.render();
    }

    /// Current stage name
    #[wasm_bindgen]
    pub fn stage(&self) -> String {
        self.view.stage().to_string()
    }

    /// Snapshot of the interaction state as JSON, for debugging
    #[wasm_bindgen]
    pub fn state_json(&self) -> String {
        serde_json::to_string(&self.view.snapshot()).unwrap_or_default()
    }

    #[wasm_bindgen]
    pub fn get_width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen]
    pub fn get_height(&self) -> u32 {
        self.height
    }

    fn render(&self) {
        render::render(&self.ctx, &self.view);
    }
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
