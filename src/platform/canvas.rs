//! Canvas2D executor for draw commands

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::render::{DrawCommand, Rgba};

/// Label drop shadow offset in pixels
const SHADOW_OFFSET: f64 = 2.0;

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    dpr: f64,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);
        Ok(Self { canvas, ctx, dpr })
    }

    /// Match the backing store to the element's CSS size and return that size
    pub fn fit(&mut self) -> (f32, f32) {
        if let Some(window) = web_sys::window() {
            self.dpr = window.device_pixel_ratio();
        }
        let w = self.canvas.client_width().max(0) as f64;
        let h = self.canvas.client_height().max(0) as f64;
        self.canvas.set_width((w * self.dpr) as u32);
        self.canvas.set_height((h * self.dpr) as u32);
        (w as f32, h as f32)
    }

    /// Replay one frame's commands in order
    pub fn execute(&self, commands: &[DrawCommand]) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0)?;
        ctx.set_line_cap("round");

        for command in commands {
            match command {
                DrawCommand::Clear { color } => {
                    ctx.set_fill_style_str(&color.to_css());
                    ctx.fill_rect(
                        0.0,
                        0.0,
                        self.canvas.width() as f64 / self.dpr,
                        self.canvas.height() as f64 / self.dpr,
                    );
                }
                DrawCommand::Line {
                    from,
                    to,
                    color,
                    weight,
                    glow,
                } => {
                    if let Some(glow) = glow {
                        ctx.set_shadow_color(&glow.color.to_css());
                        ctx.set_shadow_blur(glow.blur as f64);
                    }
                    ctx.set_stroke_style_str(&color.to_css());
                    ctx.set_line_width(*weight as f64);
                    ctx.begin_path();
                    ctx.move_to(from.x as f64, from.y as f64);
                    ctx.line_to(to.x as f64, to.y as f64);
                    ctx.stroke();
                    if glow.is_some() {
                        self.clear_shadow();
                    }
                }
                DrawCommand::Point { at, color, weight } => {
                    self.disc(at.x, at.y, *weight / 2.0, *color)?;
                }
                DrawCommand::Circle {
                    center,
                    diameter,
                    fill,
                    stroke,
                } => {
                    let radius = (*diameter / 2.0).max(0.0) as f64;
                    ctx.begin_path();
                    ctx.arc(center.x as f64, center.y as f64, radius, 0.0, TAU)?;
                    if let Some(fill) = fill {
                        ctx.set_fill_style_str(&fill.to_css());
                        ctx.fill();
                    }
                    if let Some(stroke) = stroke {
                        ctx.set_stroke_style_str(&stroke.color.to_css());
                        ctx.set_line_width(stroke.weight as f64);
                        ctx.stroke();
                    }
                }
                DrawCommand::Label {
                    at,
                    text,
                    size,
                    color,
                    shadow,
                } => {
                    ctx.set_font(&format!("{}px sans-serif", size));
                    ctx.set_text_align("center");
                    ctx.set_text_baseline("middle");
                    if let Some(shadow) = shadow {
                        ctx.set_fill_style_str(&shadow.to_css());
                        ctx.fill_text(
                            text,
                            at.x as f64 + SHADOW_OFFSET,
                            at.y as f64 + SHADOW_OFFSET,
                        )?;
                    }
                    ctx.set_fill_style_str(&color.to_css());
                    ctx.fill_text(text, at.x as f64, at.y as f64)?;
                }
            }
        }
        Ok(())
    }

    /// Set the element's cursor style
    pub fn set_pointer_cursor(&self, pointer: bool) {
        let cursor = if pointer { "pointer" } else { "default" };
        if let Err(e) = self.canvas.style().set_property("cursor", cursor) {
            log::warn!("Failed to set cursor: {:?}", e);
        }
    }

    fn disc(&self, x: f32, y: f32, radius: f32, color: Rgba) -> Result<(), JsValue> {
        self.ctx.begin_path();
        self.ctx
            .arc(x as f64, y as f64, radius.max(0.0) as f64, 0.0, TAU)?;
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
        Ok(())
    }

    fn clear_shadow(&self) {
        self.ctx.set_shadow_blur(0.0);
        self.ctx.set_shadow_color("rgba(0, 0, 0, 0)");
    }
}
