//! Canvas layers and the sink that draws on them

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use crate::error::HostError;
use crate::game::constants::{grid, layers};
use crate::render::{GridGeometry, PlayerSprite, RenderSink};

/// One stacked canvas and its 2D context
pub struct Layer {
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
}

impl Layer {
    /// Look up canvas `id`, size it to the grid and grab its 2D context
    pub fn acquire(document: &Document, id: &str, geometry: &GridGeometry) -> Result<Self, HostError> {
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(id)
            .ok_or_else(|| HostError::MissingCanvas(id.to_string()))?
            .dyn_into()
            .map_err(|_| HostError::NotCanvas(id.to_string()))?;

        canvas.set_width(geometry.width_px());
        canvas.set_height(geometry.height_px());

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into().ok())
            .ok_or_else(|| HostError::NoContext(id.to_string()))?;

        Ok(Self { canvas, ctx })
    }

    fn clear(&self) {
        self.ctx.clear_rect(
            0.0,
            0.0,
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        );
    }
}

/// Draws the grid, the player token and the FPS readout on three layers
pub struct CanvasSink {
    grid: Layer,
    player: Layer,
    fps: Layer,
    geometry: GridGeometry,
    /// Pixel square covered by the last drawn token: (x, y, side)
    last_drawn: Option<(f64, f64, f64)>,
}

impl CanvasSink {
    pub fn acquire(document: &Document, geometry: GridGeometry) -> Result<Self, HostError> {
        let [grid_id, player_id, fps_id] = layers::STACK;
        Ok(Self {
            grid: Layer::acquire(document, grid_id, &geometry)?,
            player: Layer::acquire(document, player_id, &geometry)?,
            fps: Layer::acquire(document, fps_id, &geometry)?,
            geometry,
            last_drawn: None,
        })
    }

    /// Canvas receiving mouse input: the top of `layers::STACK`
    ///
    /// The layers are stacked with equal size, so offsets on the top one are
    /// grid pixel coordinates for all of them.
    pub fn pointer_canvas(&self) -> &HtmlCanvasElement {
        &self.fps.canvas
    }
}

impl RenderSink for CanvasSink {
    fn draw_background(&mut self, geometry: &GridGeometry) {
        self.geometry = *geometry;
        let ctx = &self.grid.ctx;
        let width = f64::from(geometry.width_px());
        let height = f64::from(geometry.height_px());
        let cell = f64::from(geometry.cell_px);

        self.grid.clear();
        ctx.set_stroke_style_str(grid::LINE_COLOR);
        ctx.set_line_width(grid::LINE_WIDTH);
        ctx.begin_path();
        for col in 0..=geometry.cols {
            let x = f64::from(col) * cell;
            ctx.move_to(x, 0.0);
            ctx.line_to(x, height);
        }
        for row in 0..=geometry.rows {
            let y = f64::from(row) * cell;
            ctx.move_to(0.0, y);
            ctx.line_to(width, y);
        }
        ctx.stroke();
    }

    fn redraw_player(&mut self, sprite: &PlayerSprite) {
        let ctx = &self.player.ctx;
        if let Some((x, y, side)) = self.last_drawn.take() {
            ctx.clear_rect(x, y, side, side);
        }

        let (cx, cy) = self.geometry.to_pixels(sprite.position);
        let radius = self.geometry.scale(sprite.radius);

        ctx.begin_path();
        if let Err(e) = ctx.arc(cx, cy, radius, 0.0, TAU) {
            tracing::warn!("Failed to draw player: {:?}", e);
            return;
        }
        ctx.set_fill_style_str(&sprite.color.to_css());
        ctx.fill();

        // One pixel of slack for antialiasing
        self.last_drawn = Some((cx - radius - 1.0, cy - radius - 1.0, radius * 2.0 + 2.0));
    }

    fn show_rate(&mut self, fps: u32) {
        let ctx = &self.fps.ctx;
        self.fps.clear();
        ctx.set_font(layers::FPS_FONT);
        ctx.set_fill_style_str(layers::FPS_COLOR);
        if let Err(e) = ctx.fill_text(&format!("FPS: {}", fps), 10.0, 20.0) {
            tracing::warn!("Failed to draw FPS readout: {:?}", e);
        }
    }
}
