//! Rendering seam between the update loop and whatever draws the scene.
//!
//! The loop never touches a canvas or a terminal directly. It hands grid-unit
//! values to a [`RenderSink`], which scales and draws them.

pub mod text;

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::util::vec2::Vec2;

/// RGB fill color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS notation, e.g. `#1e90ff`
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .trim()
            .strip_prefix('#')
            .filter(|h| h.len() == 6 && h.is_ascii())
            .ok_or_else(|| ConfigError::Color(s.to_string()))?;
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ConfigError::Color(s.to_string()))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

/// Grid dimensions plus the pixel scale used to draw them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    pub cols: u32,
    pub rows: u32,
    pub cell_px: u32,
}

impl GridGeometry {
    pub fn width_px(&self) -> u32 {
        self.cols * self.cell_px
    }

    pub fn height_px(&self) -> u32 {
        self.rows * self.cell_px
    }

    /// Grid-unit position to canvas pixels
    pub fn to_pixels(&self, position: Vec2) -> (f64, f64) {
        let scale = f64::from(self.cell_px);
        (f64::from(position.x) * scale, f64::from(position.y) * scale)
    }

    /// Grid-unit length to canvas pixels
    pub fn scale(&self, length: f32) -> f64 {
        f64::from(length) * f64::from(self.cell_px)
    }

    /// Cell containing `position`; points on the far edge belong to the last cell
    ///
    /// `None` off the grid, and always for an empty grid.
    pub fn cell_of(&self, position: Vec2) -> Option<(u32, u32)> {
        if self.cols == 0 || self.rows == 0 || !position.is_finite() {
            return None;
        }
        let (width, height) = (self.cols as f32, self.rows as f32);
        if position.x < 0.0 || position.y < 0.0 || position.x > width || position.y > height {
            return None;
        }
        let col = (position.x.floor() as u32).min(self.cols - 1);
        let row = (position.y.floor() as u32).min(self.rows - 1);
        Some((col, row))
    }
}

/// What the player layer needs to draw the token
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSprite {
    pub position: Vec2,
    pub radius: f32,
    pub color: Color,
}

/// Rendering collaborator driven by `GameSession`
pub trait RenderSink {
    /// Draw the static background grid (once, on start)
    fn draw_background(&mut self, grid: &GridGeometry);

    /// Clear the previous token and draw it at its current position
    fn redraw_player(&mut self, sprite: &PlayerSprite);

    /// Show the latest frames-per-second sample
    fn show_rate(&mut self, fps: u32);
}

impl<S: RenderSink + ?Sized> RenderSink for &mut S {
    fn draw_background(&mut self, grid: &GridGeometry) {
        (**self).draw_background(grid)
    }

    fn redraw_player(&mut self, sprite: &PlayerSprite) {
        (**self).redraw_player(sprite)
    }

    fn show_rate(&mut self, fps: u32) {
        (**self).show_rate(fps)
    }
}

/// Sink that records every call, for tests and benches
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub backgrounds: Vec<GridGeometry>,
    pub sprites: Vec<PlayerSprite>,
    pub rates: Vec<u32>,
}

impl RecordingSink {
    pub fn last_sprite(&self) -> Option<&PlayerSprite> {
        self.sprites.last()
    }

    pub fn clear(&mut self) {
        self.backgrounds.clear();
        self.sprites.clear();
        self.rates.clear();
    }
}

impl RenderSink for RecordingSink {
    fn draw_background(&mut self, grid: &GridGeometry) {
        self.backgrounds.push(*grid);
    }

    fn redraw_player(&mut self, sprite: &PlayerSprite) {
        self.sprites.push(*sprite);
    }

    fn show_rate(&mut self, fps: u32) {
        self.rates.push(fps);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GridGeometry {
        GridGeometry { cols: 10, rows: 10, cell_px: 50 }
    }

    #[test]
    fn test_color_parse_and_display() {
        let c: Color = "#1E90ff".parse().unwrap();
        assert_eq!(c, Color::rgb(0x1e, 0x90, 0xff));
        assert_eq!(c.to_css(), "#1e90ff");
    }

    #[test]
    fn test_color_parse_rejects_garbage() {
        assert!("1e90ff".parse::<Color>().is_err());
        assert!("#1e90f".parse::<Color>().is_err());
        assert!("#zz90ff".parse::<Color>().is_err());
        assert!("#ééé".parse::<Color>().is_err());
    }

    #[test]
    fn test_to_pixels() {
        let g = grid();
        assert_eq!(g.to_pixels(Vec2::new(5.0, 0.5)), (250.0, 25.0));
        assert_eq!(g.scale(0.5), 25.0);
        assert_eq!((g.width_px(), g.height_px()), (500, 500));
    }

    #[test]
    fn test_cell_of() {
        let g = grid();
        assert_eq!(g.cell_of(Vec2::new(0.5, 0.5)), Some((0, 0)));
        assert_eq!(g.cell_of(Vec2::new(9.5, 3.2)), Some((9, 3)));
        // Far edge belongs to the last cell
        assert_eq!(g.cell_of(Vec2::new(10.0, 10.0)), Some((9, 9)));
        assert_eq!(g.cell_of(Vec2::new(-0.1, 2.0)), None);
        assert_eq!(g.cell_of(Vec2::new(11.5, 2.0)), None);
    }

    #[test]
    fn test_cell_of_just_past_far_edge() {
        let g = grid();
        assert_eq!(g.cell_of(Vec2::new(10.5, 2.0)), None);
        assert_eq!(g.cell_of(Vec2::new(2.0, 10.01)), None);
    }

    #[test]
    fn test_cell_of_empty_grid() {
        let g = GridGeometry { cols: 0, rows: 0, cell_px: 50 };
        assert_eq!(g.cell_of(Vec2::new(0.0, 0.0)), None);
    }

    #[test]
    fn test_recording_sink_through_mut_ref() {
        fn paint<S: RenderSink>(mut sink: S) {
            sink.show_rate(60);
            sink.draw_background(&grid());
        }

        let mut sink = RecordingSink::default();
        paint(&mut sink);
        assert_eq!(sink.rates, vec![60]);
        assert_eq!(sink.backgrounds.len(), 1);
    }
}
