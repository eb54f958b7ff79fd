//! Terminal rendering for the native host.
//!
//! Draws the grid as rows of characters with the player's cell marked. The
//! board is only re-emitted when the token crosses into another cell.

use std::io::{self, Write};

use tracing::warn;

use super::{GridGeometry, PlayerSprite, RenderSink};

const EMPTY_CELL: &str = " .";
const PLAYER_CELL: &str = " @";

pub struct TextSink<W: Write> {
    out: W,
    grid: Option<GridGeometry>,
    last_cell: Option<(u32, u32)>,
    frames_written: u64,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            grid: None,
            last_cell: None,
            frames_written: 0,
        }
    }

    /// Number of boards written so far
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_board(&mut self, grid: &GridGeometry, player: Option<(u32, u32)>) -> io::Result<()> {
        let mut board = String::with_capacity(((grid.cols as usize * 2) + 1) * grid.rows as usize);
        for row in 0..grid.rows {
            for col in 0..grid.cols {
                board.push_str(if player == Some((col, row)) {
                    PLAYER_CELL
                } else {
                    EMPTY_CELL
                });
            }
            board.push('\n');
        }
        self.out.write_all(board.as_bytes())?;
        self.out.flush()
    }
}

impl<W: Write> RenderSink for TextSink<W> {
    fn draw_background(&mut self, grid: &GridGeometry) {
        self.grid = Some(*grid);
        self.last_cell = None;
    }

    fn redraw_player(&mut self, sprite: &PlayerSprite) {
        let Some(grid) = self.grid else {
            warn!("Player redraw before background, skipping");
            return;
        };
        let cell = grid.cell_of(sprite.position);
        if cell == self.last_cell {
            return;
        }
        self.last_cell = cell;

        let header = match cell {
            Some((col, row)) => format!(
                "player at ({:.2}, {:.2}) cell [{}, {}]\n",
                sprite.position.x, sprite.position.y, col, row
            ),
            None => format!(
                "player off-grid at ({:.2}, {:.2})\n",
                sprite.position.x, sprite.position.y
            ),
        };
        let result = self
            .out
            .write_all(header.as_bytes())
            .and_then(|_| self.write_board(&grid, cell));
        match result {
            Ok(()) => self.frames_written += 1,
            Err(e) => warn!("Failed to write board: {}", e),
        }
    }

    fn show_rate(&mut self, fps: u32) {
        if let Err(e) = writeln!(self.out, "FPS: {}", fps) {
            warn!("Failed to write FPS: {}", e);
        }
    }
}
