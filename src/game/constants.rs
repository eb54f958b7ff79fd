//! Default values for the playfield, the player token and frame pacing.
//! Every value here can be overridden through `GameConfig` (see `config.rs`).

/// Playfield constants
pub mod grid {
    /// Number of columns in grid units
    /// ENV: GRID_COLS
    pub const COLS: u32 = 10;
    /// Number of rows in grid units
    /// ENV: GRID_ROWS
    pub const ROWS: u32 = 10;
    /// Pixels per grid unit on the canvas
    /// ENV: CELL_SIZE
    pub const CELL_PX: u32 = 50;
    /// Upper limit for either grid dimension
    pub const MAX_DIMENSION: u32 = 1000;
    /// Background grid line color
    pub const LINE_COLOR: &str = "#cccccc";
    /// Background grid line width in pixels
    pub const LINE_WIDTH: f64 = 1.0;
}

/// Player token constants (grid units)
pub mod player {
    /// Starting x position (centre of the default grid)
    /// ENV: PLAYER_START_X
    pub const START_X: f32 = 5.0;
    /// Starting y position
    /// ENV: PLAYER_START_Y
    pub const START_Y: f32 = 5.0;
    /// Token radius
    /// ENV: PLAYER_RADIUS
    pub const RADIUS: f32 = 0.5;
    /// Distance covered per tick (or per second, depending on SPEED_UNIT)
    /// ENV: PLAYER_SPEED
    pub const SPEED: f32 = 0.1;
    /// Fill color, CSS hex notation
    /// ENV: PLAYER_COLOR
    pub const COLOR: &str = "#1e90ff";
}

/// Frame pacing and rate sampling
pub mod timing {
    /// Length of one frame-rate sampling window in milliseconds
    pub const RATE_WINDOW_MS: f64 = 1000.0;
    /// Tick rate of the native host in Hz (the browser follows its display)
    /// ENV: FRAME_RATE
    pub const FRAME_RATE: u32 = 60;
    /// Upper limit for FRAME_RATE
    pub const MAX_FRAME_RATE: u32 = 1000;
    /// Ticks the native host keeps running after the last scripted event
    /// ENV: LINGER_TICKS
    pub const LINGER_TICKS: u64 = 30;
    /// Upper limit for LINGER_TICKS (ten minutes at the maximum frame rate)
    pub const MAX_LINGER_TICKS: u64 = 600_000;
}

/// Input plumbing
pub mod input {
    /// Pending events the queue holds between two ticks
    /// Far above what a keyboard and a mouse produce in one frame
    pub const QUEUE_CAPACITY: usize = 256;
    /// Key identifier toggling pause (compared lower-cased)
    pub const PAUSE_KEY: &str = "escape";
}

/// Canvas element ids used by the browser host
pub mod layers {
    pub const GRID: &str = "grid-layer";
    pub const PLAYER: &str = "player-layer";
    pub const FPS: &str = "fps-layer";
    /// Stacking order, bottom to top; the top layer receives pointer events
    pub const STACK: [&str; 3] = [GRID, PLAYER, FPS];
    /// Font used for the FPS readout
    pub const FPS_FONT: &str = "16px monospace";
    pub const FPS_COLOR: &str = "#222222";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_layer_is_topmost() {
        assert_eq!(layers::STACK.last(), Some(&layers::FPS));
    }

    #[test]
    fn test_default_start_is_grid_centre() {
        assert_eq!(player::START_X, grid::COLS as f32 / 2.0);
        assert_eq!(player::START_Y, grid::ROWS as f32 / 2.0);
    }
}
