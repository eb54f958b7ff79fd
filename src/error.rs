//! Error types for the fallible boundaries: configuration, host start-up and
//! replay scripts. The update loop itself has no failure modes.

/// Invalid configuration, detected by `GameConfig::validate`
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid must be between 1x1 and {max}x{max}, got {cols}x{rows}")]
    GridSize { cols: u32, rows: u32, max: u32 },
    #[error("Cell size must be at least 1 pixel")]
    CellSize,
    #[error("Player radius {radius} does not fit a {cols}x{rows} grid")]
    Radius { radius: f32, cols: u32, rows: u32 },
    #[error("Player speed must be finite and >= 0, got {0}")]
    Speed(f32),
    #[error("Start position ({x}, {y}) is outside the playable area")]
    StartOutOfBounds { x: f32, y: f32 },
    #[error("Frame rate must be 1-{max} Hz, got {rate}")]
    FrameRate { rate: u32, max: u32 },
    #[error("Linger ticks must be at most {max}, got {ticks}")]
    LingerTicks { ticks: u64, max: u64 },
    #[error("Invalid color '{0}', expected #rrggbb")]
    Color(String),
    #[error("Unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },
}

/// Fatal problems while acquiring the rendering surface
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("No global window")]
    NoWindow,
    #[error("Window has no document")]
    NoDocument,
    #[error("Canvas element '{0}' not found")]
    MissingCanvas(String),
    #[error("Element '{0}' is not a canvas")]
    NotCanvas(String),
    #[error("2D context unavailable on '{0}'")]
    NoContext(String),
    #[error("Failed to register '{event}' listener: {reason}")]
    Listener { event: &'static str, reason: String },
    #[error("Failed to request an animation frame: {0}")]
    AnimationFrame(String),
}

/// Problems loading a replay script
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}
