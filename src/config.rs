use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::game::bounds::{Bounds, BoundsPolicy};
use crate::game::constants::{grid, player, timing};
use crate::game::input::KeyBindings;
use crate::game::session::SpeedUnit;
use crate::render::{Color, GridGeometry};

/// Which keys steer the player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyLayout {
    /// Arrow keys and WASD
    #[default]
    ArrowsAndWasd,
    /// WASD only
    Wasd,
}

impl KeyLayout {
    pub fn bindings(&self) -> KeyBindings {
        match self {
            KeyLayout::ArrowsAndWasd => KeyBindings::arrows_and_wasd(),
            KeyLayout::Wasd => KeyBindings::wasd(),
        }
    }
}

impl FromStr for KeyLayout {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arrows_and_wasd" | "arrows+wasd" | "all" => Ok(KeyLayout::ArrowsAndWasd),
            "wasd" => Ok(KeyLayout::Wasd),
            _ => Err(ConfigError::UnknownVariant {
                kind: "key layout",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for KeyLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyLayout::ArrowsAndWasd => f.write_str("arrows_and_wasd"),
            KeyLayout::Wasd => f.write_str("wasd"),
        }
    }
}

/// Demo configuration
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Grid width in cells
    pub grid_cols: u32,
    /// Grid height in cells
    pub grid_rows: u32,
    /// Pixels per grid unit
    pub cell_px: u32,
    /// Player start position (grid units)
    pub start_x: f32,
    pub start_y: f32,
    pub player_radius: f32,
    /// Player speed, interpreted according to `speed_unit`
    pub player_speed: f32,
    pub player_color: Color,
    pub speed_unit: SpeedUnit,
    pub bounds_policy: BoundsPolicy,
    pub key_layout: KeyLayout,
    /// Escape toggles pause
    pub pause_enabled: bool,
    /// Native host tick rate in Hz
    pub frame_rate: u32,
    /// Native host ticks to keep running after the last scripted event
    pub linger_ticks: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_cols: grid::COLS,
            grid_rows: grid::ROWS,
            cell_px: grid::CELL_PX,
            start_x: player::START_X,
            start_y: player::START_Y,
            player_radius: player::RADIUS,
            player_speed: player::SPEED,
            // Same value as player::COLOR
            player_color: Color::rgb(0x1e, 0x90, 0xff),
            speed_unit: SpeedUnit::default(),
            bounds_policy: BoundsPolicy::default(),
            key_layout: KeyLayout::default(),
            pause_enabled: true,
            frame_rate: timing::FRAME_RATE,
            linger_ticks: timing::LINGER_TICKS,
        }
    }
}

/// Parse `key` from `lookup`, keeping `current` when absent or invalid
fn override_with<T, F>(lookup: &F, key: &str, current: &mut T)
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(key) {
        match raw.trim().parse::<T>() {
            Ok(parsed) => *current = parsed,
            Err(_) => tracing::warn!("Invalid {} '{}', using default", key, raw),
        }
    }
}

impl GameConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load config from any key/value source, falling back to defaults
    ///
    /// Unparsable values are logged and ignored; range checks are left to
    /// [`GameConfig::validate`].
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        override_with(&lookup, "GRID_COLS", &mut config.grid_cols);
        override_with(&lookup, "GRID_ROWS", &mut config.grid_rows);
        override_with(&lookup, "CELL_SIZE", &mut config.cell_px);
        override_with(&lookup, "PLAYER_START_X", &mut config.start_x);
        override_with(&lookup, "PLAYER_START_Y", &mut config.start_y);
        override_with(&lookup, "PLAYER_RADIUS", &mut config.player_radius);
        override_with(&lookup, "PLAYER_SPEED", &mut config.player_speed);
        override_with(&lookup, "PLAYER_COLOR", &mut config.player_color);
        override_with(&lookup, "SPEED_UNIT", &mut config.speed_unit);
        override_with(&lookup, "BOUNDS_POLICY", &mut config.bounds_policy);
        override_with(&lookup, "KEY_LAYOUT", &mut config.key_layout);
        override_with(&lookup, "PAUSE_ENABLED", &mut config.pause_enabled);

        if let Some(rate) = lookup("FRAME_RATE") {
            match rate.trim().parse::<u32>() {
                Ok(parsed) if parsed > 0 && parsed <= timing::MAX_FRAME_RATE => {
                    config.frame_rate = parsed;
                }
                Ok(_) => tracing::warn!(
                    "FRAME_RATE must be 1-{}, using default",
                    timing::MAX_FRAME_RATE
                ),
                Err(_) => tracing::warn!("Invalid FRAME_RATE '{}', using default", rate),
            }
        }

        override_with(&lookup, "LINGER_TICKS", &mut config.linger_ticks);

        config
    }

    /// Same config on a different grid, with the player re-centred
    pub fn with_grid(mut self, cols: u32, rows: u32) -> Self {
        self.grid_cols = cols;
        self.grid_rows = rows;
        self.start_x = cols as f32 / 2.0;
        self.start_y = rows as f32 / 2.0;
        self
    }

    pub fn grid(&self) -> GridGeometry {
        GridGeometry {
            cols: self.grid_cols,
            rows: self.grid_rows,
            cell_px: self.cell_px,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.grid_cols, self.grid_rows, self.bounds_policy)
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        let max = grid::MAX_DIMENSION;
        if !(1..=max).contains(&self.grid_cols) || !(1..=max).contains(&self.grid_rows) {
            return Err(ConfigError::GridSize {
                cols: self.grid_cols,
                rows: self.grid_rows,
                max,
            });
        }
        if self.cell_px == 0 {
            return Err(ConfigError::CellSize);
        }

        let bounds = self.bounds();
        if !self.player_radius.is_finite() || !bounds.fits(self.player_radius) {
            return Err(ConfigError::Radius {
                radius: self.player_radius,
                cols: self.grid_cols,
                rows: self.grid_rows,
            });
        }
        if !self.player_speed.is_finite() || self.player_speed < 0.0 {
            return Err(ConfigError::Speed(self.player_speed));
        }
        if !bounds.contains_x(self.start_x, self.player_radius)
            || !bounds.contains_y(self.start_y, self.player_radius)
        {
            return Err(ConfigError::StartOutOfBounds {
                x: self.start_x,
                y: self.start_y,
            });
        }
        if self.frame_rate == 0 || self.frame_rate > timing::MAX_FRAME_RATE {
            return Err(ConfigError::FrameRate {
                rate: self.frame_rate,
                max: timing::MAX_FRAME_RATE,
            });
        }
        if self.linger_ticks > timing::MAX_LINGER_TICKS {
            return Err(ConfigError::LingerTicks {
                ticks: self.linger_ticks,
                max: timing::MAX_LINGER_TICKS,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> GameConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GameConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!((config.grid_cols, config.grid_rows), (10, 10));
        assert_eq!(config.player_speed, 0.1);
        assert_eq!(config.player_color.to_css(), player::COLOR);
        assert_eq!(config.speed_unit, SpeedUnit::PerTick);
        assert_eq!(config.bounds_policy, BoundsPolicy::RadiusAware);
        assert!(config.pause_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_or_default() {
        let config = GameConfig::load_or_default();
        assert!(config.frame_rate > 0);
    }

    #[test]
    fn test_overrides() {
        let config = from_pairs(&[
            ("GRID_COLS", "20"),
            ("GRID_ROWS", " 15 "),
            ("PLAYER_COLOR", "#ff0000"),
            ("SPEED_UNIT", "per_second"),
            ("BOUNDS_POLICY", "edge"),
            ("KEY_LAYOUT", "wasd"),
            ("PAUSE_ENABLED", "false"),
            ("FRAME_RATE", "30"),
        ]);
        assert_eq!((config.grid_cols, config.grid_rows), (20, 15));
        assert_eq!(config.player_color, Color::rgb(255, 0, 0));
        assert_eq!(config.speed_unit, SpeedUnit::PerSecond);
        assert_eq!(config.bounds_policy, BoundsPolicy::Edge);
        assert_eq!(config.key_layout, KeyLayout::Wasd);
        assert!(!config.pause_enabled);
        assert_eq!(config.frame_rate, 30);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = from_pairs(&[
            ("GRID_COLS", "ten"),
            ("PLAYER_COLOR", "blue"),
            ("SPEED_UNIT", "per_minute"),
            ("FRAME_RATE", "0"),
        ]);
        let default = GameConfig::default();
        assert_eq!(config.grid_cols, default.grid_cols);
        assert_eq!(config.player_color, default.player_color);
        assert_eq!(config.speed_unit, default.speed_unit);
        assert_eq!(config.frame_rate, default.frame_rate);
    }

    #[test]
    fn test_validate_grid_size() {
        let config = GameConfig {
            grid_cols: 0,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::GridSize { .. })));

        let config = GameConfig {
            cell_px: 0,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::CellSize));
    }

    #[test]
    fn test_validate_radius() {
        let config = GameConfig {
            player_radius: 6.0,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Radius { .. })));
    }

    #[test]
    fn test_validate_speed() {
        let config = GameConfig {
            player_speed: f32::NAN,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Speed(_))));
    }

    #[test]
    fn test_validate_start_position() {
        // Outside the radius-aware range
        let config = GameConfig {
            start_x: 9.8,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::StartOutOfBounds { x: 9.8, y: 5.0 })
        );

        // Fine once only the centre has to stay on the grid
        let config = GameConfig {
            start_x: 9.8,
            bounds_policy: BoundsPolicy::Edge,
            ..GameConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_linger_ticks() {
        let config = from_pairs(&[("LINGER_TICKS", &u64::MAX.to_string())]);
        assert_eq!(config.linger_ticks, u64::MAX);
        assert_eq!(
            config.validate(),
            Err(ConfigError::LingerTicks {
                ticks: u64::MAX,
                max: timing::MAX_LINGER_TICKS,
            })
        );

        let config = GameConfig {
            linger_ticks: timing::MAX_LINGER_TICKS,
            ..GameConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_grid_recenters_player() {
        let config = GameConfig::default().with_grid(30, 20);
        assert_eq!((config.start_x, config.start_y), (15.0, 10.0));
        assert!(config.validate().is_ok());
        assert_eq!(config.grid().width_px(), 1500);
    }

    #[test]
    fn test_key_layout_parse() {
        assert_eq!("WASD".parse::<KeyLayout>().unwrap(), KeyLayout::Wasd);
        assert!("dvorak".parse::<KeyLayout>().is_err());
        assert_eq!(KeyLayout::Wasd.bindings(), KeyBindings::wasd());
    }
}
