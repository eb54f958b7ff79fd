//! Playfield bounds and the clamping policy applied to the player token

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Which range an axis value must stay in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BoundsPolicy {
    /// `radius <= v <= dimension - radius`: the whole token stays on the grid
    #[default]
    RadiusAware,
    /// `0 <= v <= dimension`: only the centre is kept on the grid
    Edge,
}

impl FromStr for BoundsPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "radius" | "radius_aware" | "radius-aware" => Ok(BoundsPolicy::RadiusAware),
            "edge" => Ok(BoundsPolicy::Edge),
            _ => Err(ConfigError::UnknownVariant {
                kind: "bounds policy",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for BoundsPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundsPolicy::RadiusAware => f.write_str("radius_aware"),
            BoundsPolicy::Edge => f.write_str("edge"),
        }
    }
}

/// Grid extent in grid units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
    pub policy: BoundsPolicy,
}

impl Bounds {
    pub fn new(cols: u32, rows: u32, policy: BoundsPolicy) -> Self {
        Self {
            width: cols as f32,
            height: rows as f32,
            policy,
        }
    }

    /// Inclusive range for an axis of length `extent`
    fn axis_range(&self, extent: f32, radius: f32) -> (f32, f32) {
        match self.policy {
            BoundsPolicy::RadiusAware => (radius, extent - radius),
            BoundsPolicy::Edge => (0.0, extent),
        }
    }

    pub fn x_range(&self, radius: f32) -> (f32, f32) {
        self.axis_range(self.width, radius)
    }

    pub fn y_range(&self, radius: f32) -> (f32, f32) {
        self.axis_range(self.height, radius)
    }

    pub fn contains_x(&self, x: f32, radius: f32) -> bool {
        let (min, max) = self.x_range(radius);
        min <= x && x <= max
    }

    pub fn contains_y(&self, y: f32, radius: f32) -> bool {
        let (min, max) = self.y_range(radius);
        min <= y && y <= max
    }

    /// Whether a token of `radius` fits at all
    pub fn fits(&self, radius: f32) -> bool {
        let (x_min, x_max) = self.x_range(radius);
        let (y_min, y_max) = self.y_range(radius);
        radius >= 0.0 && x_min <= x_max && y_min <= y_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_aware_range() {
        let bounds = Bounds::new(10, 8, BoundsPolicy::RadiusAware);
        assert_eq!(bounds.x_range(0.5), (0.5, 9.5));
        assert_eq!(bounds.y_range(0.5), (0.5, 7.5));
        assert!(bounds.contains_x(9.5, 0.5));
        assert!(!bounds.contains_x(9.6, 0.5));
        assert!(!bounds.contains_y(0.4, 0.5));
    }

    #[test]
    fn test_edge_range_ignores_radius() {
        let bounds = Bounds::new(10, 10, BoundsPolicy::Edge);
        assert!(bounds.contains_x(0.0, 0.5));
        assert!(bounds.contains_x(10.0, 0.5));
        assert!(!bounds.contains_x(10.01, 0.5));
    }

    #[test]
    fn test_fits() {
        let bounds = Bounds::new(2, 1, BoundsPolicy::RadiusAware);
        assert!(bounds.fits(0.5));
        assert!(!bounds.fits(0.6));
        assert!(Bounds::new(2, 1, BoundsPolicy::Edge).fits(5.0));
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("edge".parse::<BoundsPolicy>().unwrap(), BoundsPolicy::Edge);
        assert_eq!("Radius-Aware".parse::<BoundsPolicy>().unwrap(), BoundsPolicy::RadiusAware);
        assert!("wrap".parse::<BoundsPolicy>().is_err());
        assert_eq!(BoundsPolicy::RadiusAware.to_string(), "radius_aware");
    }
}
