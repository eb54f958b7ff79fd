//! The player token

use crate::game::bounds::Bounds;
use crate::render::{Color, PlayerSprite};
use crate::util::vec2::Vec2;

/// Player state (grid units)
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Centre of the token
    pub position: Vec2,
    pub radius: f32,
    /// Distance covered by one full step
    pub speed: f32,
    pub color: Color,
}

impl Player {
    pub fn new(position: Vec2, radius: f32, speed: f32, color: Color) -> Self {
        Self {
            position,
            radius,
            speed,
            color,
        }
    }

    /// Move up to `distance` along `direction`, axis by axis
    ///
    /// `direction` is normalized first, so diagonals are not faster. Each axis
    /// is applied only when its new value stays inside `bounds`; a blocked
    /// axis keeps its old value while the other one still moves.
    /// Returns whether the position changed.
    pub fn step(&mut self, direction: Vec2, distance: f32, bounds: &Bounds) -> bool {
        let heading = direction.normalize();
        if heading == Vec2::ZERO || distance == 0.0 {
            return false;
        }

        let candidate = self.position + heading * distance;
        let before = self.position;

        if bounds.contains_x(candidate.x, self.radius) {
            self.position.x = candidate.x;
        }
        if bounds.contains_y(candidate.y, self.radius) {
            self.position.y = candidate.y;
        }

        self.position != before
    }

    pub fn sprite(&self) -> PlayerSprite {
        PlayerSprite {
            position: self.position,
            radius: self.radius,
            color: self.color,
        }
    }
}
