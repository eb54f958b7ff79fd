//! Pollable input state
//!
//! Platform events (key and mouse presses) are folded into an [`InputState`],
//! which the update loop polls once per tick through [`HeldDirections`].
//! Key identifiers are compared lower-cased, so `"ArrowUp"`, `"arrowup"` and
//! `"W"`/`"w"` behave the same.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::util::vec2::Vec2;

/// Logical movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Unit contribution of this direction (screen coordinates)
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::UP,
            Direction::Down => Vec2::DOWN,
            Direction::Left => Vec2::LEFT,
            Direction::Right => Vec2::RIGHT,
        }
    }
}

/// Raw event delivered by the platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    KeyDown { key: String },
    KeyUp { key: String },
    MouseDown { button: i16 },
    MouseUp { button: i16 },
    MouseMove { x: f32, y: f32 },
    /// Focus lost: everything counts as released
    Blur,
}

impl InputEvent {
    pub fn key_down(key: impl Into<String>) -> Self {
        InputEvent::KeyDown { key: key.into() }
    }

    pub fn key_up(key: impl Into<String>) -> Self {
        InputEvent::KeyUp { key: key.into() }
    }
}

/// Polling view the update loop reads each tick
pub trait HeldDirections {
    fn is_held(&self, direction: Direction) -> bool;

    /// Whether a raw key (any case) is currently down
    fn is_key_down(&self, key: &str) -> bool;
}

/// Folds platform events into stored state
pub trait ApplyInput {
    fn apply(&mut self, event: &InputEvent);
}

/// Sum of the unit vectors of every held direction, not normalized
///
/// Opposite directions cancel out: holding up and down yields `ZERO`.
pub fn movement_vector(input: &impl HeldDirections) -> Vec2 {
    Direction::ALL
        .iter()
        .filter(|d| input.is_held(**d))
        .fold(Vec2::ZERO, |acc, d| acc + d.unit())
}

/// Which keys map to which direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    up: Vec<String>,
    down: Vec<String>,
    left: Vec<String>,
    right: Vec<String>,
}

impl KeyBindings {
    /// Arrow keys and WASD
    pub fn arrows_and_wasd() -> Self {
        Self {
            up: vec!["w".into(), "arrowup".into()],
            down: vec!["s".into(), "arrowdown".into()],
            left: vec!["a".into(), "arrowleft".into()],
            right: vec!["d".into(), "arrowright".into()],
        }
    }

    /// WASD only, arrow keys ignored
    pub fn wasd() -> Self {
        Self {
            up: vec!["w".into()],
            down: vec!["s".into()],
            left: vec!["a".into()],
            right: vec!["d".into()],
        }
    }

    pub fn keys(&self, direction: Direction) -> &[String] {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
            Direction::Left => &self.left,
            Direction::Right => &self.right,
        }
    }

    /// Direction bound to `key`, if any
    pub fn direction_of(&self, key: &str) -> Option<Direction> {
        let key = key.to_ascii_lowercase();
        Direction::ALL
            .into_iter()
            .find(|d| self.keys(*d).iter().any(|k| *k == key))
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::arrows_and_wasd()
    }
}

/// Mouse buttons currently down and the last known cursor position
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MouseState {
    buttons: SmallVec<[i16; 4]>,
    position: Option<Vec2>,
}

impl MouseState {
    pub fn is_button_down(&self, button: i16) -> bool {
        self.buttons.contains(&button)
    }

    /// Cursor position in canvas pixels
    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    fn press(&mut self, button: i16) {
        if !self.buttons.contains(&button) {
            self.buttons.push(button);
        }
    }

    fn release(&mut self, button: i16) {
        self.buttons.retain(|b| *b != button);
    }
}

/// Key-set storage: every key currently down, plus mouse state
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held_keys: SmallVec<[String; 8]>,
    mouse: MouseState,
    bindings: KeyBindings,
}

impl InputState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            held_keys: SmallVec::new(),
            mouse: MouseState::default(),
            bindings,
        }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn mouse(&self) -> &MouseState {
        &self.mouse
    }

    /// Number of distinct keys held
    pub fn held_count(&self) -> usize {
        self.held_keys.len()
    }

    /// Release every key and button
    pub fn clear(&mut self) {
        self.held_keys.clear();
        self.mouse.buttons.clear();
    }

    fn press_key(&mut self, key: &str) {
        let key = key.to_ascii_lowercase();
        // Auto-repeat delivers key-down again while held
        if !self.held_keys.contains(&key) {
            self.held_keys.push(key);
        }
    }

    fn release_key(&mut self, key: &str) {
        let key = key.to_ascii_lowercase();
        let before = self.held_keys.len();
        self.held_keys.retain(|k| *k != key);
        if self.held_keys.len() == before {
            debug!("Release of key '{}' that was not held", key);
        }
    }
}

impl ApplyInput for InputState {
    fn apply(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown { key } => self.press_key(key),
            InputEvent::KeyUp { key } => self.release_key(key),
            InputEvent::MouseDown { button } => self.mouse.press(*button),
            InputEvent::MouseUp { button } => self.mouse.release(*button),
            InputEvent::MouseMove { x, y } => self.mouse.position = Some(Vec2::new(*x, *y)),
            InputEvent::Blur => self.clear(),
        }
    }
}

impl HeldDirections for InputState {
    fn is_held(&self, direction: Direction) -> bool {
        self.bindings
            .keys(direction)
            .iter()
            .any(|k| self.held_keys.contains(k))
    }

    fn is_key_down(&self, key: &str) -> bool {
        let key = key.to_ascii_lowercase();
        self.held_keys.contains(&key)
    }
}

/// Flag storage: one boolean per direction plus the pause key
///
/// Same polling behaviour as [`InputState`] with fixed bindings and no mouse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionFlags {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub escape: bool,
    wasd_only: bool,
}

impl DirectionFlags {
    pub fn wasd_only() -> Self {
        Self {
            wasd_only: true,
            ..Self::default()
        }
    }

    fn flag_mut(&mut self, key: &str) -> Option<&mut bool> {
        let key = key.to_ascii_lowercase();
        let arrows = !self.wasd_only;
        match key.as_str() {
            "w" => Some(&mut self.up),
            "arrowup" if arrows => Some(&mut self.up),
            "s" => Some(&mut self.down),
            "arrowdown" if arrows => Some(&mut self.down),
            "a" => Some(&mut self.left),
            "arrowleft" if arrows => Some(&mut self.left),
            "d" => Some(&mut self.right),
            "arrowright" if arrows => Some(&mut self.right),
            "escape" => Some(&mut self.escape),
            _ => None,
        }
    }
}

impl ApplyInput for DirectionFlags {
    fn apply(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown { key } => {
                if let Some(flag) = self.flag_mut(key) {
                    *flag = true;
                }
            }
            InputEvent::KeyUp { key } => {
                if let Some(flag) = self.flag_mut(key) {
                    *flag = false;
                }
            }
            InputEvent::Blur => {
                *self = Self {
                    wasd_only: self.wasd_only,
                    ..Self::default()
                }
            }
            InputEvent::MouseDown { .. } | InputEvent::MouseUp { .. } | InputEvent::MouseMove { .. } => {}
        }
    }
}

impl HeldDirections for DirectionFlags {
    fn is_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    fn is_key_down(&self, key: &str) -> bool {
        key.eq_ignore_ascii_case("escape") && self.escape
    }
}
