//! Game session - owns the loop state, input, player and clock, and runs one
//! update per host frame.
//!
//! Per tick: advance the clock, drain queued input, check the pause edge,
//! move the player, redraw. Hosts call [`GameSession::tick`] from whatever
//! drives their frames (`requestAnimationFrame`, a tokio interval) and keep
//! scheduling until the session reports [`LoopState::Stopped`].

use std::fmt;
use std::str::FromStr;

use tracing::{debug, info};

use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::game::bounds::Bounds;
use crate::game::clock::FrameClock;
use crate::game::constants::input::PAUSE_KEY;
use crate::game::input::{movement_vector, ApplyInput, HeldDirections, InputState};
use crate::game::input_queue::{InputQueue, InputSender};
use crate::game::player::Player;
use crate::render::{GridGeometry, RenderSink};
use crate::util::vec2::Vec2;

/// Update loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
    Paused,
}

/// Unit of `Player::speed`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpeedUnit {
    /// Grid units per tick; distance per second follows the frame rate
    #[default]
    PerTick,
    /// Grid units per second, scaled by the frame delta
    PerSecond,
}

impl FromStr for SpeedUnit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tick" | "per_tick" | "frame" | "per_frame" => Ok(SpeedUnit::PerTick),
            "second" | "per_second" => Ok(SpeedUnit::PerSecond),
            _ => Err(ConfigError::UnknownVariant {
                kind: "speed unit",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for SpeedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeedUnit::PerTick => f.write_str("per_tick"),
            SpeedUnit::PerSecond => f.write_str("per_second"),
        }
    }
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// State after the tick
    pub state: LoopState,
    /// Seconds since the previous tick
    pub dt: f32,
    /// Whether the player position changed
    pub moved: bool,
    /// Frames-per-second sample emitted this tick
    pub rate: Option<u32>,
}

impl TickReport {
    fn idle(state: LoopState) -> Self {
        Self {
            state,
            dt: 0.0,
            moved: false,
            rate: None,
        }
    }
}

pub struct GameSession<I = InputState> {
    state: LoopState,
    input: I,
    queue: InputQueue,
    player: Player,
    grid: GridGeometry,
    bounds: Bounds,
    speed_unit: SpeedUnit,
    pause_enabled: bool,
    clock: FrameClock,
    /// Pause key state on the previous tick, for edge detection
    pause_key_was_down: bool,
    ticks: u64,
}

impl GameSession<InputState> {
    /// Session with key-set input storage and the configured bindings
    pub fn new(config: &GameConfig) -> Self {
        Self::with_input(config, InputState::new(config.key_layout.bindings()))
    }
}

impl<I: HeldDirections + ApplyInput> GameSession<I> {
    /// Session over any input storage
    ///
    /// `config` is expected to have passed `GameConfig::validate`.
    pub fn with_input(config: &GameConfig, input: I) -> Self {
        Self {
            state: LoopState::Stopped,
            input,
            queue: InputQueue::default(),
            player: Player::new(
                Vec2::new(config.start_x, config.start_y),
                config.player_radius,
                config.player_speed,
                config.player_color,
            ),
            grid: config.grid(),
            bounds: config.bounds(),
            speed_unit: config.speed_unit,
            pause_enabled: config.pause_enabled,
            clock: FrameClock::new(0.0),
            pause_key_was_down: false,
            ticks: 0,
        }
    }

    /// Handle for event producers
    pub fn input_sender(&self) -> InputSender {
        self.queue.sender()
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn grid(&self) -> &GridGeometry {
        &self.grid
    }

    /// Ticks processed while not stopped
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// `Stopped -> Running`: draws the background and the player once
    ///
    /// No-op when already started.
    pub fn start(&mut self, now_ms: f64, sink: &mut impl RenderSink) {
        if self.state != LoopState::Stopped {
            debug!("Start ignored, session is {:?}", self.state);
            return;
        }
        self.clock.reset(now_ms);
        self.pause_key_was_down = self.input.is_key_down(PAUSE_KEY);
        self.state = LoopState::Running;

        sink.draw_background(&self.grid);
        sink.redraw_player(&self.player.sprite());

        info!(
            "Session started: {}x{} grid, player at ({:.2}, {:.2}), speed {} {}",
            self.grid.cols,
            self.grid.rows,
            self.player.position.x,
            self.player.position.y,
            self.player.speed,
            self.speed_unit
        );
    }

    /// Any state `-> Stopped`; later ticks do nothing
    pub fn stop(&mut self) {
        if self.state == LoopState::Stopped {
            return;
        }
        self.state = LoopState::Stopped;
        info!("Session stopped after {} ticks", self.ticks);
    }

    /// Run one update
    pub fn tick(&mut self, now_ms: f64, sink: &mut impl RenderSink) -> TickReport {
        if self.state == LoopState::Stopped {
            return TickReport::idle(LoopState::Stopped);
        }
        self.ticks += 1;

        let dt = self.clock.tick(now_ms);
        let rate = self.clock.sample(now_ms);
        if let Some(fps) = rate {
            sink.show_rate(fps);
        }

        for event in self.queue.drain() {
            self.input.apply(&event);
        }

        self.check_pause_edge();

        let moved = match self.state {
            LoopState::Running => {
                let direction = movement_vector(&self.input);
                let distance = match self.speed_unit {
                    SpeedUnit::PerTick => self.player.speed,
                    SpeedUnit::PerSecond => self.player.speed * dt,
                };
                let moved = self.player.step(direction, distance, &self.bounds);
                sink.redraw_player(&self.player.sprite());
                moved
            }
            LoopState::Paused | LoopState::Stopped => false,
        };

        TickReport {
            state: self.state,
            dt,
            moved,
            rate,
        }
    }

    /// Toggle pause on the press edge of the pause key only
    fn check_pause_edge(&mut self) {
        let down = self.input.is_key_down(PAUSE_KEY);
        let pressed = down && !self.pause_key_was_down;
        self.pause_key_was_down = down;

        if !pressed || !self.pause_enabled {
            return;
        }
        self.state = match self.state {
            LoopState::Running => LoopState::Paused,
            LoopState::Paused => LoopState::Running,
            LoopState::Stopped => LoopState::Stopped,
        };
        debug!("Pause toggled, session is {:?}", self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::bounds::BoundsPolicy;
    use crate::game::input::{DirectionFlags, InputEvent};
    use crate::render::RecordingSink;

    const EPSILON: f32 = 1e-5;
    const FRAME_MS: f64 = 16.0;

    fn started(config: &GameConfig) -> (GameSession, RecordingSink) {
        let mut session = GameSession::new(config);
        let mut sink = RecordingSink::default();
        session.start(0.0, &mut sink);
        (session, sink)
    }

    fn send(session: &GameSession<impl HeldDirections + ApplyInput>, event: InputEvent) {
        session.input_sender().try_send(event).unwrap();
    }

    #[test]
    fn test_new_session_is_stopped() {
        let session = GameSession::new(&GameConfig::default());
        assert_eq!(session.state(), LoopState::Stopped);
        assert_eq!(session.player().position, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_start_draws_background_and_player() {
        let (session, sink) = started(&GameConfig::default());
        assert_eq!(session.state(), LoopState::Running);
        assert_eq!(sink.backgrounds.len(), 1);
        assert_eq!(sink.backgrounds[0].cols, 10);
        assert_eq!(sink.sprites.len(), 1);
    }

    #[test]
    fn test_start_twice_is_noop() {
        let (mut session, mut sink) = started(&GameConfig::default());
        session.start(100.0, &mut sink);
        assert_eq!(sink.backgrounds.len(), 1);
    }

    #[test]
    fn test_tick_before_start_does_nothing() {
        let mut session = GameSession::new(&GameConfig::default());
        let mut sink = RecordingSink::default();
        send(&session, InputEvent::key_down("d"));
        let report = session.tick(16.0, &mut sink);
        assert_eq!(report.state, LoopState::Stopped);
        assert!(sink.sprites.is_empty());
        assert_eq!(session.ticks(), 0);
    }

    #[test]
    fn test_holding_right_moves_by_speed() {
        let (mut session, mut sink) = started(&GameConfig::default());
        send(&session, InputEvent::key_down("ArrowRight"));

        let report = session.tick(FRAME_MS, &mut sink);
        assert!(report.moved);
        assert!(session.player().position.approx_eq(Vec2::new(5.1, 5.0), EPSILON));
        // Redraw issued after the move
        assert_eq!(sink.last_sprite().unwrap().position, session.player().position);
    }

    #[test]
    fn test_held_key_moves_every_tick() {
        let (mut session, mut sink) = started(&GameConfig::default());
        send(&session, InputEvent::key_down("d"));
        for i in 1..=10 {
            session.tick(i as f64 * FRAME_MS, &mut sink);
        }
        assert!((session.player().position.x - 6.0).abs() < 1e-4);

        send(&session, InputEvent::key_up("d"));
        let report = session.tick(11.0 * FRAME_MS, &mut sink);
        assert!(!report.moved);
    }

    #[test]
    fn test_up_and_down_cancel() {
        let (mut session, mut sink) = started(&GameConfig::default());
        send(&session, InputEvent::key_down("w"));
        send(&session, InputEvent::key_down("s"));
        let report = session.tick(FRAME_MS, &mut sink);
        assert!(!report.moved);
        assert_eq!(session.player().position, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_clamped_x_still_moves_y() {
        let config = GameConfig {
            start_x: 9.5,
            ..GameConfig::default()
        };
        let (mut session, mut sink) = started(&config);
        send(&session, InputEvent::key_down("ArrowRight"));
        send(&session, InputEvent::key_down("ArrowDown"));

        let report = session.tick(FRAME_MS, &mut sink);
        assert!(report.moved);
        assert_eq!(session.player().position.x, 9.5);
        assert!(session.player().position.y > 5.0);
    }

    #[test]
    fn test_player_stays_in_bounds() {
        let (mut session, mut sink) = started(&GameConfig::default());
        send(&session, InputEvent::key_down("a"));
        send(&session, InputEvent::key_down("w"));
        for i in 1..=200 {
            session.tick(i as f64 * FRAME_MS, &mut sink);
            let p = session.player().position;
            assert!(p.x >= 0.5 && p.x <= 9.5, "{:?}", p);
            assert!(p.y >= 0.5 && p.y <= 9.5, "{:?}", p);
        }
    }

    #[test]
    fn test_edge_policy() {
        let config = GameConfig {
            bounds_policy: BoundsPolicy::Edge,
            start_x: 9.95,
            ..GameConfig::default()
        };
        let (mut session, mut sink) = started(&config);
        send(&session, InputEvent::key_down("d"));
        session.tick(FRAME_MS, &mut sink);
        // Past the radius-aware limit, blocked only by the far edge
        assert!((session.player().position.x - 9.95).abs() < EPSILON);
        session.tick(2.0 * FRAME_MS, &mut sink);
        assert!(session.player().position.x <= 10.0);
    }

    #[test]
    fn test_per_second_speed_scales_with_dt() {
        let config = GameConfig {
            speed_unit: SpeedUnit::PerSecond,
            player_speed: 2.0,
            ..GameConfig::default()
        };
        let (mut session, mut sink) = started(&config);
        send(&session, InputEvent::key_down("d"));

        let report = session.tick(250.0, &mut sink);
        assert!((report.dt - 0.25).abs() < EPSILON);
        assert!((session.player().position.x - 5.5).abs() < EPSILON);
    }

    #[test]
    fn test_rate_sample_reaches_sink() {
        let (mut session, mut sink) = started(&GameConfig::default());
        for i in 1..=60 {
            let report = session.tick(i as f64 * 15.0, &mut sink);
            assert_eq!(report.rate, None);
        }
        let report = session.tick(1005.0, &mut sink);
        assert_eq!(report.rate, Some(60));
        assert_eq!(sink.rates, vec![60]);
    }

    #[test]
    fn test_pause_is_edge_triggered() {
        let (mut session, mut sink) = started(&GameConfig::default());
        send(&session, InputEvent::key_down("d"));
        send(&session, InputEvent::key_down("Escape"));

        let mut now = 0.0;
        let mut tick = |session: &mut GameSession, sink: &mut RecordingSink| {
            now += FRAME_MS;
            session.tick(now, sink)
        };

        assert_eq!(tick(&mut session, &mut sink).state, LoopState::Paused);
        let position = session.player().position;
        sink.clear();

        // Escape held for 10 more ticks: stays paused, nothing moves or redraws
        for _ in 0..10 {
            let report = tick(&mut session, &mut sink);
            assert_eq!(report.state, LoopState::Paused);
            assert!(!report.moved);
        }
        assert_eq!(session.player().position, position);
        assert!(sink.sprites.is_empty());

        // Release, then press again: back to running
        send(&session, InputEvent::key_up("Escape"));
        assert_eq!(tick(&mut session, &mut sink).state, LoopState::Paused);
        send(&session, InputEvent::key_down("Escape"));
        let report = tick(&mut session, &mut sink);
        assert_eq!(report.state, LoopState::Running);
        assert!(report.moved);
    }

    #[test]
    fn test_pause_disabled() {
        let config = GameConfig {
            pause_enabled: false,
            ..GameConfig::default()
        };
        let (mut session, mut sink) = started(&config);
        send(&session, InputEvent::key_down("escape"));
        assert_eq!(session.tick(FRAME_MS, &mut sink).state, LoopState::Running);
    }

    #[test]
    fn test_rate_sampled_while_paused() {
        let (mut session, mut sink) = started(&GameConfig::default());
        send(&session, InputEvent::key_down("Escape"));
        session.tick(FRAME_MS, &mut sink);
        assert_eq!(session.state(), LoopState::Paused);
        let report = session.tick(1500.0, &mut sink);
        assert_eq!(report.rate, Some(1));
    }

    #[test]
    fn test_stop_halts_ticks() {
        let (mut session, mut sink) = started(&GameConfig::default());
        send(&session, InputEvent::key_down("d"));
        session.tick(FRAME_MS, &mut sink);
        session.stop();

        let position = session.player().position;
        let report = session.tick(2.0 * FRAME_MS, &mut sink);
        assert_eq!(report.state, LoopState::Stopped);
        assert!(!report.moved);
        assert_eq!(session.player().position, position);
        assert_eq!(session.ticks(), 1);
    }

    #[test]
    fn test_stop_from_paused() {
        let (mut session, mut sink) = started(&GameConfig::default());
        send(&session, InputEvent::key_down("Escape"));
        session.tick(FRAME_MS, &mut sink);
        session.stop();
        assert_eq!(session.state(), LoopState::Stopped);
    }

    #[test]
    fn test_flag_storage_session() {
        let config = GameConfig::default();
        let mut session = GameSession::with_input(&config, DirectionFlags::default());
        let mut sink = RecordingSink::default();
        session.start(0.0, &mut sink);
        send(&session, InputEvent::key_down("ArrowDown"));
        session.tick(FRAME_MS, &mut sink);
        assert!(session.player().position.approx_eq(Vec2::new(5.0, 5.1), EPSILON));
        assert!(session.input().down);
    }

    #[test]
    fn test_wasd_layout_ignores_arrows() {
        let config = GameConfig {
            key_layout: crate::config::KeyLayout::Wasd,
            ..GameConfig::default()
        };
        let (mut session, mut sink) = started(&config);
        send(&session, InputEvent::key_down("ArrowRight"));
        assert!(!session.tick(FRAME_MS, &mut sink).moved);
    }
}
