//! Native host: replays a script into a session on a tokio interval.
//!
//! The interval stands in for the browser's animation callback. Each tick
//! feeds the scripted events due at that tick into the input queue, then
//! runs one session update.

pub mod script;

use std::future::Future;
use std::time::Duration;

use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::game::session::{GameSession, LoopState};
use crate::render::RenderSink;
use crate::util::vec2::Vec2;

use self::script::Script;

/// Outcome of a replay run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Host ticks executed
    pub ticks: u64,
    pub final_position: Vec2,
    /// Session state before the final `stop()`
    pub final_state: LoopState,
    /// Ended by the shutdown signal rather than the script
    pub interrupted: bool,
}

/// Play `script` until it is exhausted (plus the linger ticks) or `shutdown`
/// resolves, then stop the session
pub async fn run<S, F>(config: &GameConfig, script: &Script, mut sink: S, shutdown: F) -> RunSummary
where
    S: RenderSink,
    F: Future<Output = ()>,
{
    let mut session = GameSession::new(config);
    let sender = session.input_sender();

    let tick_duration = Duration::from_secs_f64(1.0 / f64::from(config.frame_rate.max(1)));
    let mut ticker = interval(tick_duration);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let end_tick = script.last_tick().unwrap_or(0).saturating_add(config.linger_ticks);
    let start = Instant::now();
    let elapsed_ms = || start.elapsed().as_secs_f64() * 1000.0;

    info!(
        "Replaying {} scripted events at {} Hz, ending at tick {}",
        script.len(),
        config.frame_rate,
        end_tick
    );
    session.start(elapsed_ms(), &mut sink);

    tokio::pin!(shutdown);
    let mut cursor = 0;
    let mut tick: u64 = 0;

    let interrupted = loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut shutdown => break true,
        }
        tick += 1;

        for entry in script.take_due(&mut cursor, tick) {
            if let Err(e) = sender.try_send(entry.event.clone()) {
                warn!("Dropped scripted event at tick {}: {}", tick, e);
            }
        }

        let report = session.tick(elapsed_ms(), &mut sink);
        if let Some(fps) = report.rate {
            debug!("Tick {}: {} fps", tick, fps);
        }

        if report.state == LoopState::Stopped || tick >= end_tick {
            break false;
        }
    };

    let summary = RunSummary {
        ticks: tick,
        final_position: session.player().position,
        final_state: session.state(),
        interrupted,
    };
    session.stop();

    info!(
        "Replay finished after {} ticks{}: player at ({:.2}, {:.2}), last state {:?}",
        summary.ticks,
        if interrupted { " (interrupted)" } else { "" },
        summary.final_position.x,
        summary.final_position.y,
        summary.final_state
    );
    summary
}
