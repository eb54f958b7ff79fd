//! Replay scripts: scripted input for the native host
//!
//! JSON Lines, one `{"tick": <u64>, "event": <InputEvent>}` object per line.
//! Blank lines and lines starting with `#` are skipped.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ScriptError;
use crate::game::input::InputEvent;

/// One event and the tick it is fed on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedInput {
    pub tick: u64,
    pub event: InputEvent,
}

impl ScriptedInput {
    pub fn new(tick: u64, event: InputEvent) -> Self {
        Self { tick, event }
    }
}

/// Scripted inputs ordered by tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    entries: Vec<ScriptedInput>,
}

impl Script {
    /// Build from entries in any order; entries sharing a tick keep their order
    pub fn new(mut entries: Vec<ScriptedInput>) -> Self {
        entries.sort_by_key(|e| e.tick);
        Self { entries }
    }

    pub fn parse(text: &str) -> Result<Self, ScriptError> {
        let mut entries = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let entry = serde_json::from_str(line).map_err(|source| ScriptError::Parse {
                line: index + 1,
                source,
            })?;
            entries.push(entry);
        }
        Ok(Self::new(entries))
    }

    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Walk right into the wall, slide down along it, pause, resume
    pub fn demo() -> Self {
        Self::new(vec![
            ScriptedInput::new(1, InputEvent::key_down("ArrowRight")),
            ScriptedInput::new(60, InputEvent::key_down("ArrowDown")),
            ScriptedInput::new(80, InputEvent::key_down("Escape")),
            ScriptedInput::new(81, InputEvent::key_up("Escape")),
            ScriptedInput::new(110, InputEvent::key_down("Escape")),
            ScriptedInput::new(111, InputEvent::key_up("Escape")),
            ScriptedInput::new(130, InputEvent::key_up("ArrowRight")),
            ScriptedInput::new(130, InputEvent::key_up("ArrowDown")),
        ])
    }

    pub fn entries(&self) -> &[ScriptedInput] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tick of the last scripted event
    pub fn last_tick(&self) -> Option<u64> {
        self.entries.last().map(|e| e.tick)
    }

    /// Entries due at or before `tick` that `cursor` has not passed yet
    ///
    /// Advances `cursor` past the returned entries.
    pub fn take_due(&self, cursor: &mut usize, tick: u64) -> &[ScriptedInput] {
        let start = (*cursor).min(self.entries.len());
        let end = start + self.entries[start..].partition_point(|e| e.tick <= tick);
        *cursor = end;
        &self.entries[start..end]
    }
}
