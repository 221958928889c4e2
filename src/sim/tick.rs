//! Fixed timestep driving and run control
//!
//! The host reports wall-clock frame time; each instance converts it into
//! whole ticks. Ticks are never coalesced or dropped: a per-frame cap only
//! defers the remainder to later frames. Pausing discards the owed time so
//! no tick fires after the pause is acknowledged.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::{SimError, Simulation};
use crate::consts::{MAX_TICKS_PER_FRAME, TICK_MS};
use crate::persistence::{self, ExportError, ExportOutcome};
use crate::registry::SimKind;
use crate::renderer::{Scene, Viewport};

/// Run state of a simulation instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunState {
    /// Timer active, state advances each tick
    #[default]
    Running,
    /// Timer inactive, state frozen
    Paused,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Running => "Running",
            RunState::Paused => "Paused",
        }
    }
}

/// Accumulates wall time and hands out whole fixed ticks
#[derive(Debug, Clone)]
pub struct FixedClock {
    interval: Duration,
    max_per_frame: u32,
    accumulator: Duration,
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::new(Duration::from_millis(TICK_MS), MAX_TICKS_PER_FRAME)
    }
}

impl FixedClock {
    pub fn new(interval: Duration, max_per_frame: u32) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            max_per_frame: max_per_frame.max(1),
            accumulator: Duration::ZERO,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Add frame time and return the ticks to run now
    pub fn due(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed;
        let owed = self.backlog();
        let run = owed.min(self.max_per_frame);
        self.accumulator -= self.interval * run;
        run
    }

    /// Whole ticks currently owed
    pub fn backlog(&self) -> u32 {
        let owed = self.accumulator.as_nanos() / self.interval.as_nanos();
        u32::try_from(owed).unwrap_or(u32::MAX)
    }

    /// Discard owed time
    pub fn clear(&mut self) {
        self.accumulator = Duration::ZERO;
    }
}

/// A simulation together with its timer, run state and drag flag
pub struct Instance {
    sim: Box<dyn Simulation>,
    run: RunState,
    clock: FixedClock,
    dragging: bool,
    /// Bumped on every observable change; hosts redraw when it moves
    generation: u64,
}

impl Instance {
    pub fn new(sim: Box<dyn Simulation>, clock: FixedClock) -> Self {
        Self {
            sim,
            run: RunState::Running,
            clock,
            dragging: false,
            generation: 0,
        }
    }

    pub fn kind(&self) -> SimKind {
        self.sim.kind()
    }

    pub fn simulation(&self) -> &dyn Simulation {
        self.sim.as_ref()
    }

    pub fn run_state(&self) -> RunState {
        self.run
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    fn touch(&mut self) {
        self.generation += 1;
    }

    /// Whether timer ticks currently reach the simulation
    pub fn is_ticking(&self) -> bool {
        self.sim.is_dynamic() && self.run == RunState::Running && !self.dragging
    }

    pub fn pause(&mut self) {
        if self.run == RunState::Running {
            self.run = RunState::Paused;
            self.clock.clear();
            log::info!("{}: paused", self.kind());
        }
    }

    pub fn resume(&mut self) {
        if self.run == RunState::Paused {
            self.run = RunState::Running;
            self.clock.clear();
            log::info!("{}: resumed", self.kind());
        }
    }

    pub fn toggle(&mut self) -> RunState {
        match self.run {
            RunState::Running => self.pause(),
            RunState::Paused => self.resume(),
        }
        self.run
    }

    /// Back to defaults, empty log, Running
    pub fn reset(&mut self) {
        self.sim.reset();
        self.run = RunState::Running;
        self.dragging = false;
        self.clock.clear();
        self.touch();
        log::info!("{}: reset", self.kind());
    }

    pub fn set_param(&mut self, name: &str, value: f64) -> Result<f64, SimError> {
        let applied = self.sim.set_param(name, value)?;
        self.touch();
        Ok(applied)
    }

    /// Feed frame time; returns the number of ticks executed
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if !self.is_ticking() {
            self.clock.clear();
            return 0;
        }
        let ticks = self.clock.due(elapsed);
        for _ in 0..ticks {
            self.sim.tick();
        }
        if ticks > 0 {
            self.touch();
        }
        ticks
    }

    /// Run exactly one tick if the instance is ticking
    pub fn step(&mut self) -> bool {
        if !self.is_ticking() {
            return false;
        }
        self.sim.tick();
        self.touch();
        true
    }

    /// Ticks owed but deferred by the per-frame cap
    pub fn backlog(&self) -> u32 {
        self.clock.backlog()
    }

    pub fn pointer_down(&mut self, point: Vec2, viewport: Viewport) -> bool {
        self.dragging = self.sim.grab(point, viewport);
        if self.dragging {
            self.clock.clear();
        }
        self.dragging
    }

    pub fn pointer_move(&mut self, point: Vec2, viewport: Viewport) {
        if self.dragging {
            self.sim.drag(point, viewport);
            self.touch();
        }
    }

    pub fn pointer_up(&mut self) {
        if self.dragging {
            self.sim.release();
            self.dragging = false;
            self.clock.clear();
        }
    }

    pub fn render(&self, viewport: Viewport) -> Scene {
        self.sim.render(viewport)
    }

    /// Write the log to `path` as CSV; the log itself is never modified.
    /// Takes `&mut self` so no tick, reset or second export can overlap it.
    pub fn export(&mut self, path: &Path) -> Result<ExportOutcome, ExportError> {
        let result = persistence::export(self.sim.log(), path);
        match &result {
            Ok(ExportOutcome::Written { rows, .. }) => {
                log::info!("{}: exported {rows} rows to {}", self.kind(), path.display())
            }
            Ok(ExportOutcome::NothingToExport) => log::info!("{}: nothing to export", self.kind()),
            Err(e) => log::error!("{}: export failed: {e}", self.kind()),
        }
        result
    }
}
