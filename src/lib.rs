//! Phys Tutor - interactive physics simulations for a tutoring app
//!
//! Core modules:
//! - `sim`: Simulation models (state, update rules, parameters, data log)
//! - `registry`: Static table of available simulations
//! - `lab`: Host owning one instance of every simulation
//! - `renderer`: 2D drawing primitives and tessellation
//! - `persistence`: CSV export/re-parse with atomic file commit
//! - `settings`: JSON configuration

pub mod lab;
pub mod persistence;
pub mod registry;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use lab::Lab;
pub use registry::SimKind;
pub use settings::Settings;
pub use sim::{Quantity, RunState, SimError, Simulation};

/// Simulation configuration constants
pub mod consts {
    /// Timer interval between ticks (milliseconds, ~60 Hz)
    pub const TICK_MS: u64 = 16;
    /// Simulated seconds per tick
    pub const TICK_SECONDS: f64 = 0.016;
    /// Maximum ticks executed per host frame; the rest carry over
    pub const MAX_TICKS_PER_FRAME: u32 = 8;

    /// Layout reference extent: one layout unit at a 500px short side
    pub const REFERENCE_EXTENT: f32 = 500.0;
}

/// Format a float with a fixed number of decimals
#[inline]
pub fn fixed(value: f64, precision: usize) -> String {
    format!("{value:.precision$}")
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f64, theta: f64) -> (f64, f64) {
    (r * theta.cos(), r * theta.sin())
}
