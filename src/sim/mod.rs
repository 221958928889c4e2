//! Simulation module
//!
//! Every simulation is an independent, self-contained unit:
//! - Dynamic simulations advance one fixed step per `tick`
//! - Static simulations recompute on each accepted parameter change
//! - State evolution never reads anything but its own state and parameters
//! - No rendering backend or platform dependencies

pub mod circuit;
pub mod datalog;
pub mod magnetic;
pub mod optics;
pub mod orbit;
pub mod param;
pub mod pendulum;
pub mod projectile;
pub mod quantity;
pub mod string;
pub mod thermo;
pub mod tick;
pub mod wave;

pub use circuit::{Circuit, Topology};
pub use datalog::{Cell, Column, DataLog, Record};
pub use magnetic::MagneticField;
pub use optics::Optics;
pub use orbit::Orbit;
pub use param::ParamSpec;
pub use pendulum::Pendulum;
pub use projectile::Projectile;
pub use quantity::{INFINITY_MARK, Quantity};
pub use string::VibratingString;
pub use thermo::Thermodynamics;
pub use tick::{FixedClock, Instance, RunState};
pub use wave::Wave;

use glam::Vec2;
use thiserror::Error;

use crate::registry::SimKind;
use crate::renderer::{Scene, Viewport};

/// Errors raised by the simulation layer
#[derive(Debug, Error)]
pub enum SimError {
    #[error("{kind} has no parameter named '{name}'")]
    UnknownParam { kind: SimKind, name: String },
    #[error("unknown simulation '{0}'")]
    UnknownSimulation(String),
    #[error("invalid assignment '{0}', expected name=value")]
    BadAssignment(String),
}

/// Uniform interface the host drives
pub trait Simulation: Send {
    fn kind(&self) -> SimKind;

    /// Parameter table (ranges and defaults)
    fn params(&self) -> &'static [ParamSpec];

    /// Current value of a parameter
    fn param(&self, name: &str) -> Option<f64>;

    /// Clamp and apply a parameter, returning the applied value
    fn set_param(&mut self, name: &str, value: f64) -> Result<f64, SimError>;

    /// Whether state evolves on ticks
    fn is_dynamic(&self) -> bool;

    /// Advance one fixed step and log it (no-op for static simulations)
    fn tick(&mut self);

    /// Restore default parameters and state, empty the log
    fn reset(&mut self);

    fn log(&self) -> &DataLog;

    /// Draw the current snapshot
    fn render(&self, viewport: Viewport) -> Scene;

    /// One-line readout of the derived values
    fn status(&self) -> String;

    /// Parameters and state as JSON
    fn snapshot(&self) -> serde_json::Value;

    /// Pointer pressed; returns true when a drag starts
    fn grab(&mut self, _point: Vec2, _viewport: Viewport) -> bool {
        false
    }

    /// Pointer moved while dragging
    fn drag(&mut self, _point: Vec2, _viewport: Viewport) {}

    /// Pointer released
    fn release(&mut self) {}
}

/// Resolve a parameter event against a table: clamped value or error
pub(crate) fn resolve(
    kind: SimKind,
    specs: &'static [ParamSpec],
    name: &str,
    value: f64,
) -> Result<f64, SimError> {
    param::find(specs, name)
        .map(|spec| spec.clamp(value))
        .ok_or_else(|| SimError::UnknownParam {
            kind,
            name: name.to_string(),
        })
}

/// Simulated time stamped on the record of tick number `ticks` (0-based)
#[inline]
pub(crate) fn elapsed(ticks: u64) -> f64 {
    ticks as f64 * crate::consts::TICK_SECONDS
}
