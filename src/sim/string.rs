//! Vibrating string
//!
//! Displacement along the string is `tension · sin(k·x + φ)`; the phase
//! advances with the wave speed. The logged amplitude is sampled at a fixed
//! probe point.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::datalog::{Column, DataLog};
use super::param::ParamSpec;
use super::{SimError, Simulation, elapsed, resolve};
use crate::registry::SimKind;
use crate::renderer::{Scene, Shape, Stroke, Viewport, colors};

/// Phase advanced per tick per unit of wave speed
pub const PHASE_STEP: f64 = 0.05;
/// Spatial wavenumber (radians per model pixel)
pub const WAVENUMBER: f64 = 0.02;
/// Position at which the logged amplitude is sampled (model pixels)
pub const PROBE_X: f64 = 100.0;
const SAMPLE_SPACING: f32 = 2.0;

pub const PARAMS: &[ParamSpec] = &[
    ParamSpec::new("tension", "Tension", None, 1.0, 20.0, 5.0),
    ParamSpec::new("wave_speed", "Wave Speed", None, 1.0, 10.0, 2.0),
];

pub const COLUMNS: &[Column] = &[
    Column::new("Time", Some("s"), 3),
    Column::new("Amplitude", None, 3),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StringParams {
    pub tension: f64,
    pub wave_speed: f64,
}

impl Default for StringParams {
    fn default() -> Self {
        Self {
            tension: PARAMS[0].default,
            wave_speed: PARAMS[1].default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VibratingString {
    pub params: StringParams,
    pub phase: f64,
    ticks: u64,
    log: DataLog,
}

impl Default for VibratingString {
    fn default() -> Self {
        Self::new()
    }
}

impl VibratingString {
    pub fn new() -> Self {
        Self {
            params: StringParams::default(),
            phase: 0.0,
            ticks: 0,
            log: DataLog::new(COLUMNS),
        }
    }

    /// Displacement at position `x` (model pixels)
    pub fn amplitude_at(&self, x: f64) -> f64 {
        self.params.tension * (WAVENUMBER * x + self.phase).sin()
    }
}

impl Simulation for VibratingString {
    fn kind(&self) -> SimKind {
        SimKind::String
    }

    fn params(&self) -> &'static [ParamSpec] {
        PARAMS
    }

    fn param(&self, name: &str) -> Option<f64> {
        match name {
            "tension" => Some(self.params.tension),
            "wave_speed" => Some(self.params.wave_speed),
            _ => None,
        }
    }

    fn set_param(&mut self, name: &str, value: f64) -> Result<f64, SimError> {
        let value = resolve(self.kind(), PARAMS, name, value)?;
        match name {
            "tension" => self.params.tension = value,
            _ => self.params.wave_speed = value,
        }
        log::debug!("string: {name} = {value}");
        Ok(value)
    }

    fn is_dynamic(&self) -> bool {
        true
    }

    fn tick(&mut self) {
        self.phase += self.params.wave_speed * PHASE_STEP;
        let amplitude = self.amplitude_at(PROBE_X);
        self.log.push(vec![elapsed(self.ticks).into(), amplitude.into()]);
        self.ticks += 1;
    }

    fn reset(&mut self) {
        *self = Self::new();
    }

    fn log(&self) -> &DataLog {
        &self.log
    }

    fn render(&self, viewport: Viewport) -> Scene {
        let unit = viewport.unit();
        let base_y = viewport.height * 0.5;
        let count = (viewport.width / SAMPLE_SPACING).ceil() as usize;
        let points = (0..count)
            .map(|i| {
                let x = i as f32 * SAMPLE_SPACING;
                let y = self.amplitude_at(f64::from(x / unit));
                Vec2::new(x, base_y - y as f32 * unit)
            })
            .collect();

        let mut scene = Scene::new(viewport);
        scene.push(Shape::line(
            Vec2::new(0.0, base_y),
            Vec2::new(viewport.width, base_y),
            Stroke::new(colors::GRID, 1.0 * unit),
        ));
        scene.push(Shape::Polyline {
            points,
            stroke: Stroke::new(colors::STRING, 2.0 * unit),
        });
        scene
    }

    fn status(&self) -> String {
        format!(
            "Phase: {:.2} rad | Amplitude at probe: {:.3}",
            self.phase,
            self.amplitude_at(PROBE_X)
        )
    }

    fn snapshot(&self) -> serde_json::Value {
        json!({
            "kind": self.kind().id(),
            "params": self.params,
            "state": { "phase": self.phase, "time": elapsed(self.ticks) },
            "records": self.log.len(),
        })
    }
}
