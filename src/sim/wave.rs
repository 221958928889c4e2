//! Travelling sine wave with a phase-shifted companion and their sum

use glam::Vec2;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::f64::consts::{FRAC_PI_4, TAU};

use super::datalog::{Column, DataLog};
use super::param::ParamSpec;
use super::{SimError, Simulation, elapsed, resolve};
use crate::registry::SimKind;
use crate::renderer::{Scene, Shape, Stroke, Viewport, colors};

/// Phase advanced per tick per unit of frequency
pub const PHASE_STEP: f64 = 0.1;
/// Offset of the companion wave
pub const COMPANION_OFFSET: f64 = FRAC_PI_4;
/// Full wavelengths across the canvas width
const CYCLES_ACROSS: f64 = 3.0;
/// Horizontal sampling interval (viewport pixels)
const SAMPLE_SPACING: f32 = 2.0;

pub const PARAMS: &[ParamSpec] = &[
    ParamSpec::new("frequency", "Frequency", Some("Hz"), 1.0, 10.0, 1.0),
    ParamSpec::new("amplitude", "Amplitude", Some("px"), 10.0, 100.0, 30.0),
];

pub const COLUMNS: &[Column] = &[
    Column::new("Time", Some("s"), 3),
    Column::new("Amplitude", Some("px"), 3),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveParams {
    pub frequency: f64,
    pub amplitude: f64,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            frequency: PARAMS[0].default,
            amplitude: PARAMS[1].default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Wave {
    pub params: WaveParams,
    pub phase: f64,
    ticks: u64,
    log: DataLog,
}

impl Default for Wave {
    fn default() -> Self {
        Self::new()
    }
}

impl Wave {
    pub fn new() -> Self {
        Self {
            params: WaveParams::default(),
            phase: 0.0,
            ticks: 0,
            log: DataLog::new(COLUMNS),
        }
    }

    /// Displacement at spatial phase `kx` for a wave shifted by `offset`
    pub fn displacement(&self, kx: f64, offset: f64) -> f64 {
        self.params.amplitude * (kx + self.phase + offset).sin()
    }

    /// Sampled (x, y) points across the viewport for one phase offset;
    /// `None` yields the superposition of both waves
    fn sample(&self, viewport: Viewport, offset: Option<f64>) -> Vec<Vec2> {
        let unit = viewport.unit();
        let mid = viewport.height * 0.5;
        let k = TAU * CYCLES_ACROSS / f64::from(viewport.width);
        let count = (viewport.width / SAMPLE_SPACING).ceil() as usize;
        (0..count)
            .map(|i| {
                let x = i as f32 * SAMPLE_SPACING;
                let kx = k * f64::from(x);
                let y = match offset {
                    Some(offset) => self.displacement(kx, offset),
                    None => self.displacement(kx, 0.0) + self.displacement(kx, COMPANION_OFFSET),
                };
                Vec2::new(x, mid - y as f32 * unit)
            })
            .collect()
    }
}

impl Simulation for Wave {
    fn kind(&self) -> SimKind {
        SimKind::Wave
    }

    fn params(&self) -> &'static [ParamSpec] {
        PARAMS
    }

    fn param(&self, name: &str) -> Option<f64> {
        match name {
            "frequency" => Some(self.params.frequency),
            "amplitude" => Some(self.params.amplitude),
            _ => None,
        }
    }

    fn set_param(&mut self, name: &str, value: f64) -> Result<f64, SimError> {
        let value = resolve(self.kind(), PARAMS, name, value)?;
        match name {
            "frequency" => self.params.frequency = value,
            _ => self.params.amplitude = value,
        }
        log::debug!("wave: {name} = {value}");
        Ok(value)
    }

    fn is_dynamic(&self) -> bool {
        true
    }

    fn tick(&mut self) {
        self.phase += self.params.frequency * PHASE_STEP;
        let amplitude = self.params.amplitude * self.phase.sin();
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
        let mut scene = Scene::new(viewport);
        scene.push(Shape::Polyline {
            points: self.sample(viewport, Some(0.0)),
            stroke: Stroke::new(colors::WAVE_A, 1.0 * unit),
        });
        scene.push(Shape::Polyline {
            points: self.sample(viewport, Some(COMPANION_OFFSET)),
            stroke: Stroke::new(colors::WAVE_B, 1.0 * unit),
        });
        scene.push(Shape::Polyline {
            points: self.sample(viewport, None),
            stroke: Stroke::new(colors::WAVE_SUM, 2.0 * unit),
        });
        scene
    }

    fn status(&self) -> String {
        format!(
            "Phase: {:.2} rad | Displacement: {:.2} px",
            self.phase,
            self.params.amplitude * self.phase.sin()
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
