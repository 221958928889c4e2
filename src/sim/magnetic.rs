//! Field at the centre of a circular coil
//!
//! B = I·N / (2R) with μ₀ = 1 and a fixed coil radius.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::f32::consts::TAU;

use super::datalog::{Column, DataLog};
use super::param::ParamSpec;
use super::{SimError, Simulation, resolve};
use crate::registry::SimKind;
use crate::renderer::{Scene, Shape, Stroke, Viewport, colors};

/// Coil radius used by the formula
pub const COIL_RADIUS: f64 = 100.0;
const DRAWN_COIL_RADIUS: f32 = 50.0;
const FIELD_LINES: u32 = 8;
/// Field strength represented by one ring
const RING_STEP: f64 = 0.25;
const MAX_RINGS: u32 = 10;

pub const PARAMS: &[ParamSpec] = &[
    ParamSpec::new("current", "Current", Some("A"), 1.0, 20.0, 5.0),
    ParamSpec::new("turns", "Turns", None, 1.0, 50.0, 10.0).integer(),
];

pub const COLUMNS: &[Column] = &[
    Column::new("Current", Some("A"), 1),
    Column::new("Turns", None, 0),
    Column::new("B Field Strength", Some("μT"), 3),
];

pub fn field_strength(current: f64, turns: u32) -> f64 {
    current * f64::from(turns) / (2.0 * COIL_RADIUS)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MagneticParams {
    pub current: f64,
    pub turns: u32,
}

impl Default for MagneticParams {
    fn default() -> Self {
        Self {
            current: PARAMS[0].default,
            turns: PARAMS[1].default as u32,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MagneticField {
    pub params: MagneticParams,
    field: f64,
    log: DataLog,
}

impl Default for MagneticField {
    fn default() -> Self {
        Self::new()
    }
}

impl MagneticField {
    pub fn new() -> Self {
        let params = MagneticParams::default();
        Self {
            params,
            field: field_strength(params.current, params.turns),
            log: DataLog::new(COLUMNS),
        }
    }

    pub fn field_strength(&self) -> f64 {
        self.field
    }

    /// Concentric rings drawn for the current field
    pub fn ring_count(&self) -> u32 {
        ((self.field / RING_STEP).ceil() as u32).clamp(1, MAX_RINGS)
    }
}

impl Simulation for MagneticField {
    fn kind(&self) -> SimKind {
        SimKind::MagneticField
    }

    fn params(&self) -> &'static [ParamSpec] {
        PARAMS
    }

    fn param(&self, name: &str) -> Option<f64> {
        match name {
            "current" => Some(self.params.current),
            "turns" => Some(f64::from(self.params.turns)),
            _ => None,
        }
    }

    fn set_param(&mut self, name: &str, value: f64) -> Result<f64, SimError> {
        let value = resolve(self.kind(), PARAMS, name, value)?;
        match name {
            "current" => self.params.current = value,
            _ => self.params.turns = value as u32,
        }
        self.field = field_strength(self.params.current, self.params.turns);
        self.log.push(vec![
            self.params.current.into(),
            self.params.turns.into(),
            self.field.into(),
        ]);
        log::debug!("magnetic: {name} = {value} -> B = {:.3}", self.field);
        Ok(value)
    }

    fn is_dynamic(&self) -> bool {
        false
    }

    fn tick(&mut self) {}

    fn reset(&mut self) {
        *self = Self::new();
        log::info!("magnetic field: reset to defaults");
    }

    fn log(&self) -> &DataLog {
        &self.log
    }

    fn render(&self, viewport: Viewport) -> Scene {
        let unit = viewport.unit();
        let center = viewport.center();
        let coil = DRAWN_COIL_RADIUS * unit;

        let mut scene = Scene::new(viewport);
        for i in 1..=self.ring_count() {
            scene.push(Shape::ring(
                center,
                coil + i as f32 * 15.0 * unit,
                Stroke::new(colors::FIELD, 1.0 * unit),
            ));
        }
        scene.push(Shape::ring(center, coil, Stroke::new(colors::COIL, 4.0 * unit)));
        for i in 1..=FIELD_LINES {
            let angle = TAU / FIELD_LINES as f32 * i as f32;
            scene.push(Shape::line(
                center,
                center + Vec2::new(angle.cos(), angle.sin()) * coil,
                Stroke::new(colors::FIELD, 1.0 * unit),
            ));
        }
        scene.push(Shape::text(
            center - Vec2::new(50.0, DRAWN_COIL_RADIUS + 10.0) * unit,
            format!("B = {:.2} μT", self.field),
            14.0 * unit,
            colors::INK,
        ));
        scene
    }

    fn status(&self) -> String {
        format!(
            "I = {:.1} A | N = {} | B = {:.3} μT",
            self.params.current, self.params.turns, self.field
        )
    }

    fn snapshot(&self) -> serde_json::Value {
        json!({
            "kind": self.kind().id(),
            "params": self.params,
            "state": { "field_strength": self.field },
            "records": self.log.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Cell;

    #[test]
    fn test_default_field() {
        let m = MagneticField::new();
        assert!((m.field_strength() - 0.25).abs() < 1e-12);
        assert_eq!(m.ring_count(), 1);
    }

    #[test]
    fn test_turns_are_whole_numbers() {
        let mut m = MagneticField::new();
        assert_eq!(m.set_param("turns", 20.6).ok(), Some(21.0));
        assert_eq!(m.params.turns, 21);
        assert_eq!(m.log().last().map(|r| r[1].clone()), Some(Cell::Count(21)));
    }

    #[test]
    fn test_rings_scale_with_field() {
        let mut m = MagneticField::new();
        m.set_param("current", 20.0).unwrap();
        m.set_param("turns", 50.0).unwrap();
        assert!((m.field_strength() - 5.0).abs() < 1e-12);
        assert_eq!(m.ring_count(), MAX_RINGS);
        assert!(m.render(Viewport::default()).labels().any(|l| l == "B = 5.00 μT"));
    }

    #[test]
    fn test_reset() {
        let mut m = MagneticField::new();
        m.set_param("current", 1.0).unwrap();
        m.reset();
        assert_eq!(m.params, MagneticParams::default());
        assert!(m.log().is_empty());
    }
}
