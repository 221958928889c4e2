//! Circular orbit at constant angular velocity

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::datalog::{Column, DataLog};
use super::param::ParamSpec;
use super::{SimError, Simulation, elapsed, resolve};
use crate::polar_to_cartesian;
use crate::registry::SimKind;
use crate::renderer::{Scene, Shape, Stroke, Viewport, colors};
use glam::Vec2;

/// Radians advanced per tick
pub const ANGULAR_STEP: f64 = 0.02;
const STAR_RADIUS: f32 = 20.0;
const PLANET_RADIUS: f32 = 10.0;

pub const PARAMS: &[ParamSpec] = &[ParamSpec::new(
    "radius",
    "Orbit Radius",
    Some("px"),
    50.0,
    300.0,
    150.0,
)];

pub const COLUMNS: &[Column] = &[
    Column::new("Time", Some("s"), 3),
    Column::new("X", Some("px"), 2),
    Column::new("Y", Some("px"), 2),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitParams {
    pub radius: f64,
}

impl Default for OrbitParams {
    fn default() -> Self {
        Self {
            radius: PARAMS[0].default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Orbit {
    pub params: OrbitParams,
    /// Angular position of the planet (radians)
    pub angle: f64,
    ticks: u64,
    log: DataLog,
}

impl Default for Orbit {
    fn default() -> Self {
        Self::new()
    }
}

impl Orbit {
    pub fn new() -> Self {
        Self {
            params: OrbitParams::default(),
            angle: 0.0,
            ticks: 0,
            log: DataLog::new(COLUMNS),
        }
    }

    /// Planet position relative to the star
    pub fn position(&self) -> (f64, f64) {
        polar_to_cartesian(self.params.radius, self.angle)
    }
}

impl Simulation for Orbit {
    fn kind(&self) -> SimKind {
        SimKind::Orbit
    }

    fn params(&self) -> &'static [ParamSpec] {
        PARAMS
    }

    fn param(&self, name: &str) -> Option<f64> {
        (name == "radius").then_some(self.params.radius)
    }

    fn set_param(&mut self, name: &str, value: f64) -> Result<f64, SimError> {
        let value = resolve(self.kind(), PARAMS, name, value)?;
        self.params.radius = value;
        log::debug!("orbit: {name} = {value}");
        Ok(value)
    }

    fn is_dynamic(&self) -> bool {
        true
    }

    fn tick(&mut self) {
        self.angle += ANGULAR_STEP;
        let (x, y) = self.position();
        self.log.push(vec![elapsed(self.ticks).into(), x.into(), y.into()]);
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
        let center = viewport.center();
        let radius = self.params.radius as f32 * unit;
        let (x, y) = self.position();

        let mut scene = Scene::new(viewport);
        scene.push(Shape::ring(center, radius, Stroke::new(colors::ORBIT, 1.0 * unit)));
        scene.push(Shape::disc(center, STAR_RADIUS * unit, colors::STAR));
        scene.push(Shape::disc(
            center + Vec2::new(x as f32, y as f32) * unit,
            PLANET_RADIUS * unit,
            colors::PLANET,
        ));
        scene
    }

    fn status(&self) -> String {
        let (x, y) = self.position();
        format!("Angle: {:.2} rad | x = {:.2} px | y = {:.2} px", self.angle, x, y)
    }

    fn snapshot(&self) -> serde_json::Value {
        json!({
            "kind": self.kind().id(),
            "params": self.params,
            "state": { "angle": self.angle, "time": elapsed(self.ticks) },
            "records": self.log.len(),
        })
    }
}
