//! Ideal gas with nR = 1: P = T / V
//!
//! Every accepted change adds a point to the P–V diagram.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::datalog::{Column, DataLog};
use super::param::ParamSpec;
use super::quantity::Quantity;
use super::{SimError, Simulation, resolve};
use crate::registry::SimKind;
use crate::renderer::{Scene, Shape, Stroke, Viewport, colors};

pub const PARAMS: &[ParamSpec] = &[
    ParamSpec::new("temperature", "Temperature", Some("K"), 200.0, 600.0, 300.0),
    ParamSpec::new("volume", "Volume", None, 1.0, 10.0, 1.0),
];

pub const COLUMNS: &[Column] = &[
    Column::new("Temperature", Some("K"), 0),
    Column::new("Volume", None, 1),
    Column::new("Pressure", Some("atm"), 1),
];

/// Diagram axis extents
const VOLUME_AXIS_MAX: f32 = 10.0;
const PRESSURE_AXIS_MAX: f32 = 600.0;

pub fn pressure(temperature: f64, volume: f64) -> Quantity {
    Quantity::ratio(temperature, volume)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermoParams {
    pub temperature: f64,
    pub volume: f64,
}

impl Default for ThermoParams {
    fn default() -> Self {
        Self {
            temperature: PARAMS[0].default,
            volume: PARAMS[1].default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Thermodynamics {
    pub params: ThermoParams,
    pressure: Quantity,
    log: DataLog,
}

impl Default for Thermodynamics {
    fn default() -> Self {
        Self::new()
    }
}

impl Thermodynamics {
    pub fn new() -> Self {
        let params = ThermoParams::default();
        Self {
            params,
            pressure: pressure(params.temperature, params.volume),
            log: DataLog::new(COLUMNS),
        }
    }

    pub fn pressure(&self) -> Quantity {
        self.pressure
    }
}

impl Simulation for Thermodynamics {
    fn kind(&self) -> SimKind {
        SimKind::Thermodynamics
    }

    fn params(&self) -> &'static [ParamSpec] {
        PARAMS
    }

    fn param(&self, name: &str) -> Option<f64> {
        match name {
            "temperature" => Some(self.params.temperature),
            "volume" => Some(self.params.volume),
            _ => None,
        }
    }

    fn set_param(&mut self, name: &str, value: f64) -> Result<f64, SimError> {
        let value = resolve(self.kind(), PARAMS, name, value)?;
        match name {
            "temperature" => self.params.temperature = value,
            _ => self.params.volume = value,
        }
        self.pressure = pressure(self.params.temperature, self.params.volume);
        self.log.push(vec![
            self.params.temperature.into(),
            self.params.volume.into(),
            self.pressure.into(),
        ]);
        log::debug!("thermo: {name} = {value} -> P = {}", self.pressure);
        Ok(value)
    }

    fn is_dynamic(&self) -> bool {
        false
    }

    fn tick(&mut self) {}

    fn reset(&mut self) {
        *self = Self::new();
        log::info!("thermodynamics: reset to defaults");
    }

    fn log(&self) -> &DataLog {
        &self.log
    }

    fn render(&self, viewport: Viewport) -> Scene {
        let unit = viewport.unit();
        let margin = 50.0 * unit;
        let origin = Vec2::new(margin, viewport.height - margin);
        let plot = Vec2::new(viewport.width - 2.0 * margin, viewport.height - 2.0 * margin);
        let axis = Stroke::new(colors::INK, 2.0 * unit);
        let to_screen = |v: f64, p: f64| {
            let p = (p as f32).min(PRESSURE_AXIS_MAX);
            origin
                + Vec2::new(
                    v as f32 / VOLUME_AXIS_MAX * plot.x,
                    -p / PRESSURE_AXIS_MAX * plot.y,
                )
        };

        let mut scene = Scene::new(viewport);
        scene.push(Shape::line(origin, origin + Vec2::new(plot.x, 0.0), axis));
        scene.push(Shape::line(origin, origin - Vec2::new(0.0, plot.y), axis));
        scene.push(Shape::text(
            origin + Vec2::new(plot.x + 10.0 * unit, 5.0 * unit),
            "Volume",
            12.0 * unit,
            colors::INK,
        ));
        scene.push(Shape::text(
            origin - Vec2::new(40.0 * unit, plot.y + 10.0 * unit),
            "Pressure",
            12.0 * unit,
            colors::INK,
        ));

        let points: Vec<Vec2> = self
            .log
            .records()
            .iter()
            .filter_map(|r| Some(to_screen(r.get(1)?.as_f64()?, r.get(2)?.as_f64()?)))
            .collect();
        if points.len() > 1 {
            scene.push(Shape::Polyline {
                points,
                stroke: Stroke::new(colors::GAS, 2.0 * unit),
            });
        }
        if let Quantity::Finite(p) = self.pressure {
            scene.push(Shape::disc(
                to_screen(self.params.volume, p),
                5.0 * unit,
                colors::STATE_MARKER,
            ));
        }
        scene
    }

    fn status(&self) -> String {
        format!(
            "T = {:.0} K | V = {:.1} | P = {} atm",
            self.params.temperature,
            self.params.volume,
            self.pressure.format(1)
        )
    }

    fn snapshot(&self) -> serde_json::Value {
        json!({
            "kind": self.kind().id(),
            "params": self.params,
            "state": { "pressure": self.pressure },
            "records": self.log.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ideal_gas() {
        let mut t = Thermodynamics::new();
        assert_eq!(t.pressure(), Quantity::Finite(300.0));
        t.set_param("volume", 4.0).unwrap();
        assert_eq!(t.pressure(), Quantity::Finite(75.0));
        t.set_param("temperature", 600.0).unwrap();
        assert_eq!(t.pressure(), Quantity::Finite(150.0));
        assert_eq!(t.log().len(), 2);
    }

    #[test]
    fn test_zero_volume_sentinel() {
        assert_eq!(pressure(300.0, 0.0), Quantity::Infinite);
        // Controls can never reach it
        let mut t = Thermodynamics::new();
        assert_eq!(t.set_param("volume", 0.0).ok(), Some(1.0));
    }

    #[test]
    fn test_pv_diagram_follows_log() {
        let mut t = Thermodynamics::new();
        for v in [2.0, 3.0, 4.0] {
            t.set_param("volume", v).unwrap();
        }
        let scene = t.render(Viewport::default());
        let polyline = scene.shapes.iter().find_map(|s| match s {
            Shape::Polyline { points, .. } => Some(points.len()),
            _ => None,
        });
        assert_eq!(polyline, Some(3));
        assert!(scene.labels().any(|l| l == "Volume"));
    }

    #[test]
    fn test_reset() {
        let mut t = Thermodynamics::new();
        t.set_param("temperature", 450.0).unwrap();
        t.reset();
        assert_eq!(t.params, ThermoParams::default());
        assert!(t.log().is_empty());
    }
}
