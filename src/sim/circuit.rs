//! Resistor network driven by an ideal battery
//!
//! One to four resistors in series or in parallel. Recomputed and logged on
//! every accepted parameter change.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::datalog::{Column, DataLog};
use super::param::ParamSpec;
use super::quantity::Quantity;
use super::{SimError, Simulation, resolve};
use crate::registry::SimKind;
use crate::renderer::{Scene, Shape, Stroke, Viewport, colors};

pub const MAX_RESISTORS: usize = 4;
/// Resistor values exposed when the count grows
pub const DEFAULT_RESISTANCES: [f64; MAX_RESISTORS] = [100.0, 100.0, 200.0, 300.0];

pub const PARAMS: &[ParamSpec] = &[
    ParamSpec::new("voltage", "Voltage", Some("V"), 1.0, 50.0, 9.0),
    ParamSpec::new("count", "Num Resistors", None, 1.0, 4.0, 2.0).integer(),
    ParamSpec::new("parallel", "Parallel", None, 0.0, 1.0, 0.0).integer(),
    ParamSpec::new("r1", "R1", Some("Ω"), 1.0, 2000.0, 100.0),
    ParamSpec::new("r2", "R2", Some("Ω"), 1.0, 2000.0, 100.0),
    ParamSpec::new("r3", "R3", Some("Ω"), 1.0, 2000.0, 200.0),
    ParamSpec::new("r4", "R4", Some("Ω"), 1.0, 2000.0, 300.0),
];

pub const COLUMNS: &[Column] = &[
    Column::new("Voltage", Some("V"), 1),
    Column::new("Resistances", Some("Ohms"), 1),
    Column::new("CircuitType", None, 0),
    Column::new("TotalR", Some("Ohms"), 2),
    Column::new("Current", Some("A"), 2),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Topology {
    #[default]
    Series,
    Parallel,
}

impl Topology {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topology::Series => "Series",
            Topology::Parallel => "Parallel",
        }
    }
}

/// Equivalent resistance of a network; empty or singular networks are infinite
pub fn total_resistance(topology: Topology, resistances: &[f64]) -> Quantity {
    if resistances.is_empty() {
        return Quantity::Infinite;
    }
    match topology {
        Topology::Series => Quantity::from_f64(resistances.iter().sum()),
        Topology::Parallel => {
            let conductance: f64 = resistances.iter().map(|r| Quantity::ratio(1.0, *r)).fold(
                0.0,
                |acc, g| match g {
                    Quantity::Finite(g) => acc + g,
                    // A zero-ohm branch shorts the network
                    Quantity::Infinite => f64::INFINITY,
                },
            );
            Quantity::ratio(1.0, conductance)
        }
    }
}

/// Ohm's law with the sentinel: zero or infinite resistance gives infinite current
pub fn current(voltage: f64, total: Quantity) -> Quantity {
    match total {
        Quantity::Finite(r) if r != 0.0 => Quantity::from_f64(voltage / r),
        _ => Quantity::Infinite,
    }
}

#[derive(Debug, Clone)]
pub struct Circuit {
    pub voltage: f64,
    pub topology: Topology,
    count: usize,
    resistances: [f64; MAX_RESISTORS],
    total: Quantity,
    current: Quantity,
    log: DataLog,
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new()
    }
}

impl Circuit {
    pub fn new() -> Self {
        let mut circuit = Self {
            voltage: PARAMS[0].default,
            topology: Topology::Series,
            count: PARAMS[1].default as usize,
            resistances: DEFAULT_RESISTANCES,
            total: Quantity::Infinite,
            current: Quantity::Infinite,
            log: DataLog::new(COLUMNS),
        };
        circuit.compute();
        circuit
    }

    /// Active resistor values
    pub fn resistances(&self) -> &[f64] {
        &self.resistances[..self.count]
    }

    pub fn total_resistance(&self) -> Quantity {
        self.total
    }

    pub fn current(&self) -> Quantity {
        self.current
    }

    pub fn set_topology(&mut self, topology: Topology) {
        self.topology = topology;
        log::info!("circuit: topology {}", topology.as_str());
        self.recompute();
    }

    /// Change the resistor count; slots that become hidden revert to defaults
    pub fn set_count(&mut self, count: usize) {
        let count = count.clamp(1, MAX_RESISTORS);
        self.resistances[count..].copy_from_slice(&DEFAULT_RESISTANCES[count..]);
        self.count = count;
        self.recompute();
    }

    /// Set one resistor (0-based), clamped to the valid range
    pub fn set_resistance(&mut self, index: usize, ohms: f64) -> Result<f64, SimError> {
        let name = ["r1", "r2", "r3", "r4"].get(index).copied().unwrap_or("r?");
        self.set_param(name, ohms)
    }

    fn compute(&mut self) {
        self.total = total_resistance(self.topology, self.resistances());
        self.current = current(self.voltage, self.total);
    }

    /// Recompute derived values and log the observable change
    fn recompute(&mut self) {
        self.compute();
        let joined = self
            .resistances()
            .iter()
            .map(|r| format!("{r:.1}"))
            .collect::<Vec<_>>()
            .join("/");
        self.log.push(vec![
            self.voltage.into(),
            joined.into(),
            self.topology.as_str().to_string().into(),
            self.total.into(),
            self.current.into(),
        ]);
        log::debug!(
            "circuit: V={} R={:?} {} -> R_total={} I={}",
            self.voltage,
            self.resistances(),
            self.topology.as_str(),
            self.total,
            self.current
        );
    }

    fn render_series(&self, scene: &mut Scene, start: Vec2, end_x: f32, unit: f32) {
        let wire = Stroke::new(colors::INK, 2.0 * unit);
        let size = Vec2::new(40.0, 20.0) * unit;
        let segment = (end_x - start.x) / (self.count + 1) as f32;

        let mut prev_x = start.x;
        for i in 0..self.count {
            let x = start.x + segment * (i + 1) as f32 - size.x * 0.5;
            scene.push(Shape::line(Vec2::new(prev_x, start.y), Vec2::new(x, start.y), wire));
            scene.push(Shape::Rect {
                min: Vec2::new(x, start.y - size.y * 0.5),
                size,
                fill: Some(colors::RESISTOR),
                stroke: Some(wire),
            });
            prev_x = x + size.x;
        }
        scene.push(Shape::line(Vec2::new(prev_x, start.y), Vec2::new(end_x, start.y), wire));
    }

    fn render_parallel(&self, scene: &mut Scene, start: Vec2, end_x: f32, unit: f32) {
        let wire = Stroke::new(colors::INK, 2.0 * unit);
        let top = start.y - 70.0 * unit;
        let bottom = start.y + 70.0 * unit;
        let size = Vec2::new(20.0, 50.0) * unit;

        // Rails
        for x in [start.x, end_x] {
            scene.push(Shape::line(Vec2::new(x, top), Vec2::new(x, bottom), wire));
        }
        scene.push(Shape::line(Vec2::new(start.x, top), Vec2::new(end_x, top), wire));
        scene.push(Shape::line(Vec2::new(start.x, bottom), Vec2::new(end_x, bottom), wire));

        let gap = (end_x - start.x) / (self.count + 1) as f32;
        for i in 0..self.count {
            let x = start.x + gap * (i + 1) as f32;
            scene.push(Shape::line(Vec2::new(x, top), Vec2::new(x, bottom), wire));
            scene.push(Shape::Rect {
                min: Vec2::new(x - size.x * 0.5, start.y - size.y * 0.5),
                size,
                fill: Some(colors::RESISTOR),
                stroke: Some(wire),
            });
        }
    }
}

impl Simulation for Circuit {
    fn kind(&self) -> SimKind {
        SimKind::Circuit
    }

    fn params(&self) -> &'static [ParamSpec] {
        PARAMS
    }

    fn param(&self, name: &str) -> Option<f64> {
        match name {
            "voltage" => Some(self.voltage),
            "count" => Some(self.count as f64),
            "parallel" => Some(match self.topology {
                Topology::Series => 0.0,
                Topology::Parallel => 1.0,
            }),
            "r1" => Some(self.resistances[0]),
            "r2" => Some(self.resistances[1]),
            "r3" => Some(self.resistances[2]),
            "r4" => Some(self.resistances[3]),
            _ => None,
        }
    }

    fn set_param(&mut self, name: &str, value: f64) -> Result<f64, SimError> {
        let value = resolve(self.kind(), PARAMS, name, value)?;
        match name {
            "voltage" => {
                self.voltage = value;
                self.recompute();
            }
            "count" => self.set_count(value as usize),
            "parallel" => self.set_topology(if value == 0.0 {
                Topology::Series
            } else {
                Topology::Parallel
            }),
            resistor => {
                let index = match resistor {
                    "r1" => 0,
                    "r2" => 1,
                    "r3" => 2,
                    _ => 3,
                };
                self.resistances[index] = value;
                self.recompute();
            }
        }
        Ok(value)
    }

    fn is_dynamic(&self) -> bool {
        false
    }

    fn tick(&mut self) {}

    fn reset(&mut self) {
        *self = Self::new();
        log::info!("circuit: reset to defaults");
    }

    fn log(&self) -> &DataLog {
        &self.log
    }

    fn render(&self, viewport: Viewport) -> Scene {
        let unit = viewport.unit();
        let wire = Stroke::new(colors::INK, 2.0 * unit);
        let mid_y = viewport.height * 0.5;
        let left = viewport.width * 0.1;
        let right = viewport.width * 0.9;
        let battery = Vec2::new(50.0, 100.0) * unit;

        let mut scene = Scene::new(viewport);
        scene.push(Shape::Rect {
            min: Vec2::new(left, mid_y - battery.y * 0.5),
            size: battery,
            fill: Some(colors::BATTERY),
            stroke: Some(wire),
        });

        let network_start = Vec2::new(left + battery.x + 20.0 * unit, mid_y);
        scene.push(Shape::line(Vec2::new(left + battery.x, mid_y), network_start, wire));
        match self.topology {
            Topology::Series => self.render_series(&mut scene, network_start, right, unit),
            Topology::Parallel => self.render_parallel(&mut scene, network_start, right, unit),
        }

        // Return path under the network back to the battery
        let return_y = mid_y + 110.0 * unit;
        scene.push(Shape::Polyline {
            points: vec![
                Vec2::new(right, mid_y),
                Vec2::new(right, return_y),
                Vec2::new(left + battery.x * 0.5, return_y),
                Vec2::new(left + battery.x * 0.5, mid_y + battery.y * 0.5),
            ],
            stroke: wire,
        });

        scene.push(Shape::text(
            viewport.at(0.5, 0.1),
            self.status(),
            14.0 * unit,
            colors::INK,
        ));
        scene
    }

    fn status(&self) -> String {
        format!(
            "Current: {} A | Total R: {} Ω",
            self.current.format(2),
            self.total.format(2)
        )
    }

    fn snapshot(&self) -> serde_json::Value {
        json!({
            "kind": self.kind().id(),
            "params": {
                "voltage": self.voltage,
                "topology": self.topology,
                "resistances": self.resistances(),
            },
            "state": { "total_resistance": self.total, "current": self.current },
            "records": self.log.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Cell;
    use proptest::prelude::*;

    #[test]
    fn test_series_scenario() {
        let c = Circuit::new();
        assert_eq!(c.resistances(), &[100.0, 100.0]);
        assert_eq!(c.total_resistance(), Quantity::Finite(200.0));
        let i = c.current().finite().unwrap();
        assert!((i - 0.045).abs() < 1e-12);
    }

    #[test]
    fn test_parallel_scenario() {
        let mut c = Circuit::new();
        c.set_topology(Topology::Parallel);
        let r = c.total_resistance().finite().unwrap();
        let i = c.current().finite().unwrap();
        assert!((r - 50.0).abs() < 1e-12);
        assert!((i - 0.18).abs() < 1e-12);
    }

    #[test]
    fn test_singular_networks_are_infinite() {
        assert_eq!(total_resistance(Topology::Parallel, &[]), Quantity::Infinite);
        assert_eq!(total_resistance(Topology::Series, &[]), Quantity::Infinite);
        assert_eq!(current(9.0, Quantity::Infinite), Quantity::Infinite);
        assert_eq!(current(9.0, Quantity::Finite(0.0)), Quantity::Infinite);
        assert_eq!(total_resistance(Topology::Parallel, &[0.0, 10.0]), Quantity::Finite(0.0));
    }

    #[test]
    fn test_resistor_clamped_to_minimum() {
        let mut c = Circuit::new();
        assert_eq!(c.set_param("r1", 0.0).ok(), Some(1.0));
        assert_eq!(c.set_param("r2", -5.0).ok(), Some(1.0));
        assert_eq!(c.total_resistance(), Quantity::Finite(2.0));
    }

    #[test]
    fn test_count_change_refills_defaults() {
        let mut c = Circuit::new();
        c.set_param("r2", 500.0).unwrap();
        c.set_count(1);
        assert_eq!(c.resistances(), &[100.0]);
        c.set_count(4);
        assert_eq!(c.resistances(), &[100.0, 100.0, 200.0, 300.0]);
        assert_eq!(c.set_param("count", 9.0).ok(), Some(4.0));
    }

    #[test]
    fn test_parallel_param_toggles_topology() {
        let mut c = Circuit::new();
        c.set_param("parallel", 1.0).unwrap();
        assert_eq!(c.topology, Topology::Parallel);
        assert_eq!(c.param("parallel"), Some(1.0));
        c.set_param("parallel", 0.2).unwrap();
        assert_eq!(c.topology, Topology::Series);
    }

    #[test]
    fn test_logs_every_change_not_construction() {
        let mut c = Circuit::new();
        assert!(c.log().is_empty());
        c.set_param("voltage", 12.0).unwrap();
        c.set_topology(Topology::Parallel);
        assert_eq!(c.log().len(), 2);
        let last = c.log().last().unwrap();
        assert_eq!(last[1], Cell::Text("100.0/100.0".into()));
        assert_eq!(last[2], Cell::Text("Parallel".into()));
        c.reset();
        assert!(c.log().is_empty());
        assert_eq!(c.voltage, 9.0);
        assert_eq!(c.topology, Topology::Series);
    }

    #[test]
    fn test_status_and_render() {
        let c = Circuit::new();
        assert_eq!(c.status(), "Current: 0.04 A | Total R: 200.00 Ω");
        let scene = c.render(Viewport::default());
        let resistors = scene.count(|s| {
            matches!(s, Shape::Rect { fill: Some(color), .. } if *color == colors::RESISTOR)
        });
        assert_eq!(resistors, 2);
        assert!(scene.labels().any(|l| l.starts_with("Current:")));
    }

    proptest! {
        #[test]
        fn series_is_sum_and_parallel_below_min(
            rs in proptest::collection::vec(1.0f64..2000.0, 1..=4)
        ) {
            let sum: f64 = rs.iter().sum();
            let min = rs.iter().copied().fold(f64::INFINITY, f64::min);
            let series = total_resistance(Topology::Series, &rs).finite().unwrap();
            let parallel = total_resistance(Topology::Parallel, &rs).finite().unwrap();
            prop_assert!((series - sum).abs() <= 1e-9 * sum);
            prop_assert!(parallel <= min * (1.0 + 1e-12));
        }
    }
}
