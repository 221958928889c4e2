//! Projectile motion
//!
//! Closed-form flight from the origin; the flight restarts once the
//! projectile falls below the ground. The logged time is the time since
//! the current launch.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::datalog::{Column, DataLog};
use super::param::ParamSpec;
use super::{SimError, Simulation, elapsed, resolve};
use crate::consts::TICK_SECONDS;
use crate::registry::SimKind;
use crate::renderer::{Scene, Shape, Stroke, Viewport, colors};

/// How far ahead the predicted trajectory reaches (seconds)
const PREDICTION_HORIZON: f64 = 5.0;
const PREDICTION_STEP: f64 = 0.01;
const BALL_RADIUS: f32 = 5.0;

pub const PARAMS: &[ParamSpec] = &[
    ParamSpec::new("gravity", "Gravity", Some("m/s²"), 1.0, 20.0, 9.8),
    ParamSpec::new("angle", "Launch Angle", Some("°"), 0.0, 90.0, 45.0),
    ParamSpec::new("speed", "Initial Speed", Some("m/s"), 10.0, 100.0, 50.0),
];

pub const COLUMNS: &[Column] = &[
    Column::new("Time", Some("s"), 3),
    Column::new("X", Some("m"), 3),
    Column::new("Y", Some("m"), 3),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileParams {
    pub gravity: f64,
    /// Launch angle (degrees above horizontal)
    pub angle_deg: f64,
    pub speed: f64,
}

impl Default for ProjectileParams {
    fn default() -> Self {
        Self {
            gravity: PARAMS[0].default,
            angle_deg: PARAMS[1].default,
            speed: PARAMS[2].default,
        }
    }
}

impl ProjectileParams {
    /// Position after `t` seconds of flight
    pub fn position_at(&self, t: f64) -> (f64, f64) {
        let phi = self.angle_deg.to_radians();
        let x = self.speed * phi.cos() * t;
        let y = self.speed * phi.sin() * t - 0.5 * self.gravity * t * t;
        (x, y)
    }
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub params: ProjectileParams,
    /// Time since the current launch (seconds)
    pub flight_time: f64,
    /// Completed flights since reset
    pub flights: u32,
    /// Points of the current flight, oldest first
    path: Vec<(f64, f64)>,
    ticks: u64,
    log: DataLog,
}

impl Default for Projectile {
    fn default() -> Self {
        Self::new()
    }
}

impl Projectile {
    pub fn new() -> Self {
        Self {
            params: ProjectileParams::default(),
            flight_time: 0.0,
            flights: 0,
            path: Vec::new(),
            ticks: 0,
            log: DataLog::new(COLUMNS),
        }
    }

    pub fn path(&self) -> &[(f64, f64)] {
        &self.path
    }

    pub fn position(&self) -> (f64, f64) {
        self.params.position_at(self.flight_time)
    }

    /// Predicted remaining trajectory from the current flight time
    pub fn prediction(&self) -> Vec<(f64, f64)> {
        let start = (self.flight_time / PREDICTION_STEP).round() as u32;
        let steps = (PREDICTION_HORIZON / PREDICTION_STEP).round() as u32;
        (start..start + steps)
            .map(|i| self.params.position_at(f64::from(i) * PREDICTION_STEP))
            .take_while(|&(_, y)| y >= 0.0)
            .collect()
    }
}

impl Simulation for Projectile {
    fn kind(&self) -> SimKind {
        SimKind::Projectile
    }

    fn params(&self) -> &'static [ParamSpec] {
        PARAMS
    }

    fn param(&self, name: &str) -> Option<f64> {
        match name {
            "gravity" => Some(self.params.gravity),
            "angle" => Some(self.params.angle_deg),
            "speed" => Some(self.params.speed),
            _ => None,
        }
    }

    fn set_param(&mut self, name: &str, value: f64) -> Result<f64, SimError> {
        let value = resolve(self.kind(), PARAMS, name, value)?;
        match name {
            "gravity" => self.params.gravity = value,
            "angle" => self.params.angle_deg = value,
            _ => self.params.speed = value,
        }
        log::debug!("projectile: {name} = {value}");
        Ok(value)
    }

    fn is_dynamic(&self) -> bool {
        true
    }

    fn tick(&mut self) {
        self.flight_time += TICK_SECONDS;
        let (x, y) = self.position();

        self.ticks += 1;
        self.log.push(vec![self.flight_time.into(), x.into(), y.into()]);

        if y < 0.0 {
            // Landed: relaunch with the current parameters
            self.flight_time = 0.0;
            self.flights += 1;
            self.path.clear();
        } else {
            self.path.push((x, y));
        }
    }

    fn reset(&mut self) {
        *self = Self::new();
    }

    fn log(&self) -> &DataLog {
        &self.log
    }

    fn render(&self, viewport: Viewport) -> Scene {
        let unit = viewport.unit();
        let origin = viewport.at(0.05, 0.95);
        let to_screen = |(x, y): (f64, f64)| origin + Vec2::new(x as f32, -(y as f32)) * unit;

        let mut scene = Scene::new(viewport);
        scene.push(Shape::line(
            Vec2::new(0.0, origin.y),
            Vec2::new(viewport.width, origin.y),
            Stroke::new(colors::GROUND, 2.0 * unit),
        ));
        if self.path.len() > 1 {
            scene.push(Shape::Polyline {
                points: self.path.iter().copied().map(to_screen).collect(),
                stroke: Stroke::new(colors::TRAJECTORY, 2.0 * unit),
            });
        }
        let prediction = self.prediction();
        if prediction.len() > 1 {
            scene.push(Shape::Polyline {
                points: prediction.into_iter().map(to_screen).collect(),
                stroke: Stroke::new(colors::PREDICTION, 1.0 * unit),
            });
        }
        scene.push(Shape::disc(to_screen(self.position()), BALL_RADIUS * unit, colors::PROJECTILE));
        scene
    }

    fn status(&self) -> String {
        let (x, y) = self.position();
        format!(
            "t = {:.3} s | x = {:.2} m | y = {:.2} m | flights: {}",
            self.flight_time, x, y, self.flights
        )
    }

    fn snapshot(&self) -> serde_json::Value {
        let (x, y) = self.position();
        json!({
            "kind": self.kind().id(),
            "params": self.params,
            "state": {
                "flight_time": self.flight_time,
                "flights": self.flights,
                "x": x,
                "y": y,
                "time": elapsed(self.ticks),
            },
            "records": self.log.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Cell;

    #[test]
    fn test_position_formula() {
        let p = ProjectileParams::default();
        let (x, y) = p.position_at(1.0);
        let v = 50.0 * std::f64::consts::FRAC_1_SQRT_2;
        assert!((x - v).abs() < 1e-9);
        assert!((y - (v - 4.9)).abs() < 1e-9);
    }

    #[test]
    fn test_tick_advances_and_logs() {
        let mut p = Projectile::new();
        p.tick();
        assert!((p.flight_time - 0.016).abs() < 1e-12);
        assert_eq!(p.log().len(), 1);
        assert_eq!(p.log().records()[0][0], Cell::Number(0.016));
        assert_eq!(p.path().len(), 1);
    }

    #[test]
    fn test_landing_restarts_flight_without_touching_log() {
        let mut p = Projectile::new();
        p.set_param("speed", 10.0).unwrap();
        p.set_param("gravity", 20.0).unwrap();
        // Time of flight: 2·v·sinφ/g ≈ 0.707 s ≈ 45 ticks
        let mut ticks = 0;
        while p.flights == 0 {
            p.tick();
            ticks += 1;
            assert!(ticks < 200, "projectile never landed");
        }
        assert_eq!(p.flight_time, 0.0);
        assert!(p.path().is_empty());
        assert_eq!(p.log().len(), ticks);
        // The landing record is kept and lies below ground
        let last_y = p.log().last().and_then(|r| r[2].as_f64()).unwrap();
        assert!(last_y < 0.0);

        // The next flight starts its clock again
        p.tick();
        assert_eq!(p.log().last().map(|r| r[0].clone()), Some(Cell::Number(0.016)));
    }

    #[test]
    fn test_flat_launch_lands_immediately() {
        let mut p = Projectile::new();
        p.set_param("angle", 0.0).unwrap();
        p.tick();
        assert_eq!(p.flights, 1);
    }

    #[test]
    fn test_prediction_stays_above_ground() {
        let mut p = Projectile::new();
        for _ in 0..30 {
            p.tick();
        }
        let prediction = p.prediction();
        assert!(!prediction.is_empty());
        assert!(prediction.iter().all(|&(_, y)| y >= 0.0));
        assert!(prediction.len() <= 500);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut p = Projectile::new();
        p.set_param("angle", 80.0).unwrap();
        for _ in 0..1000 {
            p.tick();
        }
        p.reset();
        assert_eq!(p.params, ProjectileParams::default());
        assert_eq!(p.flight_time, 0.0);
        assert_eq!(p.flights, 0);
        assert!(p.log().is_empty());
    }
}
