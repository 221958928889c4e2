//! Damped pendulum
//!
//! Exact-sine update with one unit of time per tick:
//! α = −(g/L)·sin θ; ω += α; θ += ω; ω *= damping.
//! The bob can be dragged to set a new release angle.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::f64::consts::FRAC_PI_4;

use super::datalog::{Column, DataLog};
use super::param::ParamSpec;
use super::{SimError, Simulation, elapsed, resolve};
use crate::registry::SimKind;
use crate::renderer::{Scene, Shape, Stroke, Viewport, colors};

/// Release angle at construction/reset (radians)
pub const DEFAULT_ANGLE: f64 = FRAC_PI_4;

/// Bob radius in layout units (also the grab radius)
const BOB_RADIUS: f32 = 15.0;
const PIVOT_RADIUS: f32 = 5.0;

pub const PARAMS: &[ParamSpec] = &[
    ParamSpec::new("gravity", "Gravity", Some("m/s²"), 1.0, 20.0, 9.8),
    ParamSpec::new("length", "Length", Some("px"), 50.0, 300.0, 200.0),
    ParamSpec::new("damping", "Damping", None, 0.900, 0.999, 0.995),
];

pub const COLUMNS: &[Column] = &[
    Column::new("Time", Some("s"), 3),
    Column::new("Angle", Some("rad"), 5),
    Column::new("Angular Velocity", Some("rad/s"), 5),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendulumParams {
    pub gravity: f64,
    pub length: f64,
    pub damping: f64,
}

impl Default for PendulumParams {
    fn default() -> Self {
        Self {
            gravity: PARAMS[0].default,
            length: PARAMS[1].default,
            damping: PARAMS[2].default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Pendulum {
    pub params: PendulumParams,
    /// Angle from vertical (radians)
    pub angle: f64,
    /// Angular velocity (radians per tick)
    pub angular_velocity: f64,
    /// Last computed angular acceleration
    pub angular_acceleration: f64,
    ticks: u64,
    dragging: bool,
    log: DataLog,
}

impl Default for Pendulum {
    fn default() -> Self {
        Self::new()
    }
}

impl Pendulum {
    pub fn new() -> Self {
        Self {
            params: PendulumParams::default(),
            angle: DEFAULT_ANGLE,
            angular_velocity: 0.0,
            angular_acceleration: 0.0,
            ticks: 0,
            dragging: false,
            log: DataLog::new(COLUMNS),
        }
    }

    /// Mechanical energy per unit mass·length², in tick units
    pub fn energy(&self) -> f64 {
        let k = self.params.gravity / self.params.length;
        0.5 * self.angular_velocity * self.angular_velocity + k * (1.0 - self.angle.cos())
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    fn pivot(viewport: Viewport) -> Vec2 {
        viewport.at(0.5, 0.25)
    }

    /// Bob position in viewport pixels
    pub fn bob_position(&self, viewport: Viewport) -> Vec2 {
        let reach = self.params.length as f32 * viewport.unit();
        let angle = self.angle as f32;
        Self::pivot(viewport) + Vec2::new(angle.sin(), angle.cos()) * reach
    }
}

impl Simulation for Pendulum {
    fn kind(&self) -> SimKind {
        SimKind::Pendulum
    }

    fn params(&self) -> &'static [ParamSpec] {
        PARAMS
    }

    fn param(&self, name: &str) -> Option<f64> {
        match name {
            "gravity" => Some(self.params.gravity),
            "length" => Some(self.params.length),
            "damping" => Some(self.params.damping),
            _ => None,
        }
    }

    fn set_param(&mut self, name: &str, value: f64) -> Result<f64, SimError> {
        let value = resolve(self.kind(), PARAMS, name, value)?;
        match name {
            "gravity" => self.params.gravity = value,
            "length" => self.params.length = value,
            _ => self.params.damping = value,
        }
        log::debug!("pendulum: {name} = {value}");
        Ok(value)
    }

    fn is_dynamic(&self) -> bool {
        true
    }

    fn tick(&mut self) {
        let p = &self.params;
        self.angular_acceleration = -(p.gravity / p.length) * self.angle.sin();
        self.angular_velocity += self.angular_acceleration;
        self.angle += self.angular_velocity;
        self.angular_velocity *= p.damping;

        self.log.push(vec![
            elapsed(self.ticks).into(),
            self.angle.into(),
            self.angular_velocity.into(),
        ]);
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
        let pivot = Self::pivot(viewport);
        let bob = self.bob_position(viewport);

        let mut scene = Scene::new(viewport);
        // Rod
        scene.push(Shape::line(pivot, bob, Stroke::new(colors::INK, 2.0 * unit)));
        scene.push(Shape::disc(pivot, PIVOT_RADIUS * unit, colors::INK));
        scene.push(Shape::disc(bob, BOB_RADIUS * unit, colors::BOB));
        scene
    }

    fn status(&self) -> String {
        format!(
            "Angle: {:.3} rad | Angular velocity: {:.4} rad/tick",
            self.angle, self.angular_velocity
        )
    }

    fn snapshot(&self) -> serde_json::Value {
        json!({
            "kind": self.kind().id(),
            "params": self.params,
            "state": {
                "angle": self.angle,
                "angular_velocity": self.angular_velocity,
                "angular_acceleration": self.angular_acceleration,
                "time": elapsed(self.ticks),
            },
            "records": self.log.len(),
        })
    }

    fn grab(&mut self, point: Vec2, viewport: Viewport) -> bool {
        let radius = BOB_RADIUS * viewport.unit();
        if point.distance_squared(self.bob_position(viewport)) <= radius * radius {
            self.dragging = true;
        }
        self.dragging
    }

    fn drag(&mut self, point: Vec2, viewport: Viewport) {
        if !self.dragging {
            return;
        }
        let offset = point - Self::pivot(viewport);
        if offset.y != 0.0 {
            self.angle = f64::from(offset.x).atan2(f64::from(offset.y));
            // Manual placement releases from rest
            self.angular_velocity = 0.0;
        }
    }

    fn release(&mut self) {
        self.dragging = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Cell;
    use proptest::prelude::*;

    #[test]
    fn test_first_tick_matches_hand_computation() {
        let mut p = Pendulum::new();
        p.tick();

        let alpha = -(9.8 / 200.0) * DEFAULT_ANGLE.sin();
        assert!((p.angular_acceleration - (-0.03465)).abs() < 1e-4);
        assert!((p.angular_acceleration - alpha).abs() < 1e-15);
        assert!((p.angle - (DEFAULT_ANGLE + alpha)).abs() < 1e-12);
        assert!((p.angle - 0.7507).abs() < 1e-4);
        assert!((p.angular_velocity - alpha * 0.995).abs() < 1e-15);
    }

    #[test]
    fn test_tick_logs_time_from_zero() {
        let mut p = Pendulum::new();
        p.tick();
        p.tick();
        assert_eq!(p.log().len(), 2);
        let record = &p.log().records()[1];
        assert_eq!(p.log().records()[0][0], Cell::Number(0.0));
        assert_eq!(record[0], Cell::Number(0.016));
        assert_eq!(record[1], Cell::Number(p.angle));
    }

    #[test]
    fn test_param_change_keeps_state() {
        let mut p = Pendulum::new();
        for _ in 0..10 {
            p.tick();
        }
        let angle = p.angle;
        assert_eq!(p.set_param("gravity", 50.0).ok(), Some(20.0));
        assert_eq!(p.angle, angle);
        assert_eq!(p.params.gravity, 20.0);
        assert_eq!(p.set_param("damping", 0.5).ok(), Some(0.9));
    }

    #[test]
    fn test_unknown_param() {
        let mut p = Pendulum::new();
        let err = p.set_param("mass", 1.0).unwrap_err();
        assert!(matches!(err, SimError::UnknownParam { .. }));
        assert!(err.to_string().contains("mass"));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut p = Pendulum::new();
        p.set_param("length", 60.0).unwrap();
        for _ in 0..500 {
            p.tick();
        }
        p.reset();
        assert_eq!(p.params, PendulumParams::default());
        assert_eq!(p.angle, DEFAULT_ANGLE);
        assert_eq!(p.angular_velocity, 0.0);
        assert!(p.log().is_empty());
    }

    #[test]
    fn test_energy_envelope_decays() {
        let mut p = Pendulum::new();
        let mut peaks = Vec::new();
        for _ in 0..10 {
            let mut peak: f64 = 0.0;
            for _ in 0..200 {
                p.tick();
                peak = peak.max(p.energy());
            }
            peaks.push(peak);
        }
        for pair in peaks.windows(2) {
            assert!(pair[1] <= pair[0] + 1e-12, "energy grew: {pair:?}");
        }
    }

    #[test]
    fn test_drag_sets_angle_and_stops_motion() {
        let vp = Viewport::new(500.0, 500.0);
        let mut p = Pendulum::new();
        p.tick();
        let bob = p.bob_position(vp);
        assert!(p.grab(bob + Vec2::new(3.0, 3.0), vp));

        // Straight below the pivot
        let pivot = vp.at(0.5, 0.25);
        p.drag(pivot + Vec2::new(0.0, 100.0), vp);
        assert_eq!(p.angle, 0.0);
        assert_eq!(p.angular_velocity, 0.0);

        // Horizontal drag is ignored (dy = 0)
        p.drag(pivot + Vec2::new(100.0, 0.0), vp);
        assert_eq!(p.angle, 0.0);

        p.release();
        assert!(!p.is_dragging());
    }

    #[test]
    fn test_grab_misses_far_from_bob() {
        let vp = Viewport::new(500.0, 500.0);
        let mut p = Pendulum::new();
        assert!(!p.grab(Vec2::ZERO, vp));
        let before = p.angle;
        p.drag(Vec2::new(10.0, 400.0), vp);
        assert_eq!(p.angle, before);
    }

    #[test]
    fn test_render_layout_scales_with_viewport() {
        let p = Pendulum::new();
        let small = p.bob_position(Viewport::new(500.0, 500.0));
        let large = p.bob_position(Viewport::new(1000.0, 1000.0));
        assert!((large - small * 2.0).length() < 1e-3);
        assert_eq!(p.render(Viewport::default()).len(), 3);
    }

    proptest! {
        #[test]
        fn angle_stays_bounded(
            gravity in 1.0f64..=20.0,
            length in 50.0f64..=300.0,
            damping in 0.900f64..0.999,
            start in -1.5f64..1.5,
        ) {
            let mut p = Pendulum::new();
            p.set_param("gravity", gravity).unwrap();
            p.set_param("length", length).unwrap();
            p.set_param("damping", damping).unwrap();
            p.angle = start;
            for _ in 0..2000 {
                p.tick();
                prop_assert!(p.angle.is_finite());
                prop_assert!(p.angle.abs() < std::f64::consts::PI);
            }
        }
    }
}
