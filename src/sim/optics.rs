//! Thin converging lens
//!
//! Image distance from the lens formula 1/f = 1/d_o + 1/d_i. An object at
//! the focal point images at infinity. Negative image distances are virtual
//! images on the object side.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::datalog::{Column, DataLog};
use super::param::ParamSpec;
use super::quantity::Quantity;
use super::{SimError, Simulation, resolve};
use crate::registry::SimKind;
use crate::renderer::{Scene, Shape, Stroke, Viewport, colors};

/// Object arrow height (layout units)
const OBJECT_HEIGHT: f32 = 50.0;
const LENS_HALF_HEIGHT: f32 = 100.0;
const LENS_HALF_WIDTH: f32 = 20.0;

pub const PARAMS: &[ParamSpec] = &[
    ParamSpec::new("focal_length", "Focal Length", Some("px"), 10.0, 100.0, 50.0),
    ParamSpec::new("object_distance", "Object Distance", Some("px"), 10.0, 300.0, 150.0),
];

pub const COLUMNS: &[Column] = &[
    Column::new("Object Distance", Some("px"), 1),
    Column::new("Image Distance", Some("px"), 2),
];

/// Image distance for an object at `object_distance` from a lens of focal length `focal_length`
pub fn image_distance(focal_length: f64, object_distance: f64) -> Quantity {
    Quantity::ratio(focal_length * object_distance, object_distance - focal_length)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpticsParams {
    pub focal_length: f64,
    pub object_distance: f64,
}

impl Default for OpticsParams {
    fn default() -> Self {
        Self {
            focal_length: PARAMS[0].default,
            object_distance: PARAMS[1].default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Optics {
    pub params: OpticsParams,
    image: Quantity,
    log: DataLog,
}

impl Default for Optics {
    fn default() -> Self {
        Self::new()
    }
}

impl Optics {
    pub fn new() -> Self {
        let params = OpticsParams::default();
        Self {
            params,
            image: image_distance(params.focal_length, params.object_distance),
            log: DataLog::new(COLUMNS),
        }
    }

    pub fn image_distance(&self) -> Quantity {
        self.image
    }

    /// Lateral magnification −d_i/d_o (infinite at the focal point)
    pub fn magnification(&self) -> Quantity {
        match self.image {
            Quantity::Finite(di) => Quantity::from_f64(-di / self.params.object_distance),
            Quantity::Infinite => Quantity::Infinite,
        }
    }

    fn recompute(&mut self) {
        self.image = image_distance(self.params.focal_length, self.params.object_distance);
        self.log
            .push(vec![self.params.object_distance.into(), self.image.into()]);
    }
}

impl Simulation for Optics {
    fn kind(&self) -> SimKind {
        SimKind::Optics
    }

    fn params(&self) -> &'static [ParamSpec] {
        PARAMS
    }

    fn param(&self, name: &str) -> Option<f64> {
        match name {
            "focal_length" => Some(self.params.focal_length),
            "object_distance" => Some(self.params.object_distance),
            _ => None,
        }
    }

    fn set_param(&mut self, name: &str, value: f64) -> Result<f64, SimError> {
        let value = resolve(self.kind(), PARAMS, name, value)?;
        match name {
            "focal_length" => self.params.focal_length = value,
            _ => self.params.object_distance = value,
        }
        self.recompute();
        log::debug!("optics: {name} = {value} -> d_i = {}", self.image);
        Ok(value)
    }

    fn is_dynamic(&self) -> bool {
        false
    }

    fn tick(&mut self) {}

    fn reset(&mut self) {
        *self = Self::new();
        log::info!("optics: reset to defaults");
    }

    fn log(&self) -> &DataLog {
        &self.log
    }

    fn render(&self, viewport: Viewport) -> Scene {
        let unit = viewport.unit();
        let lens = viewport.center();
        let thin = Stroke::new(colors::INK, 1.0 * unit);
        let arrow = 3.0 * unit;
        let f = self.params.focal_length as f32 * unit;

        let mut scene = Scene::new(viewport);
        // Principal axis
        scene.push(Shape::line(
            Vec2::new(0.0, lens.y),
            Vec2::new(viewport.width, lens.y),
            thin,
        ));
        scene.push(Shape::Ellipse {
            center: lens,
            radii: Vec2::new(LENS_HALF_WIDTH, LENS_HALF_HEIGHT) * unit,
            fill: Some(colors::LENS),
            stroke: Some(thin),
        });
        // Focal points
        for x in [lens.x - f, lens.x + f] {
            scene.push(Shape::disc(Vec2::new(x, lens.y), 3.0 * unit, colors::INK));
        }

        let object_base = Vec2::new(lens.x - self.params.object_distance as f32 * unit, lens.y);
        let object_tip = object_base - Vec2::new(0.0, OBJECT_HEIGHT * unit);
        scene.push(Shape::line(object_base, object_tip, Stroke::new(colors::OBJECT, arrow)));

        let ray = Stroke::new(colors::RAY, 1.0 * unit);
        let lens_hit = Vec2::new(lens.x, object_tip.y);
        scene.push(Shape::line(object_tip, lens_hit, ray));
        match (self.image, self.magnification()) {
            (Quantity::Finite(di), Quantity::Finite(m)) => {
                let image_base = Vec2::new(lens.x + di as f32 * unit, lens.y);
                let image_tip = image_base - Vec2::new(0.0, OBJECT_HEIGHT * m as f32 * unit);
                scene.push(Shape::line(image_base, image_tip, Stroke::new(colors::IMAGE, arrow)));
                // Parallel ray refracts through the far focus; chief ray passes the centre
                scene.push(Shape::line(lens_hit, image_tip, ray));
                scene.push(Shape::line(object_tip, image_tip, ray));
            }
            _ => {
                // Rays leave parallel: no image
                let far_focus = Vec2::new(lens.x + f, lens.y);
                let dir = (far_focus - lens_hit).normalize_or_zero();
                scene.push(Shape::line(lens_hit, lens_hit + dir * viewport.width, ray));
            }
        }

        scene.push(Shape::text(
            viewport.at(0.05, 0.08),
            self.status(),
            14.0 * unit,
            colors::INK,
        ));
        scene
    }

    fn status(&self) -> String {
        match self.image {
            Quantity::Finite(di) => format!("Image Distance: {di:.2} px"),
            Quantity::Infinite => "Image Distance: ∞".to_string(),
        }
    }

    fn snapshot(&self) -> serde_json::Value {
        json!({
            "kind": self.kind().id(),
            "params": self.params,
            "state": {
                "image_distance": self.image,
                "magnification": self.magnification(),
            },
            "records": self.log.len(),
        })
    }
}
