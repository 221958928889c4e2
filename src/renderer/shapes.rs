//! Drawing primitives produced by the simulations
//!
//! Coordinates are viewport pixels with the origin at the top-left corner
//! and y growing downwards.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::vertex::Color;
use crate::consts::REFERENCE_EXTENT;

/// Drawable area handed to `Simulation::render`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    /// Point at fractional coordinates (0..1, 0..1)
    pub fn at(&self, fx: f32, fy: f32) -> Vec2 {
        Vec2::new(self.width * fx, self.height * fy)
    }

    pub fn center(&self) -> Vec2 {
        self.at(0.5, 0.5)
    }

    /// Layout scale: model pixels to viewport pixels
    pub fn unit(&self) -> f32 {
        self.width.min(self.height) / REFERENCE_EXTENT
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Outline style
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

impl Stroke {
    pub const fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }
}

/// A 2D drawing primitive
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Shape {
    Line {
        from: Vec2,
        to: Vec2,
        stroke: Stroke,
    },
    Circle {
        center: Vec2,
        radius: f32,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Ellipse {
        center: Vec2,
        radii: Vec2,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Rect {
        min: Vec2,
        size: Vec2,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Polyline {
        points: Vec<Vec2>,
        stroke: Stroke,
    },
    Text {
        pos: Vec2,
        text: String,
        size: f32,
        color: Color,
    },
}

impl Shape {
    pub fn line(from: Vec2, to: Vec2, stroke: Stroke) -> Self {
        Shape::Line { from, to, stroke }
    }

    pub fn disc(center: Vec2, radius: f32, fill: Color) -> Self {
        Shape::Circle {
            center,
            radius,
            fill: Some(fill),
            stroke: None,
        }
    }

    pub fn ring(center: Vec2, radius: f32, stroke: Stroke) -> Self {
        Shape::Circle {
            center,
            radius,
            fill: None,
            stroke: Some(stroke),
        }
    }

    pub fn text(pos: Vec2, text: impl Into<String>, size: f32, color: Color) -> Self {
        Shape::Text {
            pos,
            text: text.into(),
            size,
            color,
        }
    }
}

/// Ordered list of shapes, painted first to last
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scene {
    pub viewport: Viewport,
    pub shapes: Vec<Shape>,
}

impl Scene {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            shapes: Vec::new(),
        }
    }

    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// All text labels, in paint order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Count shapes matching a predicate
    pub fn count(&self, pred: impl Fn(&Shape) -> bool) -> usize {
        self.shapes.iter().filter(|s| pred(s)).count()
    }
}
