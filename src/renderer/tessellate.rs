//! Triangle tessellation of scene shapes
//!
//! Produces a flat triangle list suitable for a single vertex buffer.
//! Text is skipped; labels are rasterised by the host.

use glam::Vec2;
use std::f32::consts::TAU;

use super::shapes::{Scene, Shape, Stroke};
use super::vertex::{Color, Vertex};

/// Segments used for a full circle
const CIRCLE_SEGMENTS: u32 = 32;

/// Tessellate every shape of a scene, in paint order
pub fn tessellate(scene: &Scene) -> Vec<Vertex> {
    let mut out = Vec::new();
    for shape in &scene.shapes {
        tessellate_shape(shape, &mut out);
    }
    out
}

fn tessellate_shape(shape: &Shape, out: &mut Vec<Vertex>) {
    match shape {
        Shape::Line { from, to, stroke } => thick_line(*from, *to, *stroke, out),
        Shape::Circle {
            center,
            radius,
            fill,
            stroke,
        } => {
            let radii = Vec2::splat(*radius);
            if let Some(color) = fill {
                ellipse_fan(*center, radii, *color, out);
            }
            if let Some(stroke) = stroke {
                ellipse_ring(*center, radii, *stroke, out);
            }
        }
        Shape::Ellipse {
            center,
            radii,
            fill,
            stroke,
        } => {
            if let Some(color) = fill {
                ellipse_fan(*center, *radii, *color, out);
            }
            if let Some(stroke) = stroke {
                ellipse_ring(*center, *radii, *stroke, out);
            }
        }
        Shape::Rect {
            min,
            size,
            fill,
            stroke,
        } => {
            let max = *min + *size;
            if let Some(color) = fill {
                quad(*min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y), *color, out);
            }
            if let Some(stroke) = stroke {
                let corners = [*min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y), *min];
                for pair in corners.windows(2) {
                    thick_line(pair[0], pair[1], *stroke, out);
                }
            }
        }
        Shape::Polyline { points, stroke } => {
            for pair in points.windows(2) {
                thick_line(pair[0], pair[1], *stroke, out);
            }
        }
        Shape::Text { .. } => {}
    }
}

fn quad(a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: Color, out: &mut Vec<Vertex>) {
    // Two triangles
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));

    out.push(Vertex::new(c.x, c.y, color));
    out.push(Vertex::new(d.x, d.y, color));
    out.push(Vertex::new(a.x, a.y, color));
}

/// Line segment as a quad of the stroke width
fn thick_line(from: Vec2, to: Vec2, stroke: Stroke, out: &mut Vec<Vertex>) {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (stroke.width * 0.5);
    quad(from + perp, to + perp, to - perp, from - perp, stroke.color, out);
}

fn ellipse_point(center: Vec2, radii: Vec2, theta: f32) -> Vec2 {
    Vec2::new(center.x + radii.x * theta.cos(), center.y + radii.y * theta.sin())
}

/// Filled ellipse as a triangle fan
fn ellipse_fan(center: Vec2, radii: Vec2, color: Color, out: &mut Vec<Vertex>) {
    for i in 0..CIRCLE_SEGMENTS {
        let theta1 = (i as f32 / CIRCLE_SEGMENTS as f32) * TAU;
        let theta2 = ((i + 1) as f32 / CIRCLE_SEGMENTS as f32) * TAU;
        let p1 = ellipse_point(center, radii, theta1);
        let p2 = ellipse_point(center, radii, theta2);

        // Triangle from center to edge
        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(p1.x, p1.y, color));
        out.push(Vertex::new(p2.x, p2.y, color));
    }
}

/// Ellipse outline as a band of the stroke width
fn ellipse_ring(center: Vec2, radii: Vec2, stroke: Stroke, out: &mut Vec<Vertex>) {
    let half = stroke.width * 0.5;
    let inner = (radii - Vec2::splat(half)).max(Vec2::ZERO);
    let outer = radii + Vec2::splat(half);

    for i in 0..CIRCLE_SEGMENTS {
        let theta1 = (i as f32 / CIRCLE_SEGMENTS as f32) * TAU;
        let theta2 = ((i + 1) as f32 / CIRCLE_SEGMENTS as f32) * TAU;

        let inner1 = ellipse_point(center, inner, theta1);
        let outer1 = ellipse_point(center, outer, theta1);
        let inner2 = ellipse_point(center, inner, theta2);
        let outer2 = ellipse_point(center, outer, theta2);

        quad(inner1, outer1, outer2, inner2, stroke.color, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::shapes::Viewport;
    use crate::renderer::vertex::colors;

    fn scene_of(shape: Shape) -> Scene {
        let mut scene = Scene::new(Viewport::default());
        scene.push(shape);
        scene
    }

    #[test]
    fn test_line_is_one_quad() {
        let stroke = Stroke::new(colors::INK, 2.0);
        let verts = tessellate(&scene_of(Shape::line(Vec2::ZERO, Vec2::new(10.0, 0.0), stroke)));
        assert_eq!(verts.len(), 6);
        // Width extends one unit each side of the centerline
        assert!(verts.iter().all(|v| v.position[1].abs() <= 1.0 + 1e-6));
    }

    #[test]
    fn test_zero_length_line_is_skipped() {
        let stroke = Stroke::new(colors::INK, 2.0);
        let verts = tessellate(&scene_of(Shape::line(Vec2::ONE, Vec2::ONE, stroke)));
        assert!(verts.is_empty());
    }

    #[test]
    fn test_filled_circle_fan() {
        let verts = tessellate(&scene_of(Shape::disc(Vec2::ZERO, 5.0, colors::BOB)));
        assert_eq!(verts.len(), (CIRCLE_SEGMENTS * 3) as usize);
        assert!(verts.iter().all(|v| Vec2::from(v.position).length() <= 5.0 + 1e-4));
    }

    #[test]
    fn test_text_is_skipped() {
        let verts = tessellate(&scene_of(Shape::text(Vec2::ZERO, "label", 12.0, colors::INK)));
        assert!(verts.is_empty());
    }

    #[test]
    fn test_polyline_segments() {
        let stroke = Stroke::new(colors::WAVE_A, 1.0);
        let points = vec![Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(2.0, 1.0)];
        let verts = tessellate(&scene_of(Shape::Polyline { points, stroke }));
        assert_eq!(verts.len(), 12);
    }
}
