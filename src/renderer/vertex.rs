//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// RGBA, components in 0..1
pub type Color = [f32; 4];

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: Color) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Bytes per vertex in an upload buffer
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
}

/// Raw bytes of a vertex list, ready for a GPU buffer
pub fn vertex_bytes(vertices: &[Vertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

/// Colors for simulation elements
pub mod colors {
    use super::Color;

    pub const BACKGROUND: Color = [1.0, 1.0, 1.0, 1.0];
    pub const INK: Color = [0.0, 0.0, 0.0, 1.0];
    pub const GRID: Color = [0.8, 0.8, 0.8, 1.0];
    pub const BOB: Color = [0.78, 0.0, 0.0, 1.0];
    pub const PROJECTILE: Color = [0.0, 0.0, 1.0, 1.0];
    pub const TRAJECTORY: Color = [0.0, 0.0, 1.0, 0.8];
    pub const PREDICTION: Color = [0.0, 0.78, 0.0, 0.6];
    pub const GROUND: Color = [0.39, 0.39, 0.39, 1.0];
    pub const STAR: Color = [1.0, 0.84, 0.0, 1.0];
    pub const PLANET: Color = [0.0, 0.0, 0.78, 1.0];
    pub const ORBIT: Color = [0.59, 0.59, 0.59, 1.0];
    pub const WAVE_A: Color = [0.0, 0.0, 1.0, 1.0];
    pub const WAVE_B: Color = [0.0, 0.59, 0.0, 1.0];
    pub const WAVE_SUM: Color = [1.0, 0.0, 0.0, 1.0];
    pub const STRING: Color = [0.5, 0.0, 0.5, 1.0];
    pub const BATTERY: Color = [1.0, 0.84, 0.0, 1.0];
    pub const RESISTOR: Color = [0.75, 0.75, 0.75, 1.0];
    pub const LENS: Color = [0.68, 0.85, 0.9, 0.6];
    pub const OBJECT: Color = [0.0, 0.5, 0.0, 1.0];
    pub const IMAGE: Color = [0.78, 0.0, 0.0, 1.0];
    pub const RAY: Color = [1.0, 0.65, 0.0, 1.0];
    pub const GAS: Color = [0.0, 0.0, 0.78, 1.0];
    pub const STATE_MARKER: Color = [1.0, 0.0, 0.0, 1.0];
    pub const COIL: Color = [0.72, 0.45, 0.2, 1.0];
    pub const FIELD: Color = [0.0, 0.0, 1.0, 0.5];
}
