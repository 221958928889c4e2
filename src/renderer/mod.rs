//! Rendering module
//!
//! Simulations describe each frame as a `Scene` of 2D primitives. The host
//! either paints the shapes directly or uploads the tessellated triangles.

pub mod shapes;
pub mod tessellate;
pub mod vertex;

pub use shapes::{Scene, Shape, Stroke, Viewport};
pub use tessellate::tessellate;
pub use vertex::{Color, Vertex, colors, vertex_bytes};
