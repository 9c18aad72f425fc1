//! Coordinate and color types shared between the render layer and scene code.
//!
//! Canonical CPU space:
//! - normalized device units, `[-1, 1]` on X and Y
//! - +X right, +Y up, Z toward the viewer
//!
//! Shaders apply the fixed orthographic projection on top of this.

mod color;
mod vec3;

pub use color::ColorRgba;
pub use vec3::Vec3;
