use std::ops::Sub;

/// 3D position with `f32` components (the vertex attribute format).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0, z: 0.0 }
    }

    /// Point on the XY circle of `radius` at `angle` radians, measured from +Y
    /// toward +X (`x = r·sin`, `y = r·cos`).
    ///
    /// Computed in `f64` and narrowed once so large phases keep their precision.
    #[inline]
    pub fn on_circle(radius: f64, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new((radius * sin) as f32, (radius * cos) as f32, 0.0)
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    #[inline]
    pub fn distance(self, other: Vec3) -> f32 {
        let d = self - other;
        (d.x * d.x + d.y * d.y + d.z * d.z).sqrt()
    }

}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}
