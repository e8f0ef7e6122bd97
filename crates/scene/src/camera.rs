use glam::{Mat4, Vec3};
use std::f32::consts::FRAC_PI_2;

/// Camera circling the origin at a fixed height.
///
/// The orbit phase is the only animated state. It advances only when the
/// viewer is playing, so pausing leaves the camera exactly where it was.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    /// Angle around the Y axis, radians. 0 is +X, pi/2 is +Z.
    pub phase: f32,
    pub radius: f32,
    pub height: f32,
    /// Radians per second.
    pub speed: f32,
    pub target: Vec3,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl OrbitCamera {
    /// Phase the camera returns to on reset: in front of the scene on +Z.
    pub const HOME_PHASE: f32 = FRAC_PI_2;

    pub fn new(radius: f32, height: f32, speed: f32) -> Self {
        Self {
            phase: Self::HOME_PHASE,
            radius,
            height,
            speed,
            target: Vec3::ZERO,
            fov: 75.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(
            self.phase.cos() * self.radius,
            self.height,
            self.phase.sin() * self.radius,
        )
    }

    pub fn advance(&mut self, dt: f32) {
        self.phase = (self.phase + self.speed * dt).rem_euclid(std::f32::consts::TAU);
    }

    pub fn reset(&mut self) {
        self.phase = Self::HOME_PHASE;
    }

    /// Recompute the aspect ratio for a new viewport size.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(15.0, 5.0, 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera() {
        let cam = OrbitCamera::default();
        assert!(cam.position().y > 0.0);
        let vp = cam.view_projection();
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn home_position_is_on_positive_z() {
        let cam = OrbitCamera::default();
        let p = cam.position();
        assert!(p.x.abs() < 1e-5);
        assert!((p.z - 15.0).abs() < 1e-5);
    }

    #[test]
    fn advance_orbits_at_constant_distance() {
        let mut cam = OrbitCamera::default();
        let start = cam.position();
        cam.advance(1.0);
        let moved = cam.position();
        assert_ne!(moved, start);
        let flat = |v: Vec3| Vec3::new(v.x, 0.0, v.z).length();
        assert!((flat(moved) - flat(start)).abs() < 1e-4);
    }

    #[test]
    fn reset_returns_home() {
        let mut cam = OrbitCamera::default();
        cam.advance(3.0);
        cam.reset();
        assert_eq!(cam.phase, OrbitCamera::HOME_PHASE);
    }

    #[test]
    fn viewport_guards_zero_height() {
        let mut cam = OrbitCamera::default();
        cam.set_viewport(800, 0);
        assert_eq!(cam.aspect, 800.0);
        cam.set_viewport(1280, 720);
        assert!((cam.aspect - 16.0 / 9.0).abs() < 1e-6);
    }
}
