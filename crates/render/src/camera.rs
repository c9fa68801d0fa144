use glam::{Mat4, Vec2, Vec3};
use splitcube_common::Ray;

/// Perspective camera looking at a fixed target, plus the viewport it
/// projects onto. Camera motion is outside the engine's concern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Viewport size in pixels.
    pub viewport: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(8.0, 8.0, 8.0),
            target: Vec3::ZERO,
            fov: 75.0_f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            viewport: Vec2::new(800.0, 600.0),
        }
    }
}

impl Camera {
    pub fn aspect(&self) -> f32 {
        self.viewport.x / self.viewport.y.max(1.0)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect(), self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Pixel coordinates (origin top-left, y down) to normalized device
    /// coordinates (origin center, y up).
    pub fn screen_to_ndc(&self, screen_x: f32, screen_y: f32) -> Vec2 {
        Vec2::new(
            screen_x / self.viewport.x * 2.0 - 1.0,
            -(screen_y / self.viewport.y * 2.0 - 1.0),
        )
    }

    /// Unproject an NDC point into a ray from the near plane toward the far
    /// plane.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection().inverse();
        let near = inverse.project_point3(ndc.extend(0.0));
        let far = inverse.project_point3(ndc.extend(1.0));
        Ray::new(near, far - near)
    }

    pub fn ray_from_screen(&self, screen_x: f32, screen_y: f32) -> Ray {
        self.ray_from_ndc(self.screen_to_ndc(screen_x, screen_y))
    }
}
