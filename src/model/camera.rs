use glam::{Mat4, Vec3};

/// Fixed perspective camera looking at the play field
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            eye: Vec3::new(0.0, 30.0, 170.0),
            target: Vec3::new(0.0, 25.0, 0.0),
            up: Vec3::Y,
            fov_y: 50f32.to_radians(),
            aspect: width as f32 / height.max(1) as f32,
            z_near: 1.0,
            z_far: 1000.0,
        }
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn view_proj(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye, self.target, self.up);
        let proj = Mat4::perspective_rh(self.fov_y, self.aspect, self.z_near, self.z_far);
        proj * view
    }
}
