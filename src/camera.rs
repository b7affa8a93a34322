//! Projection for the screen and for the render target.
//!
//! The demo uses a left handed coordinate system (+Z into the screen) and the
//! [0, 1] depth range wgpu expects, so the projection can be used directly
//! without a conversion matrix.

use cgmath::{Matrix4, Rad};

/// Field of view shared by both projections.
pub const FOV_Y: cgmath::Deg<f32> = cgmath::Deg(45.0);
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 100.0;

/// Left handed perspective projection mapping `near` to depth 0 and `far` to 1.
pub fn perspective_lh(aspect: f32, near: f32, far: f32, fov_y: Rad<f32>) -> Matrix4<f32> {
    let f = 1.0 / (fov_y.0 / 2.0).tan();
    let depth = far / (far - near);
    #[rustfmt::skip]
    let m = Matrix4::new(
        f / aspect, 0.0, 0.0,            0.0,
        0.0,        f,   0.0,            0.0,
        0.0,        0.0, depth,          1.0,
        0.0,        0.0, -near * depth,  0.0,
    );
    m
}

/// Screen projection that follows the window aspect ratio.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width.max(1) as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        perspective_lh(self.aspect, self.znear, self.zfar, self.fovy)
    }
}

/// Square projection used while rendering into the render target.
pub fn render_target_projection() -> Matrix4<f32> {
    perspective_lh(1.0, Z_NEAR, Z_FAR, FOV_Y.into())
}
