//! The constant buffer contents shared by both cube draws.

use cgmath::{InnerSpace, Matrix4, Rad, SquareMatrix, Vector3};

/// Uniform block uploaded before every draw.
///
/// Layout matches `Settings` in `scene.wgsl`: a column-major matrix followed by
/// the multisample flag, padded to 80 bytes (a multiple of 16).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Settings {
    pub wvp_matrix: [[f32; 4]; 4],
    /// 1 when the fragment shader reads the multisample texture directly.
    pub use_texture_2d_ms: i32,
    // Uniforms require 16 byte alignment of the whole block.
    pub _pad0: [i32; 3],
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            wvp_matrix: Matrix4::identity().into(),
            use_texture_2d_ms: 0,
            _pad0: [0; 3],
        }
    }
}

impl Settings {
    pub fn set_wvp(&mut self, wvp: Matrix4<f32>) {
        self.wvp_matrix = wvp.into();
    }

    pub fn wvp(&self) -> Matrix4<f32> {
        self.wvp_matrix.into()
    }
}

/// Distance between the camera and the cube center along +Z.
pub const MODEL_DISTANCE: f32 = 5.0;

/// `proj * translate(0, 0, 5) * rotate(axis, rotation)`.
///
/// `axis` does not need to be normalized; a zero axis yields NaNs.
pub fn update_model_transform(
    proj: &Matrix4<f32>,
    rotation: f32,
    axis: Vector3<f32>,
) -> Matrix4<f32> {
    proj * Matrix4::from_translation(Vector3::new(0.0, 0.0, MODEL_DISTANCE))
        * Matrix4::from_axis_angle(axis.normalize(), Rad(rotation))
}

/// Negates the output of one clip-space axis (0 = X, 1 = Y, 2 = Z).
///
/// Equivalent to `scale(axis = -1) * m`, so flipping twice is the identity.
pub fn flip_axis(m: &Matrix4<f32>, axis: usize) -> Matrix4<f32> {
    assert!(axis < 3, "axis {axis} is not a spatial axis");
    let mut flipped = *m;
    for column in 0..4 {
        flipped[column][axis] = -flipped[column][axis];
    }
    flipped
}
