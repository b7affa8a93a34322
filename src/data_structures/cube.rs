//! Geometry of the textured cube shown on screen and inside the render target.

use cgmath::Vector2;

/// Vertex format of the cube: `position: float3, texCoord: float2`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TexturedVertex {
    pub position: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl TexturedVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TexturedVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Texture coordinates are pushed outwards by this factor around the center
/// of each face, so the sampler border becomes visible as a thin frame.
pub const TEX_COORD_SCALE: f32 = 1.05;

/// Faces as [bottom-left, top-left, top-right, bottom-right] seen from outside.
///
/// The coordinate system is left handed (+Z points into the screen), so the
/// corners wind clockwise when a face is looked at from outside the cube.
const FACES: [[[f32; 3]; 4]; 6] = [
    // front (-Z)
    [[-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0], [1.0, -1.0, -1.0]],
    // right (+X)
    [[1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0], [1.0, -1.0, 1.0]],
    // back (+Z)
    [[1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, -1.0, 1.0]],
    // left (-X)
    [[-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0], [-1.0, -1.0, -1.0]],
    // top (+Y)
    [[-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0]],
    // bottom (-Y)
    [[-1.0, -1.0, 1.0], [-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0]],
];

const CORNER_TEX_COORDS: [[f32; 2]; 4] = [[0.0, 1.0], [0.0, 0.0], [1.0, 0.0], [1.0, 1.0]];

/// The 24 vertices (four per face) of a unit cube spanning [-1, 1] on each axis.
pub fn textured_cube_vertices() -> Vec<TexturedVertex> {
    FACES
        .iter()
        .flat_map(|face| {
            face.iter()
                .zip(CORNER_TEX_COORDS.iter())
                .map(|(position, tex_coord)| TexturedVertex {
                    position: *position,
                    tex_coord: *tex_coord,
                })
        })
        .collect()
}

/// Two clockwise triangles per face, 36 indices in total.
pub fn textured_cube_indices() -> Vec<u32> {
    (0..FACES.len() as u32)
        .flat_map(|face| {
            let base = face * 4;
            [base, base + 1, base + 2, base, base + 2, base + 3]
        })
        .collect()
}

/// Scales a texture coordinate by `factor` around the texture center.
pub fn scale_tex_coord(tex_coord: [f32; 2], factor: f32) -> [f32; 2] {
    let center = Vector2::new(0.5, 0.5);
    let scaled = (Vector2::from(tex_coord) - center) * factor + center;
    scaled.into()
}

/// Cube vertices with the texture coordinates enlarged by [`TEX_COORD_SCALE`].
pub fn bordered_cube_vertices() -> Vec<TexturedVertex> {
    let mut vertices = textured_cube_vertices();
    for v in vertices.iter_mut() {
        v.tex_coord = scale_tex_coord(v.tex_coord, TEX_COORD_SCALE);
    }
    vertices
}

