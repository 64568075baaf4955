//! Water plane mesh displaced on the CPU every frame.

use bytemuck::{Pod, Zeroable};

use super::waves::{slope_normal, WaveField};
use crate::params::WaveParameters;

/// Vertex data for the water mesh (displaced position, elevation, normal)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub elevation: f32,
    pub normal: [f32; 3],
    pub _padding: f32,
}

/// Square grid in the XZ plane, centred on the origin
pub struct WaterGrid {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    segments: usize,
    spacing: f32,
}

impl WaterGrid {
    /// Create a flat grid `size` units wide with `segments` quads per side
    pub fn new(size: f32, segments: usize) -> Self {
        let segments = segments.max(1);
        let spacing = size / segments as f32;
        let half_size = size / 2.0;

        let mut vertices = Vec::with_capacity((segments + 1) * (segments + 1));
        let mut indices = Vec::with_capacity(segments * segments * 6);

        // Generate flat XZ plane grid
        for z in 0..=segments {
            for x in 0..=segments {
                vertices.push(Vertex {
                    position: [
                        x as f32 * spacing - half_size,
                        0.0,
                        z as f32 * spacing - half_size,
                    ],
                    elevation: 0.0,
                    normal: [0.0, 1.0, 0.0],
                    _padding: 0.0,
                });
            }
        }

        // Generate triangle indices (counter-clockwise winding seen from above)
        for z in 0..segments {
            for x in 0..segments {
                let top_left = (z * (segments + 1) + x) as u32;
                let top_right = top_left + 1;
                let bottom_left = ((z + 1) * (segments + 1) + x) as u32;
                let bottom_right = bottom_left + 1;

                indices.extend_from_slice(&[
                    top_left,
                    bottom_left,
                    top_right,
                    top_right,
                    bottom_left,
                    bottom_right,
                ]);
            }
        }

        Self {
            vertices,
            indices,
            segments,
            spacing,
        }
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    /// Distance between neighbouring vertices
    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Run the displacement stage over every vertex
    ///
    /// Each vertex is lifted along +Y by the elevation at its planar position,
    /// then normals are rebuilt from the neighbouring elevations.
    pub fn displace(&mut self, field: &WaveField, params: &WaveParameters, time_s: f32) {
        for vertex in &mut self.vertices {
            let [x, _, z] = vertex.position;
            let elevation = field.elevation(x, z, time_s, params);
            vertex.position[1] = elevation;
            vertex.elevation = elevation;
        }

        self.rebuild_normals();
    }

    /// Central differences inside the grid, one-sided along the border
    fn rebuild_normals(&mut self) {
        let row = self.segments + 1;
        let last = self.segments;

        for z in 0..row {
            for x in 0..row {
                let (x0, x1) = (x.saturating_sub(1), (x + 1).min(last));
                let (z0, z1) = (z.saturating_sub(1), (z + 1).min(last));

                let height = |gx: usize, gz: usize| self.vertices[gz * row + gx].elevation;
                let dx = height(x1, z) - height(x0, z);
                let dz = height(x, z1) - height(x, z0);

                // Border rows span one cell, interior rows span two
                let span_x = (x1 - x0) as f32 * self.spacing;
                let span_z = (z1 - z0) as f32 * self.spacing;
                let normal = slope_normal(dx * span_z / span_x, dz, span_z);

                self.vertices[z * row + x].normal = normal.to_array();
            }
        }
    }
}
