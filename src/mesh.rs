// mesh.rs - CPU-side quads for orb planes and their border / glow frames
// 平面位于本地 XY，法线 +Z（朝外）

#[derive(Debug, Clone)]
pub struct QuadMesh {
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl QuadMesh {
    fn with_capacity(quads: usize) -> Self {
        Self {
            positions: Vec::with_capacity(quads * 4),
            uvs: Vec::with_capacity(quads * 4),
            indices: Vec::with_capacity(quads * 6),
        }
    }

    /// Axis-aligned rectangle `[x0, x1] x [y0, y1]` at z = 0.
    fn push_rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, uv: [[f32; 2]; 4]) {
        let a = self.positions.len() as u32;
        self.positions.extend_from_slice(&[[x0, y0, 0.0], [x1, y0, 0.0], [x1, y1, 0.0], [x0, y1, 0.0]]);
        self.uvs.extend_from_slice(&uv);
        self.indices.extend_from_slice(&[a, a + 1, a + 2, a, a + 2, a + 3]);
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Centered `width x height` plane. v is flipped so image row 0 is at the top.
pub fn build_plane(width: f32, height: f32) -> QuadMesh {
    let (hw, hh) = (width * 0.5, height * 0.5);
    let mut mesh = QuadMesh::with_capacity(1);
    mesh.push_rect(-hw, -hh, hw, hh, [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]]);
    mesh
}

/// Rectangular outline hugging a `width x height` plane from the outside,
/// `thickness` wide. Four quads, no overlap at the corners.
pub fn build_frame(width: f32, height: f32, thickness: f32) -> QuadMesh {
    let (hw, hh) = (width * 0.5, height * 0.5);
    let t = thickness.max(0.0);
    let uv = [[0.0, 0.0]; 4];

    let mut mesh = QuadMesh::with_capacity(4);
    // top / bottom span the full outer width
    mesh.push_rect(-hw - t, hh, hw + t, hh + t, uv);
    mesh.push_rect(-hw - t, -hh - t, hw + t, -hh, uv);
    // left / right fill between them
    mesh.push_rect(-hw - t, -hh, -hw, hh, uv);
    mesh.push_rect(hw, -hh, hw + t, hh, uv);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_spans_requested_size() {
        let m = build_plane(1.2, 0.8);
        let xs: Vec<f32> = m.positions.iter().map(|p| p[0]).collect();
        let ys: Vec<f32> = m.positions.iter().map(|p| p[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 0.6);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), -0.4);
        assert_eq!(m.triangle_count(), 2);
    }

    #[test]
    fn frame_stays_outside_the_plane() {
        let m = build_frame(1.0, 1.0, 0.1);
        assert_eq!(m.triangle_count(), 8);
        for p in &m.positions {
            let outside = p[0].abs() >= 0.5 - 1e-6 || p[1].abs() >= 0.5 - 1e-6;
            assert!(outside, "{p:?}");
        }
    }
}
