//! Line-segment geometry: terrain wireframes and helper overlays.

use glam::Vec3;

use crate::vertex_format::LineVertex;

/// Unconnected line segments, two vertices per segment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineSet {
    vertices: Vec<LineVertex>,
}

impl LineSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the segment `a -> b`.
    pub fn push_segment(&mut self, a: Vec3, b: Vec3, color: [f32; 4]) {
        self.push_gradient(a, color, b, color);
    }

    /// Append a segment with a different color at each end.
    pub fn push_gradient(&mut self, a: Vec3, color_a: [f32; 4], b: Vec3, color_b: [f32; 4]) {
        self.vertices.push(LineVertex::new(a, color_a));
        self.vertices.push(LineVertex::new(b, color_b));
    }

    pub fn vertices(&self) -> &[LineVertex] {
        &self.vertices
    }

    pub fn segment_count(&self) -> usize {
        self.vertices.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Every undirected edge of a triangle list exactly once, as `(low, high)`
/// index pairs in ascending order.
pub fn unique_edges(indices: &[u32]) -> Vec<(u32, u32)> {
    let mut edges: Vec<(u32, u32)> = indices
        .chunks_exact(3)
        .flat_map(|t| [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])])
        .map(|(a, b)| (a.min(b), a.max(b)))
        .collect();
    edges.sort_unstable();
    edges.dedup();
    edges
}

/// Three axis lines from the origin, each `size` long: X red, Y green, Z blue,
/// fading slightly toward the tip.
pub fn axes_helper(size: f32) -> LineSet {
    let mut lines = LineSet::new();
    lines.push_gradient(
        Vec3::ZERO,
        [1.0, 0.0, 0.0, 1.0],
        Vec3::X * size,
        [1.0, 0.6, 0.0, 1.0],
    );
    lines.push_gradient(
        Vec3::ZERO,
        [0.0, 1.0, 0.0, 1.0],
        Vec3::Y * size,
        [0.6, 1.0, 0.0, 1.0],
    );
    lines.push_gradient(
        Vec3::ZERO,
        [0.0, 0.0, 1.0, 1.0],
        Vec3::Z * size,
        [0.0, 0.6, 1.0, 1.0],
    );
    lines
}

/// A small three-axis cross marking a point light.
pub fn light_marker(position: Vec3, size: f32, color: [f32; 4]) -> LineSet {
    let mut lines = LineSet::new();
    for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
        lines.push_segment(position - axis * size, position + axis * size, color);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_edges_of_two_triangles() {
        // Quad split along 1-2: five unique edges.
        let edges = unique_edges(&[0, 2, 1, 2, 3, 1]);
        assert_eq!(edges, vec![(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn test_unique_edges_empty() {
        assert!(unique_edges(&[]).is_empty());
    }

    #[test]
    fn test_axes_helper_lengths() {
        let axes = axes_helper(30.0);
        assert_eq!(axes.segment_count(), 3);
        let v = axes.vertices();
        assert_eq!(v[1].position, [30.0, 0.0, 0.0]);
        assert_eq!(v[3].position, [0.0, 30.0, 0.0]);
        assert_eq!(v[5].position, [0.0, 0.0, 30.0]);
    }

    #[test]
    fn test_light_marker_is_centred() {
        let marker = light_marker(Vec3::new(0.0, 40.0, 30.0), 0.25, [1.0; 4]);
        assert_eq!(marker.segment_count(), 3);
        for pair in marker.vertices().chunks_exact(2) {
            let mid = (Vec3::from(pair[0].position) + Vec3::from(pair[1].position)) / 2.0;
            assert_eq!(mid, Vec3::new(0.0, 40.0, 30.0));
        }
    }
}
