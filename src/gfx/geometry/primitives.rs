//! # Primitive Shape Generation
//!
//! All shapes are Y-up and centered on the origin unless noted. Side
//! normals are true surface normals; caps get axis-aligned normals.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate a capped cylinder (or tapered trunk when the radii differ).
///
/// `radius_top` may be zero, which degenerates the top ring into an apex -
/// [`generate_cone`] uses exactly that.
pub fn generate_cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();
    let segs = segments.max(3);
    let half_height = height / 2.0;

    // Slope of the side wall feeds into the normal's Y component.
    let slope = (radius_bottom - radius_top) / height;

    // Side rings: bottom then top vertex per segment.
    for i in 0..=segs {
        let theta = i as f32 * 2.0 * PI / segs as f32;
        let (sin, cos) = theta.sin_cos();

        let normal = normalize([cos, slope, sin]);

        data.vertices
            .push([radius_bottom * cos, -half_height, radius_bottom * sin]);
        data.normals.push(normal);

        data.vertices
            .push([radius_top * cos, half_height, radius_top * sin]);
        data.normals.push(normal);
    }

    for i in 0..segs {
        let bottom_current = i * 2;
        let top_current = i * 2 + 1;
        let bottom_next = (i + 1) * 2;
        let top_next = (i + 1) * 2 + 1;

        data.indices.push(bottom_current);
        data.indices.push(bottom_next);
        data.indices.push(top_current);

        data.indices.push(top_current);
        data.indices.push(bottom_next);
        data.indices.push(top_next);
    }

    // Caps
    if radius_bottom > 0.0 {
        add_cap(&mut data, radius_bottom, -half_height, segs, false);
    }
    if radius_top > 0.0 {
        add_cap(&mut data, radius_top, half_height, segs, true);
    }

    data
}

/// Generate a cone: a cylinder whose top ring collapses to an apex.
pub fn generate_cone(radius: f32, height: f32, segments: u32) -> GeometryData {
    generate_cylinder(0.0, radius, height, segments)
}

/// Generate a flat disc in the XZ plane with its normal up (+Y).
pub fn generate_disc(radius: f32, segments: u32) -> GeometryData {
    let mut data = GeometryData::new();
    add_cap(&mut data, radius, 0.0, segments.max(3), true);
    data
}

/// Generate a flat ring (annulus) in the XZ plane, facing up. Used for the
/// shoreline highlight around the water disc.
pub fn generate_ring(inner_radius: f32, outer_radius: f32, segments: u32) -> GeometryData {
    let mut data = GeometryData::new();
    let segs = segments.max(3);

    for i in 0..=segs {
        let theta = i as f32 * 2.0 * PI / segs as f32;
        let (sin, cos) = theta.sin_cos();

        data.vertices.push([inner_radius * cos, 0.0, inner_radius * sin]);
        data.normals.push([0.0, 1.0, 0.0]);
        data.vertices.push([outer_radius * cos, 0.0, outer_radius * sin]);
        data.normals.push([0.0, 1.0, 0.0]);
    }

    for i in 0..segs {
        let inner_current = i * 2;
        let outer_current = i * 2 + 1;
        let inner_next = (i + 1) * 2;
        let outer_next = (i + 1) * 2 + 1;

        data.indices.push(inner_current);
        data.indices.push(outer_next);
        data.indices.push(outer_current);

        data.indices.push(inner_current);
        data.indices.push(inner_next);
        data.indices.push(outer_next);
    }

    data
}

/// Fan-triangulated cap at `y`; `facing_up` controls winding and normal.
fn add_cap(data: &mut GeometryData, radius: f32, y: f32, segments: u32, facing_up: bool) {
    let normal = if facing_up { [0.0, 1.0, 0.0] } else { [0.0, -1.0, 0.0] };
    let center = data.vertices.len() as u32;
    data.vertices.push([0.0, y, 0.0]);
    data.normals.push(normal);

    let ring_start = data.vertices.len() as u32;
    for i in 0..=segments {
        let theta = i as f32 * 2.0 * PI / segments as f32;
        let (sin, cos) = theta.sin_cos();
        data.vertices.push([radius * cos, y, radius * sin]);
        data.normals.push(normal);
    }

    for i in 0..segments {
        let current = ring_start + i;
        let next = ring_start + i + 1;
        if facing_up {
            data.indices.push(center);
            data.indices.push(next);
            data.indices.push(current);
        } else {
            data.indices.push(center);
            data.indices.push(current);
            data.indices.push(next);
        }
    }
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let length = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if length > 0.0 {
        [v[0] / length, v[1] / length, v[2] / length]
    } else {
        [0.0, 1.0, 0.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cylinder_counts_add_up() {
        let cylinder = generate_cylinder(0.3, 0.5, 3.0, 8);
        // 8 segments: side quads plus two fan caps.
        assert_eq!(cylinder.triangle_count(), 8 * 2 + 8 + 8);
        assert_eq!(cylinder.vertices.len(), cylinder.normals.len());
    }

    #[test]
    fn cone_has_no_top_cap() {
        let cone = generate_cone(0.2, 1.0, 5);
        assert_eq!(cone.triangle_count(), 5 * 2 + 5);
    }

    #[test]
    fn disc_normals_all_face_up() {
        let disc = generate_disc(40.0, 16);
        assert!(disc.normals.iter().all(|n| *n == [0.0, 1.0, 0.0]));
        assert_eq!(disc.triangle_count(), 16);
    }

    #[test]
    fn ring_vertices_stay_between_the_radii() {
        let ring = generate_ring(35.0, 36.0, 64);
        for v in &ring.vertices {
            let r = (v[0] * v[0] + v[2] * v[2]).sqrt();
            assert!((34.9..=36.1).contains(&r));
        }
    }

    #[test]
    fn into_mesh_preserves_counts() {
        let mesh = generate_cone(0.2, 1.0, 5).into_mesh();
        assert!(mesh.vertex_count > 0);
        assert_eq!(mesh.index_count % 3, 0);
    }
}
