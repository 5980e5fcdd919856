//! Geometric utilities for inter-segment angle computations.

use nalgebra::Vector3;

use crate::types::Point3;

/// Norm below which a direction vector is treated as degenerate.
pub const DEGENERATE_NORM: f64 = 1e-10;

/// Angle between two direction vectors in degrees, `None` when either
/// vector is too short to define a direction.
///
/// The dot product of the unit vectors is clamped to [-1, 1] to guard
/// against floating-point overshoot before `acos`.
pub fn direction_angle_deg(v1: &Vector3<f64>, v2: &Vector3<f64>) -> Option<f64> {
    let n1 = v1.norm();
    let n2 = v2.norm();
    if n1 < DEGENERATE_NORM || n2 < DEGENERATE_NORM {
        return None;
    }

    let dot = (v1 / n1).dot(&(v2 / n2)).clamp(-1.0, 1.0);
    Some(dot.acos().to_degrees())
}

/// Angle between segment (p1 -> p2) and segment (p3 -> p4) in degrees.
pub fn segment_angle_deg(p1: &Point3, p2: &Point3, p3: &Point3, p4: &Point3) -> Option<f64> {
    direction_angle_deg(&p1.direction_to(p2), &p3.direction_to(p4))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orthogonal_unit_vectors() {
        let v1 = Vector3::new(1.0, 0.0, 0.0);
        let v2 = Vector3::new(0.0, 1.0, 0.0);
        let angle = direction_angle_deg(&v1, &v2).unwrap();
        assert!((angle - 90.0).abs() < 1e-10);
    }

    #[test]
    fn test_parallel_and_antiparallel() {
        let v1 = Vector3::new(0.3, -0.2, 0.9);
        assert!(direction_angle_deg(&v1, &v1).unwrap().abs() < 1e-6);
        assert!((direction_angle_deg(&v1, &(-v1)).unwrap() - 180.0).abs() < 1e-6);
    }

    #[test]
    fn test_scale_invariance() {
        let v1 = Vector3::new(1.0, 2.0, 3.0);
        let v2 = Vector3::new(-2.0, 0.5, 1.0);
        let a = direction_angle_deg(&v1, &v2).unwrap();
        let b = direction_angle_deg(&(v1 * 250.0), &(v2 * 0.004)).unwrap();
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_vector_is_none() {
        let v1 = Vector3::new(0.0, 0.0, 0.0);
        let v2 = Vector3::new(1.0, 0.0, 0.0);
        assert!(direction_angle_deg(&v1, &v2).is_none());
    }

    #[test]
    fn test_segment_angle_from_points() {
        let p1 = Point3::origin();
        let p2 = Point3::new(0.0, 0.0, 1.0);
        let p3 = Point3::new(5.0, 5.0, 5.0);
        let p4 = Point3::new(6.0, 5.0, 5.0);
        let angle = segment_angle_deg(&p1, &p2, &p3, &p4).unwrap();
        assert!((angle - 90.0).abs() < 1e-10);
    }
}
