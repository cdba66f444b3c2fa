//! Planar geometry for side-view joint angles.
//!
//! Positions are in image pixel space: x grows to the right, y grows downward.
//! All angles are returned in degrees.

use nalgebra::{Point2, Vector2};

/// Segments shorter than this (pixels) have no defined direction
const MIN_SEGMENT_LENGTH: f64 = 1e-9;

/// Fixed forward axis of the side view (image +x)
pub fn forward_axis() -> Vector2<f64> {
    Vector2::new(1.0, 0.0)
}

/// Unsigned angle between two vectors in [0°, 180°], from the normalized dot product
pub fn angle_between(v1: &Vector2<f64>, v2: &Vector2<f64>) -> Option<f64> {
    let norms = v1.norm() * v2.norm();
    if norms < MIN_SEGMENT_LENGTH {
        return None;
    }
    Some((v1.dot(v2) / norms).clamp(-1.0, 1.0).acos().to_degrees())
}

/// Angle at `vertex` formed by `a`-`vertex`-`c`
pub fn joint_angle(a: &Point2<f64>, vertex: &Point2<f64>, c: &Point2<f64>) -> Option<f64> {
    angle_between(&(a - vertex), &(c - vertex))
}

/// Orientation of the line `from` → `to`, in (-180°, 180°]
pub fn line_orientation(from: &Point2<f64>, to: &Point2<f64>) -> Option<f64> {
    let d = to - from;
    if d.norm() < MIN_SEGMENT_LENGTH {
        return None;
    }
    Some(d.y.atan2(d.x).to_degrees())
}

pub fn midpoint(a: &Point2<f64>, b: &Point2<f64>) -> Point2<f64> {
    nalgebra::center(a, b)
}

/// Wrap an angle difference into (-180°, 180°]
pub fn wrap_degrees(angle: f64) -> f64 {
    let mut a = angle % 360.0;
    if a <= -180.0 {
        a += 360.0;
    } else if a > 180.0 {
        a -= 360.0;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_right_angle_at_vertex() {
        let a = Point2::new(0.0, -10.0);
        let vertex = Point2::new(0.0, 0.0);
        let c = Point2::new(10.0, 0.0);
        let angle = joint_angle(&a, &vertex, &c).unwrap();
        assert!((angle - 90.0).abs() < 1e-10);
    }

    #[test]
    fn test_straight_limb_is_180() {
        let angle = joint_angle(
            &Point2::new(0.0, 0.0),
            &Point2::new(0.0, 50.0),
            &Point2::new(0.0, 100.0),
        )
        .unwrap();
        assert!((angle - 180.0).abs() < 1e-10);
    }

    #[test]
    fn test_degenerate_segment_has_no_angle() {
        let p = Point2::new(3.0, 4.0);
        assert!(joint_angle(&p, &p, &Point2::new(0.0, 0.0)).is_none());
        assert!(line_orientation(&p, &p).is_none());
    }

    #[test]
    fn test_wrap_degrees() {
        assert!((wrap_degrees(190.0) + 170.0).abs() < 1e-10);
        assert!((wrap_degrees(-190.0) - 170.0).abs() < 1e-10);
        assert_eq!(wrap_degrees(180.0), 180.0);
        assert_eq!(wrap_degrees(-180.0), 180.0);
    }
}
