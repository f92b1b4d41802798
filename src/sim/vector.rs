//! Vector helpers on top of glam
//!
//! The collision queries build several candidate displacement vectors and
//! keep the shortest one. Vectors are compared by Euclidean length only, so
//! two vectors of the same length but different direction count as equal.

use std::cmp::Ordering;

use glam::DVec2;

/// Angle-based operations used by the collision response
pub trait VecExt: Copy {
    /// Heading in radians, `atan2(y, x)`
    fn heading(self) -> f64;

    /// Same length, new heading
    fn with_heading(self, radians: f64) -> DVec2;

    /// Rotate by adding `radians` to the current heading
    fn rotated_by(self, radians: f64) -> DVec2;

    /// Vector projection onto `v`, `v * dot(self, v) / dot(v, v)`
    fn projection_on(self, v: DVec2) -> DVec2;

    /// Compare by length only
    fn cmp_length(self, other: DVec2) -> Ordering;
}

impl VecExt for DVec2 {
    #[inline]
    fn heading(self) -> f64 {
        self.y.atan2(self.x)
    }

    #[inline]
    fn with_heading(self, radians: f64) -> DVec2 {
        let len = self.length();
        DVec2::new(radians.cos() * len, radians.sin() * len)
    }

    #[inline]
    fn rotated_by(self, radians: f64) -> DVec2 {
        self.with_heading(self.heading() + radians)
    }

    #[inline]
    fn projection_on(self, v: DVec2) -> DVec2 {
        let coeff = self.dot(v) / v.dot(v);
        v * coeff
    }

    #[inline]
    fn cmp_length(self, other: DVec2) -> Ordering {
        self.length()
            .partial_cmp(&other.length())
            .unwrap_or(Ordering::Equal)
    }
}

/// Pick the shortest vector. Ties go to the later candidate.
pub fn shortest(first: DVec2, rest: impl IntoIterator<Item = DVec2>) -> DVec2 {
    rest.into_iter().fold(first, |best, v| {
        if v.cmp_length(best) == Ordering::Greater {
            best
        } else {
            v
        }
    })
}

/// Reflect `velocity` about the surface whose outward normal is `normal`.
///
/// The "floor" is the normal rotated by -90°; the new heading mirrors the old
/// one about the floor. Speed is unchanged.
#[inline]
pub fn reflect_about_floor(velocity: DVec2, normal: DVec2) -> DVec2 {
    let floor_angle = normal.rotated_by(-std::f64::consts::FRAC_PI_2).heading();
    velocity.with_heading(floor_angle + (floor_angle - velocity.heading()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f64::consts::PI;

    #[test]
    fn test_heading() {
        let cases = [
            (DVec2::new(1.0, 0.0), 0.0),
            (DVec2::new(1.0, 1.0), PI / 4.0),
            (DVec2::new(0.0, 1.0), PI / 2.0),
            (DVec2::new(-1.0, 1.0), 3.0 * PI / 4.0),
            (DVec2::new(-1.0, 0.0), PI),
            (DVec2::new(-1.0, -1.0), -3.0 * PI / 4.0),
            (DVec2::new(0.0, -1.0), -PI / 2.0),
            (DVec2::new(1.0, -1.0), -PI / 4.0),
        ];
        for (v, expected) in cases {
            assert!((v.heading() - expected).abs() < 1e-14, "{v}");
        }
    }

    #[test]
    fn test_with_heading() {
        let v = DVec2::new(1.0, 1.0);
        assert!((v.with_heading(PI / 7.0).heading() - PI / 7.0).abs() < 1e-14);
        assert!((v.with_heading(-PI / 7.0).heading() + PI / 7.0).abs() < 1e-14);
        assert!(v.with_heading(8.0 * PI).heading().abs() < 1e-14);
        assert!((v.with_heading(3.0 * PI / 2.0).heading() + PI / 2.0).abs() < 1e-14);
        assert!((v.with_heading(1.0).length() - v.length()).abs() < 1e-14);
    }

    #[test]
    fn test_rotated_by() {
        let v = DVec2::new(1.0, 1.0);
        assert!(v.rotated_by(PI / 4.0).x.abs() < 1e-14);
        assert!((v.rotated_by(PI).x + 1.0).abs() < 1e-14);
    }

    #[test]
    fn test_projection() {
        let v = DVec2::new(5.0, 0.0);
        assert!(DVec2::new(0.0, 10.0).projection_on(v).length() < 1e-14);
        assert!((DVec2::new(5.0, 10.0).projection_on(v).length() - 5.0).abs() < 1e-14);
    }

    #[test]
    fn test_cmp_length() {
        let v = DVec2::new(1.0, 1.0);
        let u = DVec2::new(2.0, 2.0);
        assert_eq!(v.cmp_length(u), Ordering::Less);
        assert_eq!(u.cmp_length(v), Ordering::Greater);
        assert_eq!(DVec2::X.cmp_length(DVec2::NEG_Y), Ordering::Equal);
    }

    #[test]
    fn test_shortest_prefers_last_on_tie() {
        let picked = shortest(DVec2::new(3.0, 0.0), [DVec2::X, DVec2::Y, DVec2::new(2.0, 0.0)]);
        assert_eq!(picked, DVec2::Y);
    }

    #[test]
    fn test_normalize_zero_is_zero() {
        assert_eq!(DVec2::ZERO.normalize_or_zero(), DVec2::ZERO);
    }

    #[test]
    fn test_reflect_about_floor() {
        // Ball falling onto a floor whose normal points up
        let v = reflect_about_floor(DVec2::new(1.0, -1.0), DVec2::new(0.0, 0.5));
        assert!((v.x - 1.0).abs() < 1e-12);
        assert!((v.y - 1.0).abs() < 1e-12);

        // Ball moving right into a wall whose normal points left
        let v = reflect_about_floor(DVec2::new(2.0, 0.0), DVec2::new(-0.1, 0.0));
        assert!((v.x + 2.0).abs() < 1e-12);
        assert!(v.y.abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_normalize_has_unit_length(x in -1e6f64..1e6, y in -1e6f64..1e6) {
            let v = DVec2::new(x, y);
            prop_assume!(v.length() > 1e-9);
            prop_assert!((v.normalize_or_zero().length() - 1.0).abs() < 1e-12);
        }

        #[test]
        fn prop_add_then_subtract_roundtrips(
            x in -1e3f64..1e3, y in -1e3f64..1e3,
            wx in -1e3f64..1e3, wy in -1e3f64..1e3,
        ) {
            let v = DVec2::new(x, y);
            let w = DVec2::new(wx, wy);
            let back = v + w - w;
            prop_assert!((back - v).length() < 1e-9);
        }

        #[test]
        fn prop_reflection_keeps_speed(
            vx in -50.0f64..50.0, vy in -50.0f64..50.0,
            nx in -1.0f64..1.0, ny in -1.0f64..1.0,
        ) {
            let v = DVec2::new(vx, vy);
            let reflected = reflect_about_floor(v, DVec2::new(nx, ny));
            prop_assert!((reflected.length() - v.length()).abs() < 1e-9);
        }
    }
}
