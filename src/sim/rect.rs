//! Axis-aligned rectangle geometry for walls and movement areas
//!
//! A rectangle is anchored at its lower-left corner (x, y) and grows right by
//! `width` and up by `height`.

use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::vector::{VecExt, shortest};

/// An axis-aligned rectangle
///
/// Equality is exact field equality; walls are identified by value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center point
    #[inline]
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if a point lies inside or on the boundary
    pub fn contains_point(&self, pt: DVec2) -> bool {
        !(pt.x < self.x || pt.y < self.y || pt.x > self.x + self.width || pt.y > self.y + self.height)
    }

    /// Distance from the nearest boundary point to `pt`
    #[inline]
    pub fn distance_to_point(&self, pt: DVec2) -> f64 {
        self.shortest_vector_to_point(pt).length()
    }

    /// Vector from the nearest point on the boundary to `pt`
    ///
    /// Works for points inside the rectangle too: the result then points from
    /// the closest side toward the point, which is the direction to push it
    /// out along.
    pub fn shortest_vector_to_point(&self, pt: DVec2) -> DVec2 {
        let (left, right) = (self.x, self.x + self.width);
        let (bottom, top) = (self.y, self.y + self.height);

        // Where the point projects onto the horizontal and vertical sides
        let rel = pt - DVec2::new(self.x, self.y);
        let x_on_hsides = self.x + rel.projection_on(DVec2::new(self.width, 0.0)).x;
        let y_on_vsides = self.y + rel.projection_on(DVec2::new(0.0, self.height)).y;

        // Nearest point on each vertical side, clamped to its corners
        let side_y = if y_on_vsides < bottom {
            bottom
        } else if y_on_vsides > top {
            top
        } else {
            y_on_vsides
        };
        let from_left = pt - DVec2::new(left, side_y);
        let from_right = pt - DVec2::new(right, side_y);

        // Same for the horizontal sides
        let side_x = if x_on_hsides < left {
            left
        } else if x_on_hsides > right {
            right
        } else {
            x_on_hsides
        };
        let from_top = pt - DVec2::new(side_x, top);
        let from_bottom = pt - DVec2::new(side_x, bottom);

        shortest(from_left, [from_right, from_top, from_bottom])
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rect{{x:{:?}, y:{:?}, width:{:?}, height:{:?}}}",
            self.x, self.y, self.width, self.height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> Rect {
        Rect::new(1.0, 2.0, 3.0, 4.0)
    }

    #[test]
    fn test_center() {
        let c = sample().center();
        assert!((c.x - 2.5).abs() < 1e-14);
        assert!((c.y - 4.0).abs() < 1e-14);
    }

    #[test]
    fn test_contains_point() {
        let r = sample();
        assert!(r.contains_point(DVec2::new(2.5, 4.0)));
        assert!(r.contains_point(DVec2::new(1.0, 2.0)));
        assert!(!r.contains_point(DVec2::new(12.5, 14.0)));
    }

    #[test]
    fn test_distance_to_corners_is_zero() {
        let r = sample();
        for corner in [(1.0, 2.0), (4.0, 2.0), (4.0, 6.0), (1.0, 6.0)] {
            let d = r.distance_to_point(DVec2::new(corner.0, corner.1));
            assert!(d.abs() < 1e-14, "{corner:?} -> {d}");
        }
        assert!((r.distance_to_point(DVec2::new(0.0, 1.0)) - 2f64.sqrt()).abs() < 1e-14);
    }

    #[test]
    fn test_shortest_vector_to_point() {
        let r = sample();

        let v = r.shortest_vector_to_point(DVec2::new(0.0, 0.0));
        assert!((v.x + 1.0).abs() < 1e-14);
        assert!((v.y + 2.0).abs() < 1e-14);

        let v = r.shortest_vector_to_point(DVec2::new(5.0, 3.0));
        assert!((v.x - 1.0).abs() < 1e-14);
        assert!(v.y.abs() < 1e-14);
    }

    #[test]
    fn test_inside_point_points_away_from_nearest_side() {
        let r = sample();
        // Just inside the left side
        let v = r.shortest_vector_to_point(DVec2::new(1.25, 4.0));
        assert!((v.x - 0.25).abs() < 1e-14);
        assert!(v.y.abs() < 1e-14);
        // Just inside the top
        let v = r.shortest_vector_to_point(DVec2::new(2.5, 5.9));
        assert!(v.x.abs() < 1e-14);
        assert!((v.y + 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_display() {
        assert_eq!(sample().to_string(), "Rect{x:1.0, y:2.0, width:3.0, height:4.0}");
    }

    #[test]
    fn test_equality() {
        let r1 = sample();
        let r2 = Rect::new(1.0, 2.0, 3.0, 4.0);
        let r3 = Rect::new(4.0, 3.0, 2.0, 1.0);
        let copied = r1;
        assert_eq!(r1, r1);
        assert_eq!(r1, r2);
        assert_eq!(r2, r1);
        assert_eq!(r2, copied);
        assert_eq!(r1, copied);
        assert_ne!(r1, r3);
        assert_ne!(r1, Rect::new(1.0, 2.0, 3.0, 4.000_000_1));
        assert_ne!(r1, Rect::new(1.5, 2.0, 3.0, 4.0));
        assert_ne!(r1, Rect::new(1.0, -2.0, 3.0, 4.0));
        assert_ne!(r1, Rect::new(1.0, 2.0, 3.1, 4.0));
    }

    proptest! {
        #[test]
        fn prop_outside_points_have_positive_distance(
            x in -50.0f64..50.0, y in -50.0f64..50.0,
            w in 0.1f64..10.0, h in 0.1f64..10.0,
            px in -100.0f64..100.0, py in -100.0f64..100.0,
        ) {
            let r = Rect::new(x, y, w, h);
            let p = DVec2::new(px, py);
            prop_assume!(px < x || px > x + w || py < y || py > y + h);
            prop_assert!(!r.contains_point(p));
            prop_assert!(r.distance_to_point(p) > 0.0);
        }

        #[test]
        fn prop_boundary_points_have_zero_distance(
            x in -50.0f64..50.0, y in -50.0f64..50.0,
            w in 0.1f64..10.0, h in 0.1f64..10.0,
            t in 0.0f64..1.0,
            side in 0usize..4,
        ) {
            let r = Rect::new(x, y, w, h);
            let p = match side {
                0 => DVec2::new(x, y + t * h),
                1 => DVec2::new(x + w, y + t * h),
                2 => DVec2::new(x + t * w, y),
                _ => DVec2::new(x + t * w, y + h),
            };
            prop_assert!(r.distance_to_point(p) < 1e-9);
        }

        #[test]
        fn prop_outside_distance_matches_clamped_point(
            w in 0.1f64..10.0, h in 0.1f64..10.0,
            px in -20.0f64..20.0, py in -20.0f64..20.0,
        ) {
            let r = Rect::new(0.0, 0.0, w, h);
            let p = DVec2::new(px, py);
            prop_assume!(!r.contains_point(p));
            let nearest = DVec2::new(px.clamp(0.0, w), py.clamp(0.0, h));
            prop_assert!((r.distance_to_point(p) - (p - nearest).length()).abs() < 1e-9);
        }
    }
}
