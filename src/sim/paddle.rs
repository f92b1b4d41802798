//! Flipper paddle geometry
//!
//! A paddle is a butt circle at `position` and a smaller tip circle at
//! `position + direction * length`, joined by two straight edges. The edges
//! run between the points offset ±radius perpendicular to the centerline at
//! each end. That is close to, but not exactly, the tangent hull of the two
//! circles; collision feel depends on this shape, so keep it.

use std::f64::consts::FRAC_PI_2;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::vector::{VecExt, shortest};
use crate::consts::*;
use crate::shortest_angle_delta;

/// Snap-back attempts when a move leaves the movement area
const MAX_AREA_CORRECTIONS: usize = 4;

/// A player's flipper paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Center of the butt circle
    pub position: DVec2,
    /// Translation velocity
    pub velocity: DVec2,
    /// Unit heading from butt to tip
    pub direction: DVec2,
    /// Rotation speed (radians per time unit)
    pub angular_velocity: f64,
    /// Angle the paddle returns to without player input
    pub resting_angle: f64,
    /// Region the butt is confined to
    pub area: Rect,
    pub name: String,
    scale: f64,
    butt_radius: f64,
    tip_radius: f64,
    length: f64,
}

impl Paddle {
    pub fn new(scale: f64, resting_angle: f64) -> Self {
        let (x, y, w, h) = PADDLE_DEFAULT_AREA;
        let mut paddle = Self {
            position: DVec2::ZERO,
            velocity: DVec2::ZERO,
            direction: DVec2::from_angle(resting_angle),
            angular_velocity: 0.0,
            resting_angle,
            area: Rect::new(x, y, w, h),
            name: String::new(),
            scale: 0.0,
            butt_radius: 0.0,
            tip_radius: 0.0,
            length: 0.0,
        };
        paddle.set_scale(scale);
        paddle
    }

    /// Builder-style name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Resize the paddle; radii and length follow the scale
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
        self.butt_radius = PADDLE_BUTT_RATIO * scale;
        self.tip_radius = PADDLE_TIP_RATIO * scale;
        self.length = PADDLE_LENGTH_RATIO * scale;
    }

    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[inline]
    pub fn butt_radius(&self) -> f64 {
        self.butt_radius
    }

    #[inline]
    pub fn tip_radius(&self) -> f64 {
        self.tip_radius
    }

    /// Distance between butt and tip centers
    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Heading angle (radians)
    #[inline]
    pub fn angle(&self) -> f64 {
        self.direction.heading()
    }

    pub fn set_angle(&mut self, radians: f64) {
        self.direction = DVec2::from_angle(radians);
    }

    /// Center of the tip circle
    #[inline]
    pub fn tip_position(&self) -> DVec2 {
        self.position + self.direction * self.length
    }

    /// Full extent along the heading at zero rotation
    pub fn width(&self) -> f64 {
        self.butt_radius + self.length + self.tip_radius
    }

    /// Butt diameter
    pub fn height(&self) -> f64 {
        self.butt_radius * 2.0
    }

    /// Top-left corner of the box around the butt
    pub fn top_left_corner(&self) -> DVec2 {
        DVec2::new(
            self.position.x - self.width() / 2.0,
            self.position.y + self.height() / 2.0,
        )
    }

    /// Translate, then snap back onto the movement area if it was left
    pub fn translate(&mut self, delta: DVec2) {
        self.position += delta;

        for _ in 0..MAX_AREA_CORRECTIONS {
            if self.area.contains_point(self.position) {
                break;
            }
            self.position -= self.area.shortest_vector_to_point(self.position);
        }
    }

    /// Steer toward `target` by setting angular velocity proportional to the
    /// remaining angle. Has to be called every tick to keep converging.
    pub fn rotate_towards_angle(&mut self, target: f64, angular_acceleration: f64) {
        self.angular_velocity = angular_acceleration * shortest_angle_delta(self.angle(), target);
    }

    /// Vector from the nearest point on the paddle outline to `pt`
    ///
    /// Candidates are the perpendicular offsets from the top and bottom edges
    /// (only when `pt` projects within that edge) and the offsets from the
    /// tip and butt circles. The shortest one wins.
    pub fn shortest_vector_to_point(&self, pt: DVec2) -> DVec2 {
        let angle = self.angle();
        let up = DVec2::from_angle(angle + FRAC_PI_2);
        let down = DVec2::from_angle(angle - FRAC_PI_2);
        let tip = self.tip_position();

        let tip_top = tip + up * self.tip_radius;
        let tip_bottom = tip + down * self.tip_radius;
        let butt_top = self.position + up * self.butt_radius;
        let butt_bottom = self.position + down * self.butt_radius;

        let top = edge_offset(butt_top, tip_top, pt);
        let bottom = edge_offset(butt_bottom, tip_bottom, pt);

        let from_tip = pt - (tip + DVec2::from_angle((pt - tip).heading()) * self.tip_radius);
        let from_butt = pt
            - (self.position
                + DVec2::from_angle((pt - self.position).heading()) * self.butt_radius);

        let mut edges = [top, bottom].into_iter().flatten();
        match edges.next() {
            Some(first) => shortest(first, edges.chain([from_tip, from_butt])),
            None => shortest(from_tip, [from_butt]),
        }
    }

    #[inline]
    pub fn distance_to_point(&self, pt: DVec2) -> f64 {
        self.shortest_vector_to_point(pt).length()
    }
}

/// Perpendicular offset from the edge `start -> end` to `pt`, if `pt`
/// projects within the edge
fn edge_offset(start: DVec2, end: DVec2, pt: DVec2) -> Option<DVec2> {
    let edge = end - start;
    let center = start + edge / 2.0;
    let rel = pt - center;
    let along = rel.projection_on(edge);

    (along.length() < edge.length() / 2.0).then(|| rel - along)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn level_paddle() -> Paddle {
        // Butt at origin pointing along +x: butt r=0.3, tip r=0.1 at (1.5, 0)
        let mut p = Paddle::new(1.0, 0.0);
        p.direction = DVec2::X;
        p
    }

    #[test]
    fn test_scale_sets_dimensions() {
        let mut p = Paddle::new(2.0, PI);
        assert!((p.butt_radius() - 0.6).abs() < 1e-12);
        assert!((p.tip_radius() - 0.2).abs() < 1e-12);
        assert!((p.length() - 3.0).abs() < 1e-12);
        p.set_scale(1.0);
        assert!((p.width() - 1.9).abs() < 1e-12);
        assert!((p.height() - 0.6).abs() < 1e-12);
        assert_eq!(p.scale(), 1.0);
    }

    #[test]
    fn test_new_paddle_faces_resting_angle() {
        let p = Paddle::new(1.0, PI);
        assert!((p.angle().abs() - PI).abs() < 1e-12);
        assert_eq!(p.area, Rect::new(-100.0, -100.0, 200.0, 200.0));
    }

    #[test]
    fn test_tip_position() {
        let mut p = level_paddle();
        p.position = DVec2::new(1.0, 1.0);
        p.set_angle(PI / 2.0);
        let tip = p.tip_position();
        assert!((tip.x - 1.0).abs() < 1e-12);
        assert!((tip.y - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_top_left_corner() {
        let mut p = level_paddle();
        p.position = DVec2::new(1.0, 1.0);
        let c = p.top_left_corner();
        assert!((c.x - (1.0 - 0.95)).abs() < 1e-12);
        assert!((c.y - 1.3).abs() < 1e-12);
    }

    #[test]
    fn test_shortest_vector_above_edge() {
        let p = level_paddle();
        // Midway along the paddle; the top edge slopes from y=0.3 to y=0.1
        let v = p.shortest_vector_to_point(DVec2::new(0.75, 1.0));
        assert!(v.y > 0.0);
        let edge = DVec2::new(1.5, -0.2);
        // Edge candidate is perpendicular to the top edge
        assert!(v.dot(edge).abs() < 1e-9);
        assert!((v.length() - p.distance_to_point(DVec2::new(0.75, 1.0))).abs() < 1e-12);
    }

    #[test]
    fn test_shortest_vector_below_edge_points_down() {
        let p = level_paddle();
        let v = p.shortest_vector_to_point(DVec2::new(0.75, -1.0));
        assert!(v.y < 0.0);
    }

    #[test]
    fn test_shortest_vector_beyond_tip() {
        let p = level_paddle();
        let v = p.shortest_vector_to_point(DVec2::new(2.6, 0.0));
        assert!((v.x - 1.0).abs() < 1e-12);
        assert!(v.y.abs() < 1e-12);
    }

    #[test]
    fn test_shortest_vector_behind_butt() {
        let p = level_paddle();
        let v = p.shortest_vector_to_point(DVec2::new(-1.3, 0.0));
        assert!((v.x + 1.0).abs() < 1e-12);
        assert!(v.y.abs() < 1e-12);
    }

    #[test]
    fn test_translate_within_area() {
        let mut p = level_paddle();
        p.area = Rect::new(-1.0, -1.0, 2.0, 2.0);
        p.translate(DVec2::new(0.5, -0.25));
        assert_eq!(p.position, DVec2::new(0.5, -0.25));
    }

    #[test]
    fn test_translate_snaps_back_onto_area() {
        let mut p = level_paddle();
        p.area = Rect::new(-6.4, -3.0, 2.0, 6.0);
        p.position = DVec2::new(-6.0, 0.0);
        p.translate(DVec2::new(3.0, 0.0));
        assert!(p.area.contains_point(p.position));
        assert!((p.position.x - (-4.4)).abs() < 1e-12);

        p.translate(DVec2::new(-10.0, 10.0));
        assert!(p.area.contains_point(p.position));
        assert!((p.position.x - (-6.4)).abs() < 1e-12);
        assert!((p.position.y - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotate_towards_angle_is_proportional() {
        let mut p = level_paddle();
        p.rotate_towards_angle(PI / 4.0, 30.0);
        assert!((p.angular_velocity - 30.0 * PI / 4.0).abs() < 1e-9);

        // Resting at π, currently just past -π: take the short way
        p.set_angle(-PI + 0.1);
        p.rotate_towards_angle(PI, 10.0);
        assert!((p.angular_velocity + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_with_name() {
        let p = Paddle::new(1.0, 0.0).with_name("Player One");
        assert_eq!(p.name, "Player One");
    }
}
