//! Stateless helpers over continuous 2D points.
//!
//! Pixel-space positions are plain [`Point`] values. None of these helpers
//! clamp their inputs: [`lerp`] extrapolates when `t` falls outside `0..=1`,
//! so callers that need bounded output must clamp `t` themselves.

/// Continuous 2D point expressed in screen-space pixels.
pub type Point = glam::Vec2;

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: Point, b: Point) -> f32 {
    length_squared(a - b).sqrt()
}

/// Squared magnitude of a vector, for comparisons that do not need the root.
#[must_use]
pub fn length_squared(v: Point) -> f32 {
    v.x * v.x + v.y * v.y
}

/// Componentwise `start + (end - start) * t` with an unclamped `t`.
#[must_use]
pub fn lerp(start: Point, end: Point, t: f32) -> Point {
    Point::new(
        start.x + (end.x - start.x) * t,
        start.y + (end.y - start.y) * t,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let d = distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
        assert!((d - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn length_squared_skips_root() {
        assert!((length_squared(Point::new(3.0, 4.0)) - 25.0).abs() < f32::EPSILON);
    }

    #[test]
    fn lerp_hits_endpoints_and_midpoint() {
        let start = Point::new(10.0, -2.0);
        let end = Point::new(20.0, 6.0);
        assert_eq!(lerp(start, end, 0.0), start);
        assert_eq!(lerp(start, end, 1.0), end);
        assert_eq!(lerp(start, end, 0.5), Point::new(15.0, 2.0));
    }

    #[test]
    fn lerp_extrapolates_outside_unit_interval() {
        let start = Point::new(0.0, 0.0);
        let end = Point::new(10.0, 0.0);
        assert_eq!(lerp(start, end, 1.5), Point::new(15.0, 0.0));
        assert_eq!(lerp(start, end, -0.5), Point::new(-5.0, 0.0));
    }
}
