use crate::error::ConfigError;
use glam::Vec2;

/// Anything that sits at a single point in the plane.
///
/// The spatial index never owns positions; it reads them through this trait
/// from the slice the caller passes in, using the [`crate::types::NodeId`]
/// as the slice index.
pub trait Located {
    fn position(&self) -> Vec2;
}

impl Located for Vec2 {
    fn position(&self) -> Vec2 {
        *self
    }
}

/// Axis-aligned rectangle stored as its min and max corners.
///
/// The y axis points down, so `top` is `min.y` and `bottom` is `max.y`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rectangle {
    min: Vec2,
    max: Vec2,
}

impl Rectangle {
    /// Builds a rectangle from its top-left and bottom-right corners.
    ///
    /// ### Errors
    /// Returns [`ConfigError::InvalidRectangle`] when a coordinate is not
    /// finite or when `min` is not component-wise `<= max`.
    pub fn new(min: Vec2, max: Vec2) -> Result<Self, ConfigError> {
        if !min.is_finite() || !max.is_finite() || min.x > max.x || min.y > max.y {
            return Err(ConfigError::InvalidRectangle {
                min_x: min.x,
                min_y: min.y,
                max_x: max.x,
                max_y: max.y,
            });
        }
        Ok(Self { min, max })
    }

    /// Builds a rectangle from its origin (top-left corner) and size.
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Result<Self, ConfigError> {
        Self::new(origin, origin + size)
    }

    pub fn min(&self) -> Vec2 {
        self.min
    }

    pub fn max(&self) -> Vec2 {
        self.max
    }

    pub fn left(&self) -> f32 {
        self.min.x
    }

    pub fn top(&self) -> f32 {
        self.min.y
    }

    pub fn right(&self) -> f32 {
        self.max.x
    }

    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Inclusive on every edge.
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }

    /// Squared distance from `p` to the closest point of the rectangle
    /// (zero when `p` is inside).
    pub fn distance_squared_to_point(&self, p: Vec2) -> f32 {
        let dx = if p.x < self.min.x {
            self.min.x - p.x
        } else if p.x > self.max.x {
            p.x - self.max.x
        } else {
            0.0
        };

        let dy = if p.y < self.min.y {
            self.min.y - p.y
        } else if p.y > self.max.y {
            p.y - self.max.y
        } else {
            0.0
        };

        dx * dx + dy * dy
    }

    pub fn intersects_circle(&self, circle: &Circle) -> bool {
        self.distance_squared_to_point(circle.center) <= circle.radius * circle.radius
    }

    /// One of the four equal quadrants: 0 = NW, 1 = NE, 2 = SW, 3 = SE.
    pub fn quadrant(&self, index: usize) -> Rectangle {
        let c = self.center();
        match index {
            0 => Rectangle { min: self.min, max: c },
            1 => Rectangle {
                min: Vec2::new(c.x, self.min.y),
                max: Vec2::new(self.max.x, c.y),
            },
            2 => Rectangle {
                min: Vec2::new(self.min.x, c.y),
                max: Vec2::new(c.x, self.max.y),
            },
            _ => Rectangle { min: c, max: self.max },
        }
    }

    /// Which quadrant `p` falls into. Points on a centre line go to the
    /// east/south side, so the choice is unique and the chosen quadrant's
    /// inclusive bounds always contain `p`.
    pub fn quadrant_of(&self, p: Vec2) -> usize {
        let c = self.center();
        let east = (p.x >= c.x) as usize;
        let south = (p.y >= c.y) as usize;
        south * 2 + east
    }
}

/// Query shape for [`crate::quadtree::SpatialIndex::circle_query`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Inclusive: a point exactly `radius` away is inside.
    pub fn contains_point(&self, p: Vec2) -> bool {
        self.center.distance_squared(p) <= self.radius * self.radius
    }

    /// A circle that can match nothing: zero, negative or non-finite radius.
    pub fn is_degenerate(&self) -> bool {
        !(self.radius > 0.0) || !self.radius.is_finite() || !self.center.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> Rectangle {
        Rectangle::new(Vec2::new(x0, y0), Vec2::new(x1, y1)).unwrap()
    }

    #[test]
    fn new_rejects_inverted_and_non_finite_corners() {
        assert!(Rectangle::new(Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)).is_err());
        assert!(Rectangle::new(Vec2::new(0.0, f32::NAN), Vec2::new(1.0, 1.0)).is_err());
        assert!(Rectangle::new(Vec2::ZERO, Vec2::ZERO).is_ok());
    }

    #[test]
    fn getters_follow_y_down_convention() {
        let r = Rectangle::from_origin_size(Vec2::new(2.0, 3.0), Vec2::new(4.0, 6.0)).unwrap();
        assert_eq!(r.left(), 2.0);
        assert_eq!(r.top(), 3.0);
        assert_eq!(r.right(), 6.0);
        assert_eq!(r.bottom(), 9.0);
        assert_eq!(r.width(), 4.0);
        assert_eq!(r.height(), 6.0);
        assert_eq!(r.center(), Vec2::new(4.0, 6.0));
    }

    #[test]
    fn contains_point_is_inclusive() {
        let r = rect(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains_point(Vec2::new(0.0, 0.0)));
        assert!(r.contains_point(Vec2::new(10.0, 10.0)));
        assert!(!r.contains_point(Vec2::new(10.01, 5.0)));
        assert!(!r.contains_point(Vec2::new(5.0, -0.01)));
    }

    #[test]
    fn distance_squared_to_point() {
        let r = rect(0.0, 0.0, 4.0, 6.0);
        assert_eq!(r.distance_squared_to_point(Vec2::new(2.0, 3.0)), 0.0);
        assert_eq!(r.distance_squared_to_point(Vec2::new(6.0, 3.0)), 4.0);
        assert_eq!(r.distance_squared_to_point(Vec2::new(7.0, 10.0)), 25.0);
    }

    #[test]
    fn intersects_circle_handles_corners() {
        let r = rect(0.0, 0.0, 10.0, 10.0);
        assert!(r.intersects_circle(&Circle::new(Vec2::new(5.0, 5.0), 1.0)));
        assert!(r.intersects_circle(&Circle::new(Vec2::new(12.0, 5.0), 2.0)));
        // Diagonal distance to the corner is sqrt(8) > 2.5.
        assert!(!r.intersects_circle(&Circle::new(Vec2::new(12.0, 12.0), 2.5)));
        assert!(r.intersects_circle(&Circle::new(Vec2::new(12.0, 12.0), 3.0)));
    }

    #[test]
    fn quadrants_tile_the_parent() {
        let r = rect(0.0, 0.0, 8.0, 4.0);
        assert_eq!(r.quadrant(0), rect(0.0, 0.0, 4.0, 2.0));
        assert_eq!(r.quadrant(1), rect(4.0, 0.0, 8.0, 2.0));
        assert_eq!(r.quadrant(2), rect(0.0, 2.0, 4.0, 4.0));
        assert_eq!(r.quadrant(3), rect(4.0, 2.0, 8.0, 4.0));
    }

    #[test]
    fn quadrant_of_picks_a_containing_quadrant() {
        let r = rect(0.0, 0.0, 8.0, 4.0);
        for p in [
            Vec2::new(1.0, 1.0),
            Vec2::new(4.0, 2.0),
            Vec2::new(8.0, 0.0),
            Vec2::new(0.0, 4.0),
            Vec2::new(3.999, 2.0),
        ] {
            let q = r.quadrant_of(p);
            assert!(r.quadrant(q).contains_point(p), "{p:?} not in quadrant {q}");
        }
        assert_eq!(r.quadrant_of(Vec2::new(4.0, 2.0)), 3);
    }

    #[test]
    fn clamp_point_pulls_inside() {
        let r = rect(0.0, 0.0, 500.0, 700.0);
        assert_eq!(r.clamp_point(Vec2::new(-3.0, 800.0)), Vec2::new(0.0, 700.0));
        assert_eq!(r.clamp_point(Vec2::new(10.0, 20.0)), Vec2::new(10.0, 20.0));
    }

    #[test]
    fn circle_degenerate_radius() {
        assert!(Circle::new(Vec2::ZERO, 0.0).is_degenerate());
        assert!(Circle::new(Vec2::ZERO, -1.0).is_degenerate());
        assert!(Circle::new(Vec2::ZERO, f32::NAN).is_degenerate());
        assert!(!Circle::new(Vec2::ZERO, 1.0).is_degenerate());
        assert!(Circle::new(Vec2::ZERO, 1.0).contains_point(Vec2::new(1.0, 0.0)));
    }
}
