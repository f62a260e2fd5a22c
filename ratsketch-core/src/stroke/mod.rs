//! # Strokes
//!
//! A stroke is the record of one gesture: its frozen style, and the ordered points the pointer visited.

use crate::brush::StrokeStyle;

pub type StrokeID = crate::SketchID<Stroke>;

/// Offset applied on x to synthesize the second point of a tap, in canvas units.
/// Well below a pixel, so the round caps of the two endpoints coincide into a dot.
pub const DEGENERATE_OFFSET: f32 = 0.01;

/// A position in canvas-local space.
#[derive(Copy, Clone, PartialEq, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}
impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
    /// Replace non-finite components with zero.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let fix = |v: f32| if v.is_finite() { v } else { 0.0 };
        Self {
            x: fix(self.x),
            y: fix(self.y),
        }
    }
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
    #[must_use]
    pub fn scaled(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}
impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}
impl From<Point> for [f32; 2] {
    fn from(value: Point) -> Self {
        [value.x, value.y]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    id: StrokeID,
    style: StrokeStyle,
    /// Invariant: never empty.
    points: Vec<Point>,
}
impl Stroke {
    /// Begin a stroke at `start`.
    #[must_use]
    pub fn begin(style: StrokeStyle, start: Point) -> Self {
        Self {
            id: StrokeID::next(),
            style,
            points: vec![start.sanitized()],
        }
    }
    /// Build a stroke from a full point list, already finalized.
    /// Returns `None` if `points` is empty.
    #[must_use]
    pub fn from_points(style: StrokeStyle, points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut points = points.into_iter();
        let mut stroke = Self::begin(style, points.next()?);
        for point in points {
            stroke.push(point);
        }
        stroke.finalize();
        Some(stroke)
    }
    #[must_use]
    pub fn id(&self) -> StrokeID {
        self.id
    }
    #[must_use]
    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }
    /// Append one point. Non-finite points are dropped, as they have no sensible place on the canvas.
    pub(crate) fn push(&mut self, point: Point) {
        if point.is_finite() {
            self.points.push(point);
        } else {
            log::warn!("{}: dropping non-finite point {point:?}", self.id);
        }
    }
    /// Normalize a tap into a renderable segment.
    /// Afterwards there are always at least two points.
    pub(crate) fn finalize(&mut self) {
        if self.points.len() == 1 {
            let only = self.points[0];
            self.points.push(Point::new(only.x + DEGENERATE_OFFSET, only.y));
            log::trace!("{}: tap normalized into a dot", self.id);
        }
    }
    /// Whether this stroke has the two points needed to hand it to a renderer.
    #[must_use]
    pub fn is_renderable(&self) -> bool {
        self.points.len() >= 2
    }
    /// SVG path data: `M x y L x y ...`
    #[must_use]
    pub fn path_data(&self) -> String {
        use std::fmt::Write;
        let mut data = String::with_capacity(self.points.len() * 16);
        for (idx, point) in self.points.iter().enumerate() {
            let command = if idx == 0 { 'M' } else { 'L' };
            if idx != 0 {
                data.push(' ');
            }
            // Writing into a String can't fail.
            let _ = write!(data, "{command} {} {}", point.x, point.y);
        }
        data
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::brush::{BrushWidth, StrokeStyle};
    use crate::color::Color;

    fn style() -> StrokeStyle {
        StrokeStyle {
            color: Color::WHITE,
            width: BrushWidth::new(4.0),
        }
    }
    #[test]
    fn tap_becomes_segment() {
        let mut stroke = Stroke::begin(style(), Point::new(10.0, 10.0));
        assert!(!stroke.is_renderable());
        stroke.finalize();
        assert_eq!(stroke.points().len(), 2);
        assert_ne!(stroke.points()[0], stroke.points()[1]);
        assert!(stroke.is_renderable());
    }
    #[test]
    fn finalize_leaves_motion_alone() {
        let stroke =
            Stroke::from_points(style(), [Point::new(0.0, 0.0), Point::new(1.0, 1.0)]).unwrap();
        assert_eq!(stroke.points(), &[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
    }
    #[test]
    fn non_finite_points_are_dropped() {
        let mut stroke = Stroke::begin(style(), Point::new(f32::NAN, 3.0));
        assert_eq!(stroke.points()[0], Point::new(0.0, 3.0));
        stroke.push(Point::new(f32::INFINITY, 0.0));
        assert_eq!(stroke.points().len(), 1);
    }
    #[test]
    fn path_data() {
        let stroke = Stroke::from_points(
            style(),
            [Point::new(1.0, 2.0), Point::new(3.5, 4.0), Point::new(5.0, 6.0)],
        )
        .unwrap();
        assert_eq!(stroke.path_data(), "M 1 2 L 3.5 4 L 5 6");
        assert!(Stroke::from_points(style(), []).is_none());
    }
}
