use std::{cmp::Ordering, fmt, str::FromStr};

use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::surface::{Stroke, Surface};

/// Default stroke width of every line.
pub const DEFAULT_WIDTH: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn sum(&self) -> f64 {
        self.x + self.y
    }

    /// Point halfway between `self` and `other`, floored on both axes.
    pub fn midpoint(&self, other: &Point) -> Point {
        midpoint(*self, *other)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.x, self.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

impl From<Point> for (f64, f64) {
    fn from(point: Point) -> Self {
        (point.x, point.y)
    }
}

/// Orders points by the sum of their coordinates.
///
/// This is the only order used for line endpoints. It is not a spatial order:
/// `(0, 5)` sorts after `(3, 1)`.
pub fn sum_order(a: &Point, b: &Point) -> Ordering {
    a.sum().total_cmp(&b.sum())
}

pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new(((a.x + b.x) / 2.0).floor(), ((a.y + b.y) / 2.0).floor())
}

/// Puts the smaller point (by [`sum_order`]) first.
pub fn normalize(p1: Point, p2: Point) -> (Point, Point) {
    normalize_by(p1, p2, sum_order)
}

fn normalize_by(p1: Point, p2: Point, order: impl Fn(&Point, &Point) -> Ordering) -> (Point, Point) {
    // equal sums fall back to x, then y, so the result doesn't depend on argument order
    let ord = order(&p1, &p2)
        .then_with(|| p1.x.total_cmp(&p2.x))
        .then_with(|| p1.y.total_cmp(&p2.y));

    match ord {
        Ordering::Greater => (p2, p1),
        _ => (p1, p2),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BLACK: Color = Color(0, 0, 0);
    pub const WHITE: Color = Color(255, 255, 255);
    pub const RED: Color = Color(255, 0, 0);
    pub const GRAY: Color = Color(190, 190, 190);

    pub fn random(rng: &mut impl Rng) -> Self {
        let [r, g, b] = rng.gen::<[u8; 3]>();
        Color(r, g, b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(pub String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color: `{}`", self.0)
    }
}

impl std::error::Error for ParseColorError {}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "black" => return Ok(Color::BLACK),
            "white" => return Ok(Color::WHITE),
            "red" => return Ok(Color::RED),
            "gray" | "grey" => return Ok(Color::GRAY),
            _ => {}
        }

        let hex = s
            .strip_prefix('#')
            .filter(|hex| hex.len() == 6 && hex.is_ascii())
            .ok_or_else(|| ParseColorError(s.to_string()))?;
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ParseColorError(s.to_string()))
        };

        Ok(Color(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// How much a line is shortened at both ends when drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Inset {
    /// Half of the stroke width, rounded down.
    HalfWidth,
    /// Exact amount; negative values lengthen the line.
    By(f64),
}

impl Inset {
    pub fn amount(&self, width: f64) -> f64 {
        match self {
            Inset::HalfWidth => (width / 2.0).floor(),
            Inset::By(amount) => *amount,
        }
    }
}

/// Segment between two points, stored with the smaller point first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    p1: Point,
    p2: Point,
    color: Color,
    width: f64,
}

impl Line {
    pub fn new(p1: Point, p2: Point) -> Self {
        Self::with_order(p1, p2, sum_order)
    }

    pub fn with_order(p1: Point, p2: Point, order: impl Fn(&Point, &Point) -> Ordering) -> Self {
        let (p1, p2) = normalize_by(p1, p2, order);
        Line {
            p1,
            p2,
            color: Color::BLACK,
            width: DEFAULT_WIDTH,
        }
    }

    pub fn colored(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn p1(&self) -> Point {
        self.p1
    }

    pub fn p2(&self) -> Point {
        self.p2
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// Endpoints moved towards each other by the inset, only along axes on
    /// which the line actually extends.
    pub fn inset(&self, inset: Inset, width: f64) -> (Point, Point) {
        let off = inset.amount(width);
        let (mut a, mut b) = (self.p1, self.p2);

        if a.x != b.x {
            a.x += off;
            b.x -= off;
        }
        if a.y != b.y {
            a.y += off;
            b.y -= off;
        }

        (a, b)
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, stroke: &Stroke) -> Result<(), S::Error> {
        let color = stroke.color.unwrap_or(self.color);
        let width = stroke.width.unwrap_or(self.width);
        let (from, to) = match stroke.inset {
            Some(inset) => self.inset(inset, width),
            None => (self.p1, self.p2),
        };

        surface.segment(from, to, color, width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn order_is_by_sum_not_lexicographic() {
        assert_eq!(sum_order(&p(3.0, 1.0), &p(0.0, 5.0)), Ordering::Less);
        assert_eq!(sum_order(&p(0.0, 5.0), &p(3.0, 1.0)), Ordering::Greater);

        let line = Line::new(p(0.0, 5.0), p(3.0, 1.0));
        assert_eq!(line.p1(), p(3.0, 1.0));
        assert_eq!(line.p2(), p(0.0, 5.0));
    }

    #[test]
    fn normalize_is_symmetric() {
        let pairs = [
            (p(0.0, 0.0), p(10.0, 0.0)),
            (p(4.5, 2.0), p(1.0, 7.25)),
            (p(1.0, 3.0), p(3.0, 1.0)),
            (p(2.0, 2.0), p(2.0, 2.0)),
            (p(-1.0, 6.0), p(6.0, -1.0)),
        ];

        for (a, b) in pairs {
            assert_eq!(normalize(a, b), normalize(b, a));
        }
    }

    #[test]
    fn custom_order_is_honored() {
        let reversed = |a: &Point, b: &Point| sum_order(b, a);
        let line = Line::with_order(p(0.0, 0.0), p(2.0, 2.0), reversed);
        assert_eq!(line.p1(), p(2.0, 2.0));
    }

    #[test]
    fn midpoint_floors() {
        assert_eq!(midpoint(p(0.0, 0.0), p(5.0, 3.0)), p(2.0, 1.0));
        assert_eq!(p(10.0, 20.0).midpoint(&p(20.0, 40.0)), p(15.0, 30.0));
        assert_eq!(midpoint(p(0.0, 0.0), p(22.5, 17.0)), p(11.0, 8.0));
    }

    #[test]
    fn inset_shortens_along_the_line_only() {
        let horizontal = Line::new(p(10.0, 5.0), p(0.0, 5.0));
        assert_eq!(
            horizontal.inset(Inset::HalfWidth, horizontal.width()),
            (p(2.0, 5.0), p(8.0, 5.0))
        );

        let vertical = Line::new(p(3.0, 0.0), p(3.0, 6.0)).with_width(3.0);
        assert_eq!(
            vertical.inset(Inset::HalfWidth, vertical.width()),
            (p(3.0, 1.0), p(3.0, 5.0))
        );

        assert_eq!(
            horizontal.inset(Inset::By(-2.0), 4.0),
            (p(-2.0, 5.0), p(12.0, 5.0))
        );
    }

    #[test]
    fn colors() {
        assert_eq!("#ff8000".parse::<Color>(), Ok(Color(255, 128, 0)));
        assert_eq!("Gray".parse::<Color>(), Ok(Color::GRAY));
        assert!("#ff80".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
        assert_eq!(Color(1, 2, 255).to_string(), "#0102ff");
    }
}
