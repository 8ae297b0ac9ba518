//! Boundary between the maze and whatever displays it.

use crate::geometry::{Color, Inset, Point};

/// Something that can show line segments, e.g. a terminal or an image.
///
/// Drawing calls only stage primitives, [`Surface::refresh`] makes them visible.
pub trait Surface {
    type Error;

    fn segment(&mut self, from: Point, to: Point, color: Color, width: f64) -> Result<(), Self::Error>;

    fn refresh(&mut self) -> Result<(), Self::Error>;
}

/// Per-draw overrides of a line's own attributes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Stroke {
    pub color: Option<Color>,
    pub width: Option<f64>,
    pub inset: Option<Inset>,
}

impl Stroke {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color(mut self, value: Color) -> Self {
        self.color = Some(value);
        self
    }

    pub fn width(mut self, value: f64) -> Self {
        self.width = Some(value);
        self
    }

    pub fn inset(mut self, value: Inset) -> Self {
        self.inset = Some(value);
        self
    }
}
