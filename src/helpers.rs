use linemaze::Point;

/// Integer position or size, `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dims(pub i32, pub i32);

impl Dims {
    /// Nearest pixel to a point.
    pub fn round(point: Point) -> Dims {
        Dims(point.x.round() as i32, point.y.round() as i32)
    }

    pub fn area(&self) -> usize {
        (self.0.max(0) as usize) * (self.1.max(0) as usize)
    }
}

impl From<(u16, u16)> for Dims {
    fn from((x, y): (u16, u16)) -> Self {
        Dims(x as i32, y as i32)
    }
}

pub fn term_size() -> Dims {
    crossterm::terminal::size().unwrap_or((100, 100)).into()
}
