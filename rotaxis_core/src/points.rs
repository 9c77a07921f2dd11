//! Reference points and measured positions.

pub use rotaxis_traits::ProbedPosition as MeasuredPosition;

/// A configured probe target: lateral `[x, y]` plus a label.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferencePoint {
    coord: [f64; 2],
    name: String,
}

impl ReferencePoint {
    pub fn new(coord: [f64; 2], name: impl Into<String>) -> Self {
        Self {
            coord,
            name: name.into(),
        }
    }

    /// Point labelled from its coordinates ("pos at 10.000,20.000").
    pub fn unnamed(coord: [f64; 2]) -> Self {
        Self::new(coord, rotaxis_config::default_position_name(coord))
    }

    pub fn coord(&self) -> [f64; 2] {
        self.coord
    }

    pub fn x(&self) -> f64 {
        self.coord[0]
    }

    pub fn y(&self) -> f64 {
        self.coord[1]
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
