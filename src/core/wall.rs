use crate::core::particle::{X, Y};
use crate::error::{Error, Result};

/// Kinds of walls a particle can bounce off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wall {
    /// Outer walls at y = 0 and y = L.
    Horizontal,
    /// Outer walls at x = 0 and x = W.
    Vertical,
    /// Internal partition at x = W/2 with a centered opening.
    Middle,
}

impl Wall {
    /// Index of the velocity component normal to this wall.
    #[inline]
    pub fn normal_axis(self) -> usize {
        match self {
            Wall::Horizontal => Y,
            Wall::Vertical | Wall::Middle => X,
        }
    }
}

/// Static shape of the container: a `width` x `height` box split at `width / 2` by a wall
/// with a centered gap of height `opening`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGeometry {
    width: f64,
    height: f64,
    opening: f64,
}

impl BoxGeometry {
    /// Validate and build the box.
    ///
    /// Errors: `Error::InvalidParam` unless `width > 0`, `height > 0` and
    /// `0 < opening <= height` (all finite).
    pub fn new(width: f64, height: f64, opening: f64) -> Result<Self> {
        if !width.is_finite() || width <= 0.0 {
            return Err(Error::InvalidParam("width must be finite and > 0".into()));
        }
        if !height.is_finite() || height <= 0.0 {
            return Err(Error::InvalidParam("height must be finite and > 0".into()));
        }
        if !opening.is_finite() || opening <= 0.0 || opening > height {
            return Err(Error::InvalidParam(
                "opening must be finite, > 0 and <= height".into(),
            ));
        }
        Ok(Self {
            width,
            height,
            opening,
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn opening(&self) -> f64 {
        self.opening
    }

    /// x coordinate of the partition.
    #[inline]
    pub fn middle_x(&self) -> f64 {
        self.width / 2.0
    }

    /// Vertical interval of the partition that particles can pass through.
    #[inline]
    pub fn opening_band(&self) -> (f64, f64) {
        let c = self.height / 2.0;
        (c - self.opening / 2.0, c + self.opening / 2.0)
    }

    /// Length used to normalize pressure on `wall`; zero for the partition, which does not
    /// accumulate pressure.
    #[inline]
    pub fn wall_length(&self, wall: Wall) -> f64 {
        match wall {
            Wall::Horizontal => self.width,
            Wall::Vertical => self.height,
            Wall::Middle => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_geometry_ok() -> Result<()> {
        let b = BoxGeometry::new(0.24, 0.09, 0.01)?;
        assert_eq!(b.middle_x(), 0.12);
        let (lo, hi) = b.opening_band();
        assert!((lo - 0.04).abs() < 1e-12);
        assert!((hi - 0.05).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn opening_may_span_the_full_height() -> Result<()> {
        let b = BoxGeometry::new(2.0, 1.0, 1.0)?;
        assert_eq!(b.opening_band(), (0.0, 1.0));
        Ok(())
    }

    #[test]
    fn invalid_boxes_rejected() {
        assert!(BoxGeometry::new(0.0, 1.0, 0.5).is_err());
        assert!(BoxGeometry::new(1.0, -1.0, 0.5).is_err());
        let err = BoxGeometry::new(1.0, 1.0, 0.0).unwrap_err();
        assert!(err.to_string().contains("opening"));
        assert!(BoxGeometry::new(1.0, 1.0, 1.5).is_err());
    }

    #[test]
    fn wall_lengths_and_axes() -> Result<()> {
        let b = BoxGeometry::new(4.0, 3.0, 1.0)?;
        assert_eq!(b.wall_length(Wall::Horizontal), 4.0);
        assert_eq!(b.wall_length(Wall::Vertical), 3.0);
        assert_eq!(b.wall_length(Wall::Middle), 0.0);
        assert_eq!(Wall::Horizontal.normal_axis(), Y);
        assert_eq!(Wall::Middle.normal_axis(), X);
        Ok(())
    }
}
