//! Mapping from normalized surface coordinates to the complex plane.

use crate::pixel::Complex;

/// Rectangular window onto the complex plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

impl Viewport {
    /// `[-2.5, 1.0] x [-1.0, 1.0]`, the whole set with a little margin.
    pub const DEFAULT: Self = Viewport {
        x_min: -2.5,
        x_max: 1.0,
        y_min: -1.0,
        y_max: 1.0,
    };

    pub fn new(x_min: f32, x_max: f32, y_min: f32, y_max: f32) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }

    /// Bounds and extents are finite and enclose a non-empty area.
    pub fn is_valid(&self) -> bool {
        [
            self.x_min,
            self.x_max,
            self.y_min,
            self.y_max,
            self.width(),
            self.height(),
        ]
        .iter()
        .all(|value| value.is_finite())
            && self.x_min < self.x_max
            && self.y_min < self.y_max
    }

    /// Map `(u, v)`, nominally in `[0, 1]^2`, onto the plane.
    ///
    /// Coordinates outside the unit square extrapolate linearly. For the default
    /// viewport this is exactly `(u * 3.5 - 2.5, v * 2.0 - 1.0)`.
    pub fn to_plane(&self, u: f32, v: f32) -> Complex {
        Complex {
            real: u * self.width() + self.x_min,
            imaginary: v * self.height() + self.y_min,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_viewport_matches_fixed_transform() {
        let viewport = Viewport::default();
        for &(u, v) in &[(0.0, 0.0), (0.5, 0.5), (1.0, 1.0), (0.25, 0.8), (0.123, 0.987)] {
            let c = viewport.to_plane(u, v);
            assert_eq!(c.real, u * 3.5 - 2.5);
            assert_eq!(c.imaginary, v * 2.0 - 1.0);
        }
    }

    #[test]
    fn corners_map_to_bounds() {
        let viewport = Viewport::new(-1.0, 3.0, 2.0, 4.0);
        assert_eq!(viewport.to_plane(0.0, 0.0), Complex::new(-1.0, 2.0));
        assert_eq!(viewport.to_plane(1.0, 1.0), Complex::new(3.0, 4.0));
    }

    #[test]
    fn rejects_degenerate_bounds() {
        assert!(Viewport::default().is_valid());
        assert!(!Viewport::new(1.0, 1.0, -1.0, 1.0).is_valid());
        assert!(!Viewport::new(-1.0, 1.0, 1.0, -1.0).is_valid());
        assert!(!Viewport::new(f32::NAN, 1.0, -1.0, 1.0).is_valid());
        assert!(!Viewport::new(-1.0, f32::INFINITY, -1.0, 1.0).is_valid());
    }

    #[test]
    fn rejects_overflowing_extent() {
        let viewport = Viewport::new(-f32::MAX, f32::MAX, -1.0, 1.0);
        assert!(viewport.width().is_infinite());
        assert!(!viewport.is_valid());
        assert!(!Viewport::new(-1.0, 1.0, -f32::MAX, f32::MAX).is_valid());
        assert!(Viewport::new(-f32::MAX / 2.0, f32::MAX / 2.0, -1.0, 1.0).is_valid());
    }
}
