use log::debug;
use thiserror::Error;

use crate::{colour::Palette, viewport::Viewport};

/// Escape bound used by every preset: `|z| < 2`.
pub const ESCAPE_RADIUS_SQUARED: f32 = 4.0;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("max_iterations must be at least 1")]
    ZeroIterations,

    #[error("escape_radius_squared must be positive and finite, got {0}")]
    EscapeRadius(f32),

    #[error("viewport bounds must be finite with min < max, got {0:?}")]
    Viewport(Viewport),
}

/// Evaluator parameters.
///
/// The two presets differ only in their iteration bound.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    pub max_iterations: u32,
    pub escape_radius_squared: f32,
    pub viewport: Viewport,
    pub palette: Palette,
}

impl Config {
    /// 15 iterations: fast, blocky bands.
    pub fn coarse() -> Self {
        Self {
            max_iterations: 15,
            escape_radius_squared: ESCAPE_RADIUS_SQUARED,
            viewport: Viewport::DEFAULT,
            palette: Palette::Reference,
        }
    }

    /// 200 iterations.
    pub fn detailed() -> Self {
        Self {
            max_iterations: 200,
            ..Self::coarse()
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_escape_radius_squared(mut self, escape_radius_squared: f32) -> Self {
        self.escape_radius_squared = escape_radius_squared;
        self
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        // Also rejects NaN.
        if !(self.escape_radius_squared > 0.0 && self.escape_radius_squared.is_finite()) {
            return Err(ConfigError::EscapeRadius(self.escape_radius_squared));
        }
        if !self.viewport.is_valid() {
            return Err(ConfigError::Viewport(self.viewport));
        }
        debug!("validated {:?}", self);
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::coarse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        assert_eq!(Config::coarse().validate(), Ok(()));
        assert_eq!(Config::detailed().validate(), Ok(()));
        assert_eq!(Config::detailed().max_iterations, 200);
        assert_eq!(Config::default(), Config::coarse());
    }

    #[test]
    fn escape_radius_must_be_positive() {
        for radius in [0.0, -4.0, f32::NAN, f32::INFINITY] {
            let config = Config::coarse().with_escape_radius_squared(radius);
            assert!(matches!(
                config.validate(),
                Err(ConfigError::EscapeRadius(_))
            ));
        }
    }
}
