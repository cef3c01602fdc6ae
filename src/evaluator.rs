//! Escape-time evaluation of a single point
//! ([Wikipedia](https://en.wikipedia.org/wiki/Mandelbrot_set#Escape_time_algorithm)).

use crate::{
    colour::Colour,
    config::{Config, ConfigError},
    pixel::{Complex, Escape},
};

/// A point's escape result together with its colour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub escape: Escape,
    pub colour: Colour,
}

/// Evaluator over a validated [`Config`].
///
/// Holds no mutable state; share it freely between threads.
#[derive(Clone, Copy, Debug)]
pub struct Evaluator {
    config: Config,
}

impl Evaluator {
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn max_iterations(&self) -> u32 {
        self.config.max_iterations
    }

    /// Iterate `z <- z^2 + c` from `z = 0` until `|z|^2` reaches the escape
    /// bound or `max_iterations` steps have run.
    ///
    /// A non-finite `c` poisons `z` on the first step; the bound comparison is
    /// then false and the count is 1.
    pub fn escape(&self, c: Complex) -> Escape {
        let max_iterations = self.config.max_iterations;
        let escape_radius_squared = self.config.escape_radius_squared;

        let mut x = 0.0_f32;
        let mut y = 0.0_f32;
        let mut iteration = 0;

        while iteration < max_iterations && x * x + y * y < escape_radius_squared {
            let xtemp = x * x - y * y + c.real;
            y = 2.0 * x * y + c.imaginary;
            x = xtemp;
            iteration += 1;
        }

        Escape {
            iteration_count: iteration,
            current_value: Complex::new(x, y),
        }
    }

    /// [`Evaluator::escape`] at normalized coordinate `(u, v)`.
    pub fn escape_at(&self, u: f32, v: f32) -> Escape {
        self.escape(self.config.viewport.to_plane(u, v))
    }

    pub fn colour(&self, escape: &Escape) -> Colour {
        self.config
            .palette
            .colour(escape, self.config.max_iterations)
    }

    pub fn evaluate(&self, u: f32, v: f32) -> Sample {
        let escape = self.escape_at(u, v);
        Sample {
            escape,
            colour: self.colour(&escape),
        }
    }
}
