//! Escape-time rendering of the Mandelbrot set.
//!
//! [`evaluator::Evaluator`] maps a normalized coordinate to an iteration count
//! and a colour. [`grid`] evaluates it over a whole pixel grid, in parallel,
//! and [`host::SurfaceHost`] is where the result goes.

mod commands;
mod uniform;

pub mod colour;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod grid;
pub mod host;
pub mod options;
pub mod pixel;
pub mod screen;
pub mod viewport;
pub mod window;

pub use colour::{Colour, Palette};
pub use config::{Config, ConfigError};
pub use error::Error;
pub use evaluator::{Evaluator, Sample};
pub use pixel::{Complex, Escape};
