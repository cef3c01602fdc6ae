//! Colouring algorithms.

use bytemuck::{Pod, Zeroable};

use crate::pixel::Escape;

/// [`bytemuck`]-compatible RGBA colour for a single pixel.
///
/// Channels are not clamped: the reference palette produces values well below
/// zero. Hosts clamp on output, see [`Colour::to_rgba8`].
#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, PartialEq)]
pub struct Colour {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Colour {
    pub const BLACK: Self = Colour {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Clamp to `[0, 1]` and quantize, for `Rgba8Unorm` surfaces.
    pub fn to_rgba8(&self) -> [u8; 4] {
        fn channel(value: f32) -> u8 {
            // NaN clamps to 0.
            let value = if value.is_nan() {
                0.0
            } else {
                value.clamp(0.0, 1.0)
            };
            (value * 255.0).round() as u8
        }
        [
            channel(self.r),
            channel(self.g),
            channel(self.b),
            channel(self.a),
        ]
    }
}

impl Default for Colour {
    fn default() -> Self {
        Self::BLACK
    }
}

/// How an [`Escape`] is turned into a [`Colour`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Palette {
    /// `(1 - n, 1 - n / 20, 1 - n / 200, 1)` for iteration count `n`.
    ///
    /// Reproduced as-is, including the unclamped channels: everything that
    /// survives a single iteration has a red channel `<= 0`.
    #[default]
    Reference,
    /// Normalized iteration count ([Wikipedia](https://en.wikipedia.org/wiki/Plotting_algorithms_for_the_Mandelbrot_set#Continuous_(smooth)_coloring))
    /// through a polynomial gradient. Interior points are black.
    Smooth,
}

impl Palette {
    pub fn colour(&self, escape: &Escape, max_iterations: u32) -> Colour {
        match self {
            Palette::Reference => reference(escape.iteration_count),
            Palette::Smooth => smooth(escape, max_iterations),
        }
    }
}

fn reference(iteration_count: u32) -> Colour {
    let iteration = iteration_count as f32;
    Colour {
        r: 1.0 - iteration,
        g: 1.0 - (iteration / 20.0),
        b: 1.0 - (iteration / 200.0),
        a: 1.0,
    }
}

fn smooth(escape: &Escape, max_iterations: u32) -> Colour {
    if !escape.escaped(max_iterations) {
        return Colour::BLACK;
    }

    let iteration = escape.iteration_count as f32;
    let log_modulus = escape.current_value.norm_squared().ln() / 2.0;
    let mu = iteration + 1.0 - log_modulus.log2();
    let mu = if mu.is_finite() { mu } else { iteration };
    let t = (mu / max_iterations as f32).clamp(0.0, 1.0);
    let s = 1.0 - t;

    Colour {
        r: 9.0 * s * t * t * t,
        g: 15.0 * s * s * t * t,
        b: 8.5 * s * s * s * t,
        a: 1.0,
    }
}
