use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, PartialEq)]
pub struct Complex {
    pub real: f32,
    pub imaginary: f32,
}

impl Complex {
    pub const ZERO: Self = Complex {
        real: 0.0,
        imaginary: 0.0,
    };

    pub fn new(real: f32, imaginary: f32) -> Self {
        Self { real, imaginary }
    }

    pub fn norm_squared(&self) -> f32 {
        self.real * self.real + self.imaginary * self.imaginary
    }
}

/// Outcome of iterating a single point.
///
/// `iteration_count == max_iterations` means the orbit stayed bounded and the
/// point is presumed to be in the set. `current_value` is the last orbit value,
/// which smooth colouring needs.
#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, PartialEq)]
pub struct Escape {
    pub iteration_count: u32,
    pub current_value: Complex,
}

impl Escape {
    pub fn escaped(&self, max_iterations: u32) -> bool {
        self.iteration_count < max_iterations
    }
}
