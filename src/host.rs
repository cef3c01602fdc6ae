//! The boundary between the evaluator and whatever displays its output.

use log::debug;
use thiserror::Error;

use crate::{colour::Colour, evaluator::Evaluator, grid, screen};

#[derive(Debug, Error)]
pub enum HostError {
    #[error("colour buffer holds {actual} cells, grid {size:?} needs {}", .size.area())]
    BufferSize { size: screen::Size, actual: usize },

    #[error("no suitable GPU adapter")]
    NoAdapter,

    #[error("failed to create device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),

    #[error("failed to acquire surface texture: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
}

/// Something that samples the field and shows the result.
///
/// The host decides the grid size and owns the final image. Colours arrive
/// unclamped; clamping and any format conversion are the host's job.
pub trait SurfaceHost {
    /// Size of the grid the host wants evaluated next.
    fn request_grid(&mut self) -> screen::Size;

    /// Show a row-major buffer of `size.area()` colours.
    fn present(&mut self, size: screen::Size, colours: &[Colour]) -> Result<(), HostError>;
}

pub(crate) fn check_buffer(size: screen::Size, colours: &[Colour]) -> Result<(), HostError> {
    if colours.len() != size.area() {
        return Err(HostError::BufferSize {
            size,
            actual: colours.len(),
        });
    }
    Ok(())
}

/// Evaluate one frame for `host` and present it.
pub fn render<H: SurfaceHost + ?Sized>(evaluator: &Evaluator, host: &mut H) -> Result<(), HostError> {
    let size = host.request_grid();
    debug!("rendering {}x{}", size.width, size.height);
    let colours = grid::evaluate_parallel(evaluator, size);
    host.present(size, &colours)
}

/// [`render`], with the grid evaluated on `pool` rather than the global pool.
///
/// Only the evaluation runs on the pool; `present` stays on the calling
/// thread, so the host need not be `Send`.
pub fn render_in<H: SurfaceHost + ?Sized>(
    pool: &rayon::ThreadPool,
    evaluator: &Evaluator,
    host: &mut H,
) -> Result<(), HostError> {
    let size = host.request_grid();
    debug!(
        "rendering {}x{} on {} workers",
        size.width,
        size.height,
        pool.current_num_threads()
    );
    let colours = pool.install(|| grid::evaluate_parallel(evaluator, size));
    host.present(size, &colours)
}

/// A presented frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub size: screen::Size,
    pub colours: Vec<Colour>,
}

impl Frame {
    pub fn get(&self, px: u32, py: u32) -> Option<Colour> {
        if px >= self.size.width || py >= self.size.height {
            return None;
        }
        self.colours
            .get(py as usize * self.size.width as usize + px as usize)
            .copied()
    }

    /// Clamped 8-bit RGBA bytes, row-major.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let pixels: Vec<[u8; 4]> = self.colours.iter().map(Colour::to_rgba8).collect();
        bytemuck::cast_slice(&pixels).to_vec()
    }
}

/// Host that keeps every presented frame in memory.
pub struct MemoryHost {
    size: screen::Size,
    frames: Vec<Frame>,
}

impl MemoryHost {
    pub fn new(size: screen::Size) -> Self {
        Self {
            size,
            frames: Vec::new(),
        }
    }

    pub fn resize(&mut self, size: screen::Size) {
        self.size = size;
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }
}

impl SurfaceHost for MemoryHost {
    fn request_grid(&mut self) -> screen::Size {
        self.size
    }

    fn present(&mut self, size: screen::Size, colours: &[Colour]) -> Result<(), HostError> {
        check_buffer(size, colours)?;
        self.frames.push(Frame {
            size,
            colours: colours.to_vec(),
        });
        Ok(())
    }
}
