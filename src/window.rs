//! A desktop window that shows the field.
//!
//! The grid is evaluated on the CPU for the current surface size and uploaded
//! as a texture, which a full-screen quad draws. The field only changes when
//! the window is resized, so the event loop waits between events.

use std::num::NonZeroU32;

use log::{debug, error, warn};
use winit::{
    dpi::PhysicalSize,
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::{Window, WindowBuilder},
};

use crate::{
    colour::Colour,
    commands::{self, CommandEncoderExt},
    evaluator::Evaluator,
    host::{self, HostError, SurfaceHost},
    screen,
    uniform::Uniform,
};

/// Texture holding the last presented grid, and the bind group that reads it.
struct Field {
    // Kept alive for `bind_group`.
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

pub struct WindowHost {
    surface: wgpu::Surface,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_configuration: wgpu::SurfaceConfiguration,
    render_pipeline: wgpu::RenderPipeline,
    sampler: wgpu::Sampler,
    screen_size: Uniform<screen::Size>,
    field: Option<Field>,
    // Dropped after `surface`.
    window: Window,
}

impl WindowHost {
    pub fn new(event_loop: &EventLoop<()>) -> Result<Self, HostError> {
        let window = WindowBuilder::new()
            .with_title("Mandelbrot")
            .build(event_loop)?;

        let instance = wgpu::Instance::new(wgpu::Backends::all());

        let size = window.inner_size();
        let surface = unsafe { instance.create_surface(&window) };

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: Default::default(),
            force_fallback_adapter: false,
            compatible_surface: Some(&surface),
        }))
        .ok_or(HostError::NoAdapter)?;
        debug!("adapter: {:?}", adapter.get_info());

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("device"),
                features: wgpu::Features::empty(),
                limits: wgpu::Limits::default(),
            },
            None,
        ))?;

        let format = surface
            .get_supported_formats(&adapter)
            .first()
            .copied()
            .ok_or(HostError::NoAdapter)?;

        let surface_configuration = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
        };
        surface.configure(&device, &surface_configuration);

        let render_pipeline = present_pipeline(&device, surface_configuration.format);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor::default());

        let screen_size = Uniform::new(
            &device,
            "screen-size-buffer",
            screen::Size::new(surface_configuration.width, surface_configuration.height),
        );

        Ok(Self {
            surface,
            device,
            queue,
            surface_configuration,
            render_pipeline,
            sampler,
            screen_size,
            field: None,
            window,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        debug!("resizing to {:?}", size);

        // A minimized window reports zero; keep the old configuration.
        if size.width == 0 || size.height == 0 {
            return;
        }

        self.surface_configuration.width = size.width;
        self.surface_configuration.height = size.height;
        self.surface
            .configure(&self.device, &self.surface_configuration);
        self.screen_size
            .write(&self.queue, screen::Size::new(size.width, size.height));
    }

    /// Draw the last presented grid.
    pub fn redraw(&mut self) -> Result<(), HostError> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(surface_texture) => surface_texture,
            Err(error) => {
                return match recovery(&error) {
                    Recovery::Reconfigure => {
                        warn!("{}, reconfiguring", error);
                        self.surface
                            .configure(&self.device, &self.surface_configuration);
                        self.window.request_redraw();
                        Ok(())
                    }
                    Recovery::SkipFrame => {
                        warn!("{}, skipping frame", error);
                        self.window.request_redraw();
                        Ok(())
                    }
                    Recovery::Fail => Err(error.into()),
                };
            }
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let command_buffer = commands::record(&self.device, "present-encoder", |command_encoder| {
            command_encoder.with_render_pass(
                &wgpu::RenderPassDescriptor {
                    label: Some("present-pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &surface_texture_view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                            store: true,
                        },
                    })],
                    depth_stencil_attachment: None,
                },
                |render_pass| {
                    if let Some(field) = &self.field {
                        render_pass.set_pipeline(&self.render_pipeline);
                        render_pass.set_bind_group(0, &field.bind_group, &[]);
                        render_pass.draw(0..4, 0..1);
                    }
                },
            )
        });

        self.queue.submit([command_buffer]);
        surface_texture.present();
        Ok(())
    }

    fn field_format(&self) -> wgpu::TextureFormat {
        // Match the surface's encoding so texels reach the screen unchanged.
        if self.surface_configuration.format.describe().srgb {
            wgpu::TextureFormat::Rgba8UnormSrgb
        } else {
            wgpu::TextureFormat::Rgba8Unorm
        }
    }

    fn upload(&self, size: screen::Size, colours: &[Colour]) -> Field {
        let extent = wgpu::Extent3d {
            width: size.width,
            height: size.height,
            depth_or_array_layers: 1,
        };

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("field-texture"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.field_format(),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        });

        let texels: Vec<[u8; 4]> = colours.iter().map(Colour::to_rgba8).collect();
        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(&texels),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: NonZeroU32::new(4 * size.width),
                rows_per_image: NonZeroU32::new(size.height),
            },
            extent,
        );

        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("present-bind-group"),
            layout: &self.render_pipeline.get_bind_group_layout(0),
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: self.screen_size.binding_resource(),
                },
            ],
        });

        Field {
            _texture: texture,
            bind_group,
        }
    }
}

/// What to do when the next surface texture can't be acquired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Recovery {
    Reconfigure,
    SkipFrame,
    Fail,
}

fn recovery(error: &wgpu::SurfaceError) -> Recovery {
    match error {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => Recovery::Reconfigure,
        wgpu::SurfaceError::Timeout => Recovery::SkipFrame,
        _ => Recovery::Fail,
    }
}

fn fragment_binding(binding: u32, ty: wgpu::BindingType) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty,
        count: None,
    }
}

/// Pipeline for `present.wgsl`: a four-vertex strip covering the surface,
/// sampling the field texture (0) with a nearest sampler (1), scaled by the
/// surface size uniform (2).
fn present_pipeline(device: &wgpu::Device, format: wgpu::TextureFormat) -> wgpu::RenderPipeline {
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("present.wgsl"),
        source: wgpu::ShaderSource::Wgsl(include_str!("present.wgsl").into()),
    });

    let field_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("field-layout"),
        entries: &[
            fragment_binding(
                0,
                wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: false },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
            ),
            fragment_binding(
                1,
                wgpu::BindingType::Sampler(wgpu::SamplerBindingType::NonFiltering),
            ),
            fragment_binding(
                2,
                wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
            ),
        ],
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("present-layout"),
        bind_group_layouts: &[&field_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("present"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &module,
            entry_point: "vertex_main",
            buffers: &[],
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleStrip,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: Default::default(),
        fragment: Some(wgpu::FragmentState {
            module: &module,
            entry_point: "fragment_main",
            targets: &[Some(format.into())],
        }),
        multiview: None,
    })
}

impl SurfaceHost for WindowHost {
    fn request_grid(&mut self) -> screen::Size {
        screen::Size::new(
            self.surface_configuration.width,
            self.surface_configuration.height,
        )
    }

    fn present(&mut self, size: screen::Size, colours: &[Colour]) -> Result<(), HostError> {
        host::check_buffer(size, colours)?;
        if size.is_empty() {
            return Ok(());
        }

        self.field = Some(self.upload(size, colours));
        self.redraw()
    }
}

/// Open a window and keep the field rendered until it is closed.
///
/// The grid is evaluated on `pool` at start-up and after every resize.
pub fn run(evaluator: Evaluator, pool: rayon::ThreadPool) -> Result<(), HostError> {
    let event_loop = EventLoop::new();
    let mut window_host = WindowHost::new(&event_loop)?;
    host::render_in(&pool, &evaluator, &mut window_host)?;

    event_loop.run(move |event, _, control_flow| {
        control_flow.set_wait();

        match event {
            Event::WindowEvent { window_id, event } if window_id == window_host.window().id() => {
                let resized = match event {
                    WindowEvent::CloseRequested => {
                        control_flow.set_exit();
                        None
                    }
                    WindowEvent::Resized(size) => Some(size),
                    WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                        Some(*new_inner_size)
                    }
                    _ => None,
                };

                if let Some(size) = resized {
                    window_host.resize(size);
                    if let Err(error) = host::render_in(&pool, &evaluator, &mut window_host) {
                        error!("failed to render: {}", error);
                        control_flow.set_exit_with_code(1);
                    }
                }
            }
            Event::RedrawRequested(window_id) if window_id == window_host.window().id() => {
                if let Err(error) = window_host.redraw() {
                    error!("failed to redraw: {}", error);
                    control_flow.set_exit_with_code(1);
                }
            }
            _ => {}
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_surface_is_reconfigured() {
        assert_eq!(recovery(&wgpu::SurfaceError::Lost), Recovery::Reconfigure);
        assert_eq!(recovery(&wgpu::SurfaceError::Outdated), Recovery::Reconfigure);
    }

    #[test]
    fn timeout_skips_the_frame() {
        assert_eq!(recovery(&wgpu::SurfaceError::Timeout), Recovery::SkipFrame);
    }

    #[test]
    fn out_of_memory_is_fatal() {
        assert_eq!(recovery(&wgpu::SurfaceError::OutOfMemory), Recovery::Fail);
    }
}
