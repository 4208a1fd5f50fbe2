//! wgpu drawing surface.

mod camera;
mod connections;
mod shaders;

use std::sync::Arc;
use std::time::Instant;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;
use winit::window::Window;

pub use camera::Camera;
pub use shaders::{link_shader, point_shader};

use crate::error::{GpuError, SceneError};
use crate::links::LinkSegment;
use crate::particle::ParticleGpu;
use crate::scene::{Frame, SceneCapacity};
use crate::surface::DrawSurface;
use connections::{segment_buffer_size, LinkPipeline};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.05,
    a: 1.0,
};
/// Alpha multiplier applied to every link.
const LINK_ALPHA: f32 = 0.5;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    point_color: [f32; 4],
    link_color: [f32; 4],
    time: f32,
    _padding: [f32; 3],
}

/// Everything created against the device. Dropped as a unit on release.
struct GpuContext {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    point_pipeline: wgpu::RenderPipeline,
    point_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    links: LinkPipeline,
    depth_texture: wgpu::TextureView,
}

/// A window-backed [`DrawSurface`].
pub struct GpuSurface {
    context: Option<GpuContext>,
    capacity: SceneCapacity,
    pub camera: Camera,
    start_time: Instant,
    instances: Vec<ParticleGpu>,
    segments: Vec<LinkSegment>,
}

impl GpuSurface {
    /// Create a surface on `window` with buffers sized for `capacity`,
    /// framing a scene of radius `extent`.
    pub async fn new(
        window: Arc<Window>,
        capacity: SceneCapacity,
        extent: f32,
    ) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        check_limits(&capacity, &device.limits())?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = create_depth_texture(&device, &config);

        let point_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Point Buffer"),
            size: point_buffer_size(capacity.points),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::bytes_of(&Uniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let point_pipeline =
            create_point_pipeline(&device, &uniform_bind_group_layout, surface_format);
        let links = LinkPipeline::new(&device, &uniform_buffer, capacity.links, surface_format);

        log::info!(
            "gpu surface ready: {} ({:?}), {}x{}, {} points, {} links",
            adapter.get_info().name,
            surface_format,
            config.width,
            config.height,
            capacity.points,
            capacity.links
        );

        Ok(Self {
            context: Some(GpuContext {
                surface,
                device,
                queue,
                config,
                point_pipeline,
                point_buffer,
                uniform_buffer,
                uniform_bind_group,
                links,
                depth_texture,
            }),
            capacity,
            camera: Camera::framing(extent),
            start_time: Instant::now(),
            instances: Vec::with_capacity(capacity.points),
            segments: Vec::with_capacity(capacity.links),
        })
    }

    pub fn is_released(&self) -> bool {
        self.context.is_none()
    }
}

impl DrawSurface for GpuSurface {
    fn resize(&mut self, width: u32, height: u32) {
        let Some(ctx) = self.context.as_mut() else {
            return;
        };
        if width > 0 && height > 0 {
            ctx.config.width = width;
            ctx.config.height = height;
            ctx.surface.configure(&ctx.device, &ctx.config);
            ctx.depth_texture = create_depth_texture(&ctx.device, &ctx.config);
        }
    }

    fn draw(&mut self, frame: &Frame<'_>) -> Result<(), SceneError> {
        let Some(ctx) = self.context.as_mut() else {
            return Err(SceneError::Draw {
                tick: frame.tick,
                reason: "surface already released".to_string(),
            });
        };

        self.camera.advance_spin();

        self.instances.clear();
        self.instances.extend(
            frame
                .points
                .iter()
                .take(self.capacity.points)
                .map(|&p| ParticleGpu::from(p)),
        );
        self.segments.clear();
        self.segments.extend(
            frame
                .links
                .iter()
                .filter_map(|link| LinkSegment::resolve(link, frame.points))
                .take(self.capacity.links),
        );

        let aspect = ctx.config.width as f32 / ctx.config.height as f32;
        let uniforms = Uniforms {
            view_proj: self.camera.view_proj(aspect).to_cols_array_2d(),
            point_color: frame.style.point_color.extend(frame.style.point_size).to_array(),
            link_color: frame.style.link_color.extend(LINK_ALPHA).to_array(),
            time: self.start_time.elapsed().as_secs_f32(),
            _padding: [0.0; 3],
        };
        ctx.queue
            .write_buffer(&ctx.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        if !self.instances.is_empty() {
            ctx.queue
                .write_buffer(&ctx.point_buffer, 0, bytemuck::cast_slice(&self.instances));
        }
        ctx.links.upload(&ctx.queue, &self.segments);

        let output = match ctx.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                ctx.surface.configure(&ctx.device, &ctx.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::debug!("frame {} skipped: surface timeout", frame.tick);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            ctx.links.draw(&mut render_pass);

            if !self.instances.is_empty() {
                render_pass.set_pipeline(&ctx.point_pipeline);
                render_pass.set_bind_group(0, &ctx.uniform_bind_group, &[]);
                render_pass.set_vertex_buffer(0, ctx.point_buffer.slice(..));
                render_pass.draw(0..6, 0..self.instances.len() as u32);
            }
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn release(&mut self) {
        if let Some(ctx) = self.context.take() {
            ctx.point_buffer.destroy();
            ctx.uniform_buffer.destroy();
            ctx.links.destroy();
            log::info!("gpu surface released");
        }
    }
}

impl Drop for GpuSurface {
    fn drop(&mut self) {
        self.release();
    }
}

fn point_buffer_size(points: usize) -> u64 {
    (points.max(1) as u64).saturating_mul(std::mem::size_of::<ParticleGpu>() as u64)
}

/// Reject capacities whose buffers the device cannot create.
fn check_limits(capacity: &SceneCapacity, limits: &wgpu::Limits) -> Result<(), GpuError> {
    let points = point_buffer_size(capacity.points);
    if points > limits.max_buffer_size {
        return Err(GpuError::BufferTooLarge {
            buffer: "point",
            size: points,
            limit: limits.max_buffer_size,
        });
    }

    // The segment buffer is bound whole as a storage buffer.
    let segments = segment_buffer_size(capacity.links);
    let segment_limit = limits
        .max_buffer_size
        .min(u64::from(limits.max_storage_buffer_binding_size));
    if segments > segment_limit {
        return Err(GpuError::BufferTooLarge {
            buffer: "link",
            size: segments,
            limit: segment_limit,
        });
    }

    Ok(())
}

fn create_point_pipeline(
    device: &wgpu::Device,
    uniform_bind_group_layout: &wgpu::BindGroupLayout,
    surface_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let shader_src = point_shader();
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Point Render Shader"),
        source: wgpu::ShaderSource::Wgsl(shader_src.into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Point Pipeline Layout"),
        bind_group_layouts: &[uniform_bind_group_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Point Render Pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<ParticleGpu>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                }],
            }],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn create_depth_texture(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_layout_matches_wgsl() {
        // mat4 (64) + two vec4 (32) + f32, rounded up to 16-byte alignment.
        assert_eq!(std::mem::size_of::<Uniforms>(), 112);
    }

    #[test]
    fn test_default_capacity_fits_default_limits() {
        let capacity = SceneCapacity {
            points: 120,
            links: 4096,
        };
        assert!(check_limits(&capacity, &wgpu::Limits::default()).is_ok());
    }

    #[test]
    fn test_oversized_link_buffer_is_rejected() {
        // 5M links at 32 bytes each exceed the 128 MiB storage binding limit.
        let capacity = SceneCapacity {
            points: 4000,
            links: 5_000_000,
        };
        let limits = wgpu::Limits::default();
        match check_limits(&capacity, &limits) {
            Err(GpuError::BufferTooLarge {
                buffer: "link",
                size,
                limit,
            }) => {
                assert_eq!(size, 160_000_000);
                assert_eq!(limit, u64::from(limits.max_storage_buffer_binding_size));
            }
            other => panic!("expected link buffer rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_oversized_point_buffer_is_rejected() {
        let capacity = SceneCapacity {
            points: usize::MAX / 2,
            links: 1,
        };
        assert!(matches!(
            check_limits(&capacity, &wgpu::Limits::default()),
            Err(GpuError::BufferTooLarge {
                buffer: "point",
                ..
            })
        ));
    }
}
