//! Main renderer managing wgpu state and rendering.

use crate::{
    camera::{Camera, CameraUniform},
    mesh::{LineLoops, Mesh, PointCloud},
    pipeline::{
        create_body_pipeline, create_label_pipeline, create_line_pipeline, create_overlay_pipeline,
        create_scene_bind_group_layout, create_texture_bind_group_layout,
    },
    texture::Texture,
    vertex::{BodyInstance, LabelInstance, OverlayVertex},
};
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use image::RgbaImage;
use std::sync::Arc;
use thiserror::Error;
use wgpu::util::DeviceExt;
use winit::window::Window;

/// Sphere tessellation shared by every body; instances scale it to their radius.
const SPHERE_SEGMENTS: u32 = 48;
const SPHERE_RINGS: u32 = 32;

/// Errors raised while setting up or driving the GPU.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter found")]
    NoAdapter,
    #[error("surface reports no supported formats")]
    IncompatibleSurface,
    #[error("failed to acquire GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("GPU ran out of memory")]
    OutOfMemory,
}

/// Scene lights (must match `Lights` in body.wgsl).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct LightUniform {
    /// rgb = ambient color, w unused
    pub ambient: [f32; 4],
    /// xyz = point light position, w = intensity
    pub point_position: [f32; 4],
    /// rgb = point light color, w = range (0 = unlimited)
    pub point_color: [f32; 4],
}

impl LightUniform {
    pub fn new(ambient: [f32; 3], position: Vec3, color: [f32; 3], intensity: f32, range: f32) -> Self {
        Self {
            ambient: [ambient[0], ambient[1], ambient[2], 0.0],
            point_position: [position.x, position.y, position.z, intensity],
            point_color: [color[0], color[1], color[2], range],
        }
    }
}

impl Default for LightUniform {
    fn default() -> Self {
        Self::new([0.0; 3], Vec3::ZERO, [1.0; 3], 1.0, 0.0)
    }
}

/// Static geometry uploaded once per session.
pub struct SceneGeometry<'a> {
    pub stars: &'a [Vec3],
    pub star_color: [f32; 4],
    pub rings: &'a [Vec<Vec3>],
    pub ring_color: [f32; 4],
    pub label_atlas: &'a RgbaImage,
}

/// Per-instance vertex buffer that grows to fit the largest frame seen.
struct InstanceBuffer {
    buffer: wgpu::Buffer,
    capacity: usize,
    label: &'static str,
}

impl InstanceBuffer {
    fn new<T: Pod>(device: &wgpu::Device, capacity: usize, label: &'static str) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (capacity.max(1) * std::mem::size_of::<T>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self { buffer, capacity: capacity.max(1), label }
    }

    fn write<T: Pod>(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, data: &[T]) {
        if data.len() > self.capacity {
            *self = Self::new::<T>(device, data.len().next_power_of_two(), self.label);
        }
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(data));
    }
}

/// Owns the surface, device and every pipeline used to draw the scene.
pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    window: Arc<Window>,

    camera_uniform: CameraUniform,
    camera_buffer: wgpu::Buffer,
    light_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    texture_bind_group_layout: wgpu::BindGroupLayout,

    body_pipeline: wgpu::RenderPipeline,
    point_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    label_pipeline: wgpu::RenderPipeline,
    overlay_pipeline: wgpu::RenderPipeline,
    overlay_bind_group: wgpu::BindGroup,

    depth_texture: Texture,
    sphere: Mesh,
    body_instances: InstanceBuffer,
    label_instances: InstanceBuffer,

    stars: Option<PointCloud>,
    orbits: Option<LineLoops>,
    label_bind_group: Option<wgpu::BindGroup>,
}

impl Renderer {
    /// Create a new renderer for the given window.
    pub async fn new(window: Arc<Window>, vsync: bool) -> Result<Self, RenderError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;

        log::info!("Using GPU: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(RenderError::IncompatibleSurface)?;

        // Prefer Mailbox (low-latency vsync) if available; otherwise AutoVsync.
        let present_mode = if vsync {
            surface_caps
                .present_modes
                .iter()
                .find(|m| matches!(m, wgpu::PresentMode::Mailbox))
                .copied()
                .unwrap_or(wgpu::PresentMode::AutoVsync)
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::debug!("Surface {:?} {}x{} {:?}", surface_format, config.width, config.height, present_mode);

        let camera_uniform = CameraUniform::new();
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let light_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Light Buffer"),
            contents: bytemuck::cast_slice(&[LightUniform::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let scene_bind_group_layout = create_scene_bind_group_layout(&device);
        let texture_bind_group_layout = create_texture_bind_group_layout(&device);

        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &scene_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: light_buffer.as_entire_binding(),
                },
            ],
        });

        let body_pipeline = create_body_pipeline(&device, config.format, &scene_bind_group_layout);
        let point_pipeline = create_line_pipeline(
            &device,
            config.format,
            &scene_bind_group_layout,
            wgpu::PrimitiveTopology::PointList,
        );
        let line_pipeline = create_line_pipeline(
            &device,
            config.format,
            &scene_bind_group_layout,
            wgpu::PrimitiveTopology::LineStrip,
        );
        let label_pipeline =
            create_label_pipeline(&device, config.format, &scene_bind_group_layout, &texture_bind_group_layout);
        let overlay_pipeline = create_overlay_pipeline(&device, config.format, &texture_bind_group_layout);

        let font_atlas = Texture::font_atlas(&device, &queue);
        let overlay_bind_group = font_atlas.bind_group(&device, &texture_bind_group_layout, "Overlay Bind Group");

        let depth_texture = Texture::create_depth_texture(&device, config.width, config.height, "Depth Texture");
        let sphere = Mesh::sphere(&device, 1.0, SPHERE_SEGMENTS, SPHERE_RINGS);
        let body_instances = InstanceBuffer::new::<BodyInstance>(&device, 16, "Body Instance Buffer");
        let label_instances = InstanceBuffer::new::<LabelInstance>(&device, 16, "Label Instance Buffer");

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            window,
            camera_uniform,
            camera_buffer,
            light_buffer,
            scene_bind_group,
            texture_bind_group_layout,
            body_pipeline,
            point_pipeline,
            line_pipeline,
            label_pipeline,
            overlay_pipeline,
            overlay_bind_group,
            depth_texture,
            sphere,
            body_instances,
            label_instances,
            stars: None,
            orbits: None,
            label_bind_group: None,
        })
    }

    /// Upload the starfield, orbit rings and label atlas. Replaces any previous upload.
    pub fn upload_scene(&mut self, geometry: &SceneGeometry<'_>) {
        self.stars = Some(PointCloud::new(&self.device, geometry.stars, geometry.star_color));
        self.orbits = Some(LineLoops::new(&self.device, geometry.rings, geometry.ring_color));
        let atlas = Texture::from_rgba(&self.device, &self.queue, geometry.label_atlas, "Label Atlas");
        self.label_bind_group =
            Some(atlas.bind_group(&self.device, &self.texture_bind_group_layout, "Label Bind Group"));
        log::info!(
            "Uploaded scene: {} stars, {} orbit rings, label atlas {}x{}",
            geometry.stars.len(),
            geometry.rings.len(),
            geometry.label_atlas.width(),
            geometry.label_atlas.height()
        );
    }

    pub fn set_lights(&self, lights: &LightUniform) {
        self.queue
            .write_buffer(&self.light_buffer, 0, bytemuck::cast_slice(&[*lights]));
    }

    /// Update camera uniform.
    pub fn update_camera(&mut self, camera: &Camera) {
        self.camera_uniform.update(camera);
        self.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera_uniform]),
        );
    }

    /// Handle window resize. Zero-sized (minimized) windows are ignored.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = Texture::create_depth_texture(
                &self.device,
                self.config.width,
                self.config.height,
                "Depth Texture",
            );
        }
    }

    /// Begin a new frame. Returns `Ok(None)` when this frame should be skipped
    /// (surface lost, outdated or timed out); the surface is reconfigured as needed.
    pub fn begin_frame(&mut self) -> Result<Option<(wgpu::SurfaceTexture, wgpu::CommandEncoder)>, RenderError> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.resize(self.size);
                return Ok(None);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(e) => {
                log::warn!("Skipping frame: {}", e);
                return Ok(None);
            }
        };
        let encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
        Ok(Some((output, encoder)))
    }

    /// Draw the starfield, orbit rings, bodies and labels into `view`, clearing it first.
    pub fn render_scene(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        bodies: &[BodyInstance],
        labels: &[LabelInstance],
    ) {
        if !bodies.is_empty() {
            self.body_instances.write(&self.device, &self.queue, bodies);
        }
        if !labels.is_empty() {
            self.label_instances.write(&self.device, &self.queue, labels);
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        render_pass.set_bind_group(0, &self.scene_bind_group, &[]);

        if let Some(stars) = &self.stars {
            render_pass.set_pipeline(&self.point_pipeline);
            render_pass.set_vertex_buffer(0, stars.buffer.slice(..));
            render_pass.draw(0..stars.count, 0..1);
        }

        if let Some(orbits) = &self.orbits {
            render_pass.set_pipeline(&self.line_pipeline);
            render_pass.set_vertex_buffer(0, orbits.buffer.slice(..));
            for range in &orbits.ranges {
                render_pass.draw(range.clone(), 0..1);
            }
        }

        if !bodies.is_empty() {
            render_pass.set_pipeline(&self.body_pipeline);
            render_pass.set_vertex_buffer(0, self.sphere.vertex_buffer.slice(..));
            render_pass.set_vertex_buffer(1, self.body_instances.buffer.slice(..));
            render_pass.set_index_buffer(self.sphere.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..self.sphere.num_indices, 0, 0..bodies.len() as u32);
        }

        // Labels last: they blend over everything else.
        if let Some(label_bind_group) = self.label_bind_group.as_ref().filter(|_| !labels.is_empty()) {
            render_pass.set_pipeline(&self.label_pipeline);
            render_pass.set_bind_group(1, label_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.label_instances.buffer.slice(..));
            render_pass.draw(0..6, 0..labels.len() as u32);
        }
    }

    /// Render screen-space overlay. Call as the very last pass before end_frame.
    /// Takes pre-built overlay vertices and indices from an `OverlayTextBuilder`.
    pub fn render_overlay(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        vertices: &[OverlayVertex],
        indices: &[u32],
    ) {
        if vertices.is_empty() || indices.is_empty() {
            return;
        }

        let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Overlay Vertex Buffer"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Overlay Index Buffer"),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Overlay Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_pipeline(&self.overlay_pipeline);
        render_pass.set_bind_group(0, &self.overlay_bind_group, &[]);
        render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
        render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..indices.len() as u32, 0, 0..1);
    }

    /// End frame and present.
    pub fn end_frame(&self, output: wgpu::SurfaceTexture, encoder: wgpu::CommandEncoder) {
        self.queue.submit(std::iter::once(encoder.finish()));
        self.window.pre_present_notify();
        output.present();
    }

    /// Get surface dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_uniform_packs_intensity_and_range() {
        let light = LightUniform::new([0.05; 3], Vec3::new(1.0, 2.0, 3.0), [1.0; 3], 2.0, 500.0);
        assert_eq!(light.point_position, [1.0, 2.0, 3.0, 2.0]);
        assert_eq!(light.point_color[3], 500.0);
        assert_eq!(std::mem::size_of::<LightUniform>(), 48);
    }
}
