//! WGPU-based rendering engine for the farm viewer
//!
//! Owns the window surface, device and pipelines, and keeps one GPU cache
//! entry per live [`ResourceHandle`]. Scene geometry and materials are
//! uploaded lazily the first time a frame references them and destroyed when
//! the lifecycle manager releases their handle.

use std::{collections::HashMap, sync::Arc};

use cgmath::{Matrix4, MetricSpace, Point3};
use wgpu::{util::DeviceExt, Device, TextureFormat};

use crate::{
    error::{FarmTwinError, RenderError},
    gfx::{
        camera::camera_utils::{CameraUniform, Projection},
        geometry::GeometryData,
        resources::{
            global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO, SceneLighting},
            handle::{ResourceBackend, ResourceHandle},
            material::{material_bind_group_layout, MaterialGpu},
            texture_resource::TextureResource,
        },
        viewport::{SurfaceAttachment, Viewport},
    },
    wgpu_utils::{binding_types, uniform_buffer::UniformBuffer},
};

use super::{
    pipeline_manager::{PipelineConfig, PipelineManager},
    render_loop::{FrameContext, FrameSink},
};

const OPAQUE_PIPELINE: &str = "Opaque";
const TRANSPARENT_PIPELINE: &str = "Transparent";
/// Samples per pixel of the colour and depth targets
const SAMPLE_COUNT: u32 = 4;

/// Per-object uniform: the world matrix of one drawable
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    model: [[f32; 4]; 4],
}

/// Vertex/index buffers plus the transform uniform of one geometry handle
struct GeometryGpu {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    transform: UniformBuffer<ObjectUniform>,
    bind_group: wgpu::BindGroup,
}

impl GeometryGpu {
    fn new(
        device: &Device,
        layout: &wgpu::BindGroupLayout,
        handle: ResourceHandle,
        geometry: &GeometryData,
    ) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("Vertex Buffer {handle}")),
            contents: bytemuck::cast_slice(&geometry.to_vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("Index Buffer {handle}")),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let transform = UniformBuffer::<ObjectUniform>::new(device);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("Transform Bind Group {handle}")),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: transform.binding_resource(),
            }],
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices.len() as u32,
            transform,
            bind_group,
        }
    }

    fn destroy(self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
        self.transform.buffer().destroy();
    }
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    msaa_texture: TextureResource,
    pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    transform_layout: wgpu::BindGroupLayout,
    material_layout: wgpu::BindGroupLayout,
    projection: Projection,
    geometries: HashMap<ResourceHandle, GeometryGpu>,
    materials: HashMap<ResourceHandle, MaterialGpu>,
    attachment: Option<u64>,
    next_attachment: u64,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    /// * `vsync` - Present with `Fifo` when set, `Immediate` otherwise
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<RenderEngine, FarmTwinError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .unwrap_or(TextureFormat::Bgra8Unorm);
        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: if vsync {
                wgpu::PresentMode::Fifo
            } else {
                wgpu::PresentMode::Immediate
            },
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!(
            "surface configured: {}x{} {:?} {:?}",
            config.width,
            config.height,
            format,
            config.present_mode
        );

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, SAMPLE_COUNT, "depth_texture");
        let msaa_texture =
            TextureResource::create_msaa_texture(&device, &config, SAMPLE_COUNT, "msaa_texture");

        let global_ubo = GlobalUBO::new(&device);
        let global_bindings = GlobalBindings::new(&device, &global_ubo);

        let transform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Transform Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: binding_types::uniform(),
                count: None,
            }],
        });
        let material_layout = material_bind_group_layout(&device);

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());
        pipeline_manager.load_shader("scene", include_str!("scene.wgsl"));

        let layouts = vec![
            global_bindings.bind_group_layout().clone(),
            transform_layout.clone(),
            material_layout.clone(),
        ];

        // Planes are seen from both sides, so nothing is culled
        pipeline_manager.register_pipeline(
            OPAQUE_PIPELINE,
            PipelineConfig::default()
                .with_label("OPAQUE")
                .with_shader("scene")
                .with_cull_mode(None)
                .with_depth(TextureResource::DEPTH_FORMAT, true)
                .with_sample_count(SAMPLE_COUNT)
                .with_bind_group_layouts(layouts.clone())
                .with_color_targets(vec![Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })]),
        );
        pipeline_manager.register_pipeline(
            TRANSPARENT_PIPELINE,
            PipelineConfig::default()
                .with_label("TRANSPARENT")
                .with_shader("scene")
                .with_cull_mode(None)
                .with_depth(TextureResource::DEPTH_FORMAT, false)
                .with_sample_count(SAMPLE_COUNT)
                .with_bind_group_layouts(layouts)
                .with_color_targets(vec![Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })]),
        );

        if let Err(errors) = pipeline_manager.create_all_pipelines() {
            for e in errors {
                log::error!("{}", e);
            }
        }
        log::debug!("{:?}", pipeline_manager.get_stats());

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            msaa_texture,
            pipeline_manager,
            global_ubo,
            global_bindings,
            transform_layout,
            material_layout,
            projection: Projection::new(width, height),
            geometries: HashMap::new(),
            materials: HashMap::new(),
            attachment: None,
            next_attachment: 0,
        })
    }

    /// Resizes the surface and recreates the depth buffer. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.projection.resize(width, height);
        self.reconfigure();
    }

    /// Reapplies the surface configuration, e.g. after the surface was lost.
    /// Both render targets are recreated at the new size.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = TextureResource::create_depth_texture(
            &self.device,
            &self.config,
            SAMPLE_COUNT,
            "depth_texture",
        );
        self.msaa_texture = TextureResource::create_msaa_texture(
            &self.device,
            &self.config,
            SAMPLE_COUNT,
            "msaa_texture",
        );
    }

    /// Uploads any drawable of the frame that is not yet on the GPU and
    /// refreshes its world matrix.
    fn upload(&mut self, frame: &FrameContext<'_>) {
        for (drawable, world) in frame.scene.drawables() {
            let geometry = self
                .geometries
                .entry(drawable.geometry_handle)
                .or_insert_with(|| {
                    GeometryGpu::new(
                        &self.device,
                        &self.transform_layout,
                        drawable.geometry_handle,
                        &drawable.geometry,
                    )
                });
            geometry
                .transform
                .update_content(&self.queue, ObjectUniform { model: world.into() });

            for slot in drawable.materials.slots() {
                self.materials.entry(slot.handle).or_insert_with(|| {
                    MaterialGpu::new(
                        &self.device,
                        &self.queue,
                        &self.material_layout,
                        &slot.material,
                    )
                });
            }
        }
    }
}

impl Viewport for RenderEngine {
    fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn attach_surface(&mut self) -> SurfaceAttachment {
        let id = self.next_attachment;
        self.next_attachment += 1;
        if let Some(previous) = self.attachment.replace(id) {
            log::warn!("surface attachment {} replaced without detach", previous);
        }
        self.reconfigure();
        SurfaceAttachment::new(id)
    }

    fn detach_surface(&mut self, attachment: SurfaceAttachment) {
        if self.attachment == Some(attachment.id()) {
            self.attachment = None;
        }
    }
}

impl ResourceBackend for RenderEngine {
    fn release(&mut self, handle: ResourceHandle) {
        if let Some(geometry) = self.geometries.remove(&handle) {
            geometry.destroy();
        }
        if let Some(material) = self.materials.remove(&handle) {
            material.destroy();
        }
    }
}

struct DrawItem<'a> {
    geometry: &'a GeometryGpu,
    material: &'a MaterialGpu,
    distance: f32,
}

impl FrameSink for RenderEngine {
    fn draw(&mut self, frame: &FrameContext<'_>) -> Result<(), RenderError> {
        if self.attachment.is_none() {
            return Err(RenderError::Detached);
        }

        let camera = CameraUniform::from_pose(&frame.pose, &self.projection);
        let lighting = SceneLighting::from_lights(&frame.scene.lights());
        update_global_ubo(&mut self.global_ubo, &self.queue, camera, &lighting);
        self.upload(frame);

        let surface_texture = self.surface.get_current_texture()?;
        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut opaque = Vec::new();
        let mut transparent = Vec::new();
        for (drawable, world) in frame.scene.drawables() {
            let Some(slot) = drawable.materials.primary() else {
                continue;
            };
            let (Some(geometry), Some(material)) = (
                self.geometries.get(&drawable.geometry_handle),
                self.materials.get(&slot.handle),
            ) else {
                continue;
            };
            let item = DrawItem {
                geometry,
                material,
                distance: frame.pose.position.distance(origin_of(&world)),
            };
            if slot.material.transparent {
                transparent.push(item);
            } else {
                opaque.push(item);
            }
        }
        // Back to front so blending composes correctly
        transparent.sort_by(|a, b| b.distance.total_cmp(&a.distance));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let [r, g, b] = frame.scene.background;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.msaa_texture.view,
                    resolve_target: Some(&surface_texture_view),
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        // Only the resolved surface texture is presented
                        store: wgpu::StoreOp::Discard,
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
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            let passes = [
                (OPAQUE_PIPELINE, &opaque),
                (TRANSPARENT_PIPELINE, &transparent),
            ];
            for (pipeline_name, items) in passes {
                let Some(pipeline) = self.pipeline_manager.get_pipeline(pipeline_name) else {
                    log::warn!(
                        "pipeline '{}' missing, skipping {} draws",
                        pipeline_name,
                        items.len()
                    );
                    continue;
                };
                render_pass.set_pipeline(pipeline);
                for item in items.iter() {
                    render_pass.set_bind_group(1, &item.geometry.bind_group, &[]);
                    render_pass.set_bind_group(2, item.material.bind_group(), &[]);
                    render_pass.set_vertex_buffer(0, item.geometry.vertex_buffer.slice(..));
                    render_pass.set_index_buffer(
                        item.geometry.index_buffer.slice(..),
                        wgpu::IndexFormat::Uint32,
                    );
                    render_pass.draw_indexed(0..item.geometry.index_count, 0, 0..1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();

        log::trace!(
            "frame {}: {} opaque, {} transparent",
            frame.frame_index,
            opaque.len(),
            transparent.len()
        );
        Ok(())
    }
}

fn origin_of(world: &Matrix4<f32>) -> Point3<f32> {
    Point3::new(world.w.x, world.w.y, world.w.z)
}
