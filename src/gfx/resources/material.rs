//! Material system for the farm scene
//!
//! Materials are plain colour descriptions (no textures, no PBR terms). Each
//! drawable owns its materials; the render engine turns them into uniform
//! buffers keyed by the owning [`ResourceHandle`](super::handle::ResourceHandle).

use wgpu::Device;

use crate::wgpu_utils::{binding_types, uniform_buffer::UniformBuffer};

/// GPU uniform data for materials
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    /// 1.0 skips lighting entirely
    pub unlit: f32,
    _padding: [f32; 3],
}

pub type MaterialUBO = UniformBuffer<MaterialUniform>;

/// Material definition. Faces are never culled, so every surface shows both sides.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub base_color: [f32; 4],
    pub transparent: bool,
    pub unlit: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            base_color: [0.8, 0.8, 0.8, 1.0],
            transparent: false,
            unlit: false,
        }
    }
}

impl Material {
    /// Creates a new opaque, lit material
    ///
    /// # Arguments
    /// * `name` - Debug name for this material
    /// * `base_color` - RGBA base color
    pub fn new(name: &str, base_color: [f32; 4]) -> Self {
        Self {
            name: name.to_string(),
            base_color,
            ..Default::default()
        }
    }

    /// Creates an opaque material from a `0xRRGGBB` colour
    pub fn from_hex(name: &str, hex: u32) -> Self {
        let [r, g, b] = hex_to_rgb(hex);
        Self::new(name, [r, g, b, 1.0])
    }

    /// Builder pattern: Make the material translucent with the given opacity
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.base_color[3] = opacity.clamp(0.0, 1.0);
        self.transparent = true;
        self
    }

    /// Builder pattern: Ignore scene lights
    pub fn unlit(mut self) -> Self {
        self.unlit = true;
        self
    }

    pub fn uniform(&self) -> MaterialUniform {
        MaterialUniform {
            base_color: self.base_color,
            unlit: if self.unlit { 1.0 } else { 0.0 },
            _padding: [0.0; 3],
        }
    }
}

/// Converts a `0xRRGGBB` colour into linear-ish float components
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Material bind group layout shared by every material
pub fn material_bind_group_layout(device: &Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Material Bind Group Layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: binding_types::uniform(),
            count: None,
        }],
    })
}

/// GPU resources for one material
pub struct MaterialGpu {
    ubo: MaterialUBO,
    bind_group: wgpu::BindGroup,
}

impl MaterialGpu {
    pub fn new(
        device: &Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        material: &Material,
    ) -> Self {
        let mut ubo = MaterialUBO::new(device);
        ubo.update_content(queue, material.uniform());

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("Material Bind Group: {}", material.name)),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.binding_resource(),
            }],
        });

        Self { ubo, bind_group }
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    /// Frees the uniform buffer immediately instead of waiting for drop
    pub fn destroy(self) {
        self.ubo.buffer().destroy();
    }
}
