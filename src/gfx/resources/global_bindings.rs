//! Global uniform bindings for camera and scene lighting
//!
//! One uniform buffer, bound at group 0 in every pipeline, carries the
//! camera matrices and the lights of the current scene.

use cgmath::{InnerSpace, Vector3};

use crate::{
    gfx::{camera::camera_utils::CameraUniform, scene::Light},
    wgpu_utils::{binding_types, uniform_buffer::UniformBuffer},
};

/// Global uniform buffer content.
/// MUST match the `Globals` struct in `scene.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
    /// rgb premultiplied by intensity
    ambient: [f32; 4],
    /// Unit vector pointing from the scene towards the light
    light_direction: [f32; 4],
    light_color: [f32; 4],
}

pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Lights of a scene reduced to what the shader consumes
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SceneLighting {
    pub ambient: [f32; 3],
    pub direction: [f32; 3],
    pub color: [f32; 3],
}

impl Default for SceneLighting {
    fn default() -> Self {
        Self {
            ambient: [0.0; 3],
            direction: [0.0, 1.0, 0.0],
            color: [0.0; 3],
        }
    }
}

impl SceneLighting {
    /// Ambient lights add up; the first directional light is used, the rest are ignored.
    pub fn from_lights(lights: &[Light]) -> Self {
        let mut lighting = Self::default();
        let mut directional = false;
        for light in lights {
            match *light {
                Light::Ambient { color, intensity } => {
                    for i in 0..3 {
                        lighting.ambient[i] += color[i] * intensity;
                    }
                }
                Light::Directional {
                    color,
                    intensity,
                    position,
                } if !directional => {
                    let towards = Vector3::from(position);
                    if towards.magnitude2() > 0.0 {
                        lighting.direction = towards.normalize().into();
                    }
                    lighting.color = color.map(|c| c * intensity);
                    directional = true;
                }
                Light::Directional { .. } => {}
            }
        }
        lighting
    }
}

pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: CameraUniform,
    lighting: &SceneLighting,
) {
    let [ar, ag, ab] = lighting.ambient;
    let [dx, dy, dz] = lighting.direction;
    let [lr, lg, lb] = lighting.color;
    let content = GlobalUBOContent {
        view_position: camera.view_position,
        view_proj: camera.view_proj,
        ambient: [ar, ag, ab, 1.0],
        light_direction: [dx, dy, dz, 0.0],
        light_color: [lr, lg, lb, 1.0],
    };
    ubo.update_content(queue, content);
}

/// Bind group layout and bind group for the global uniforms
pub struct GlobalBindings {
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Globals Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: binding_types::uniform(),
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Global Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.binding_resource(),
            }],
        });

        Self {
            bind_group_layout,
            bind_group,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
