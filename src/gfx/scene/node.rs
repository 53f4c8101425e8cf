use cgmath::{Matrix4, SquareMatrix};

use crate::gfx::{
    geometry::GeometryData,
    resources::{handle::ResourceHandle, material::Material},
};

/// What a node stands for in the farm scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    Root,
    Ground,
    Plot,
    Label,
    /// All plants of one field
    PlantGroup,
    /// One plant instance inside a plant group
    Plant,
    PlantPart,
    Light,
}

/// Scene lights. Colours are linear RGB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient {
        color: [f32; 3],
        intensity: f32,
    },
    Directional {
        color: [f32; 3],
        intensity: f32,
        position: [f32; 3],
    },
}

/// A material together with the handle of its GPU uniform
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialSlot {
    pub material: Material,
    pub handle: ResourceHandle,
}

/// Materials of one drawable: a single value or a list
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialSet {
    Single(MaterialSlot),
    List(Vec<MaterialSlot>),
}

impl MaterialSet {
    pub fn slots(&self) -> &[MaterialSlot] {
        match self {
            MaterialSet::Single(slot) => std::slice::from_ref(slot),
            MaterialSet::List(slots) => slots,
        }
    }

    /// The material used for drawing. Lists draw with their first entry.
    pub fn primary(&self) -> Option<&MaterialSlot> {
        self.slots().first()
    }
}

/// Geometry plus materials, each backed by its own GPU handle
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    pub geometry: GeometryData,
    pub geometry_handle: ResourceHandle,
    pub materials: MaterialSet,
}

impl Drawable {
    /// Every handle this drawable owns, geometry first
    pub fn handles(&self) -> impl Iterator<Item = ResourceHandle> + '_ {
        std::iter::once(self.geometry_handle).chain(self.materials.slots().iter().map(|s| s.handle))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Group,
    Mesh(Drawable),
    Light(Light),
}

/// One node of the scene tree. Owns its children and at most one drawable.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub name: String,
    pub role: NodeRole,
    /// Transform relative to the parent node
    pub transform: Matrix4<f32>,
    pub kind: NodeKind,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn group(name: impl Into<String>, role: NodeRole, transform: Matrix4<f32>) -> Self {
        Self {
            name: name.into(),
            role,
            transform,
            kind: NodeKind::Group,
            children: Vec::new(),
        }
    }

    pub fn mesh(
        name: impl Into<String>,
        role: NodeRole,
        transform: Matrix4<f32>,
        drawable: Drawable,
    ) -> Self {
        Self {
            name: name.into(),
            role,
            transform,
            kind: NodeKind::Mesh(drawable),
            children: Vec::new(),
        }
    }

    pub fn light(name: impl Into<String>, light: Light) -> Self {
        let transform = match light {
            Light::Directional { position, .. } => Matrix4::from_translation(position.into()),
            Light::Ambient { .. } => Matrix4::identity(),
        };
        Self {
            name: name.into(),
            role: NodeRole::Light,
            transform,
            kind: NodeKind::Light(light),
            children: Vec::new(),
        }
    }

    pub fn add_child(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    pub fn drawable(&self) -> Option<&Drawable> {
        match &self.kind {
            NodeKind::Mesh(drawable) => Some(drawable),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        geometry::generate_sphere,
        resources::handle::{ResourceKind, ResourceTracker},
    };

    #[test]
    fn material_lists_own_every_handle() {
        let mut tracker = ResourceTracker::new();
        let geometry_handle = tracker.allocate(ResourceKind::Geometry);
        let slots: Vec<_> = ["inner", "outer"]
            .iter()
            .map(|name| MaterialSlot {
                material: Material::from_hex(name, 0xd4af37),
                handle: tracker.allocate(ResourceKind::Material),
            })
            .collect();
        let drawable = Drawable {
            geometry: generate_sphere(0.15, 8, 8),
            geometry_handle,
            materials: MaterialSet::List(slots),
        };

        let handles: Vec<_> = drawable.handles().collect();
        assert_eq!(handles.len(), 3);
        assert_eq!(handles[0], geometry_handle);
        assert_eq!(drawable.materials.primary().map(|s| s.material.name.as_str()), Some("inner"));
    }

    #[test]
    fn empty_material_list_has_no_primary() {
        assert!(MaterialSet::List(Vec::new()).primary().is_none());
    }

    #[test]
    fn directional_light_sits_at_its_position() {
        let node = SceneNode::light(
            "sun",
            Light::Directional {
                color: [1.0; 3],
                intensity: 0.8,
                position: [10.0, 10.0, 5.0],
            },
        );
        assert_eq!(node.role, NodeRole::Light);
        assert_eq!(node.transform.w.truncate(), [10.0, 10.0, 5.0].into());
    }
}
