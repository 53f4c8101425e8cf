//! Turns a field list into a scene graph
//!
//! Layout: a 20x20 ground plane, then per field a translucent plot, its plant
//! group and a label plate, then the two scene lights. Fields are placed in
//! two columns by index.

use std::f32::consts::FRAC_PI_2;

use cgmath::{Matrix4, Rad, Vector3};

use crate::gfx::{
    geometry::{generate_plane, GeometryData},
    resources::{
        handle::{ResourceKind, ResourceTracker},
        material::{hex_to_rgb, Material},
    },
    scene::{Drawable, Light, MaterialSet, MaterialSlot, NodeRole, SceneGraph, SceneNode},
};

use super::{
    field::FieldDescriptor,
    plant::{PlantModel, ProceduralModelFactory},
};

pub const BACKGROUND_COLOR: u32 = 0x0a1a0a;
pub const GROUND_SIZE: f32 = 20.0;
pub const GROUND_COLOR: u32 = 0x1a4d2e;
pub const PLANTED_COLOR: u32 = 0x228b22;
pub const FALLOW_COLOR: u32 = 0x8b7355;
/// Scene units per field unit
pub const PLOT_SCALE: f32 = 0.5;
pub const PLOT_OPACITY: f32 = 0.8;
pub const PLOT_HEIGHT: f32 = 0.01;
pub const LABEL_HEIGHT: f32 = 0.02;
pub const LABEL_OPACITY: f32 = 0.7;
pub const SLOT_SPACING: f32 = 5.0;

/// Centre of the plot for field `index`.
///
/// Two columns at x = -2.5 and 2.5, rows every 5 units starting at z = -5.
/// Large field lists run off the ground plane and are not collision checked.
pub fn field_slot(index: usize) -> Vector3<f32> {
    let column = (index % 2) as f32;
    let row = (index / 2) as f32;
    Vector3::new(
        (column - 0.5) * SLOT_SPACING,
        0.0,
        row * SLOT_SPACING - SLOT_SPACING,
    )
}

/// Translation followed by a -90 degree turn about X, so XY planes lie flat
fn laid_flat(position: Vector3<f32>) -> Matrix4<f32> {
    Matrix4::from_translation(position) * Matrix4::from_angle_x(Rad(-FRAC_PI_2))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SceneBuilder {
    factory: ProceduralModelFactory,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn background(&self) -> [f32; 3] {
        hex_to_rgb(BACKGROUND_COLOR)
    }

    /// Builds the full scene. Every mesh allocates its own geometry and
    /// material handle from `tracker`.
    pub fn build(&self, fields: &[FieldDescriptor], tracker: &mut ResourceTracker) -> SceneGraph {
        let mut scene = SceneGraph::new(self.background());

        scene.add(mesh(
            tracker,
            "ground",
            NodeRole::Ground,
            laid_flat(Vector3::new(0.0, 0.0, 0.0)),
            generate_plane(GROUND_SIZE, GROUND_SIZE, 1, 1),
            Material::from_hex("ground", GROUND_COLOR),
        ));

        for (index, field) in fields.iter().enumerate() {
            let slot = field_slot(index);

            let plot_color = if field.is_planted() {
                PLANTED_COLOR
            } else {
                FALLOW_COLOR
            };
            scene.add(mesh(
                tracker,
                format!("plot: {}", field.name),
                NodeRole::Plot,
                laid_flat(slot + Vector3::new(0.0, PLOT_HEIGHT, 0.0)),
                generate_plane(field.width * PLOT_SCALE, field.length * PLOT_SCALE, 1, 1),
                Material::from_hex("plot", plot_color).with_opacity(PLOT_OPACITY),
            ));

            let model = self.factory.build(field.variant());
            if !model.is_empty() {
                scene.add(plant_group(tracker, &field.name, slot, model));
            }

            scene.add(mesh(
                tracker,
                format!("label: {}", field.name),
                NodeRole::Label,
                laid_flat(slot + Vector3::new(0.0, LABEL_HEIGHT, 0.0)),
                generate_plane(2.0, 0.5, 1, 1),
                Material::from_hex("label", 0xffffff)
                    .with_opacity(LABEL_OPACITY)
                    .unlit(),
            ));
        }

        scene.add(SceneNode::light(
            "ambient",
            Light::Ambient {
                color: [1.0; 3],
                intensity: 0.6,
            },
        ));
        scene.add(SceneNode::light(
            "sun",
            Light::Directional {
                color: [1.0; 3],
                intensity: 0.8,
                position: [10.0, 10.0, 5.0],
            },
        ));

        let stats = scene.statistics();
        log::debug!(
            "scene built: {} fields, {} nodes, {} meshes, {} handles, {} triangles",
            fields.len(),
            stats.node_count,
            stats.mesh_count,
            stats.handle_count,
            stats.total_triangles
        );
        scene
    }
}

fn mesh(
    tracker: &mut ResourceTracker,
    name: impl Into<String>,
    role: NodeRole,
    transform: Matrix4<f32>,
    geometry: GeometryData,
    material: Material,
) -> SceneNode {
    let drawable = Drawable {
        geometry,
        geometry_handle: tracker.allocate(ResourceKind::Geometry),
        materials: MaterialSet::Single(MaterialSlot {
            material,
            handle: tracker.allocate(ResourceKind::Material),
        }),
    };
    SceneNode::mesh(name, role, transform, drawable)
}

fn plant_group(
    tracker: &mut ResourceTracker,
    field_name: &str,
    slot: Vector3<f32>,
    model: PlantModel,
) -> SceneNode {
    let mut group = SceneNode::group(
        format!("plants: {field_name}"),
        NodeRole::PlantGroup,
        Matrix4::from_translation(slot),
    );
    for (i, instance) in model.instances.into_iter().enumerate() {
        let mut plant = SceneNode::group(
            format!("{:?} {i}", model.variant),
            NodeRole::Plant,
            Matrix4::from_translation(instance.offset),
        );
        for part in instance.parts {
            plant.add_child(mesh(
                tracker,
                part.name,
                NodeRole::PlantPart,
                part.transform,
                part.geometry,
                part.material,
            ));
        }
        group.add_child(plant);
    }
    group
}

#[cfg(test)]
mod tests {
    use cgmath::Vector4;

    use super::*;
    use crate::gfx::scene::NodeKind;

    fn build(fields: &[FieldDescriptor]) -> SceneGraph {
        SceneBuilder::new().build(fields, &mut ResourceTracker::new())
    }

    #[test]
    fn slots_follow_two_columns() {
        assert_eq!(field_slot(0), Vector3::new(-2.5, 0.0, -5.0));
        assert_eq!(field_slot(1), Vector3::new(2.5, 0.0, -5.0));
        assert_eq!(field_slot(2), Vector3::new(-2.5, 0.0, 0.0));
        assert_eq!(field_slot(5), Vector3::new(2.5, 0.0, 5.0));
    }

    #[test]
    fn empty_field_list_has_ground_and_lights() {
        let scene = build(&[]);
        assert_eq!(scene.count(NodeRole::Ground), 1);
        assert_eq!(scene.count(NodeRole::Plot), 0);
        assert_eq!(scene.count(NodeRole::Light), 2);
        assert_eq!(scene.background, hex_to_rgb(0x0a1a0a));
    }

    #[test]
    fn node_counts_track_crops() {
        let fields = vec![
            FieldDescriptor::new("A", 10.0, 10.0).with_crop("Corn"),
            FieldDescriptor::new("B", 10.0, 10.0).with_crop("Wheat"),
            FieldDescriptor::new("C", 10.0, 10.0),
            FieldDescriptor::new("D", 10.0, 10.0).with_crop("Barley"),
        ];
        let scene = build(&fields);

        assert_eq!(scene.count(NodeRole::Ground), 1);
        assert_eq!(scene.count(NodeRole::Plot), 4);
        assert_eq!(scene.count(NodeRole::Label), 4);
        assert_eq!(scene.count(NodeRole::PlantGroup), 2);
        assert_eq!(scene.count(NodeRole::PlantPart), 8 + 90);
        // ground + 4 plots + 4 labels + 98 parts
        assert_eq!(scene.statistics().mesh_count, 107);
        assert_eq!(scene.handles().len(), 2 * 107);
    }

    #[test]
    fn plot_colour_depends_on_crop_presence() {
        let fields = vec![
            FieldDescriptor::new("planted", 4.0, 6.0).with_crop("Soy"),
            FieldDescriptor::new("fallow", 4.0, 6.0),
        ];
        let scene = build(&fields);
        let plots: Vec<_> = scene
            .root
            .children
            .iter()
            .filter(|n| n.role == NodeRole::Plot)
            .collect();

        let color = |node: &SceneNode| {
            node.drawable()
                .and_then(|d| d.materials.primary())
                .map(|s| s.material.base_color)
        };
        let [r, g, b] = hex_to_rgb(PLANTED_COLOR);
        assert_eq!(color(plots[0]), Some([r, g, b, 0.8]));
        let [r, g, b] = hex_to_rgb(FALLOW_COLOR);
        assert_eq!(color(plots[1]), Some([r, g, b, 0.8]));
    }

    #[test]
    fn plot_is_scaled_and_laid_flat() {
        let scene = build(&[FieldDescriptor::new("A", 8.0, 4.0)]);
        let plot = scene
            .root
            .children
            .iter()
            .find(|n| n.role == NodeRole::Plot)
            .and_then(|n| n.drawable().map(|d| (d, n.transform)));
        let Some((drawable, transform)) = plot else {
            panic!("no plot node");
        };

        let world: Vec<_> = drawable
            .geometry
            .vertices
            .iter()
            .map(|v| transform * Vector4::new(v[0], v[1], v[2], 1.0))
            .collect();
        for v in &world {
            assert!((v.y - PLOT_HEIGHT).abs() < 1e-6);
        }
        let max_x = world.iter().map(|v| v.x).fold(f32::MIN, f32::max);
        let max_z = world.iter().map(|v| v.z).fold(f32::MIN, f32::max);
        assert!((max_x - (-2.5 + 2.0)).abs() < 1e-5);
        assert!((max_z - (-5.0 + 1.0)).abs() < 1e-5);
    }

    #[test]
    fn labels_are_unlit_and_above_plots() {
        let scene = build(&[FieldDescriptor::new("A", 8.0, 4.0)]);
        let label = scene
            .root
            .children
            .iter()
            .find(|n| n.role == NodeRole::Label)
            .and_then(|n| match &n.kind {
                NodeKind::Mesh(d) => Some((d.materials.primary().cloned(), n.transform)),
                _ => None,
            });
        let Some((Some(slot), transform)) = label else {
            panic!("no label node");
        };
        assert!(slot.material.unlit);
        assert_eq!(slot.material.base_color[3], LABEL_OPACITY);
        let origin = transform * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!((origin.y - LABEL_HEIGHT).abs() < 1e-6);
    }

    #[test]
    fn wheat_parts_sit_on_their_grid_cell() {
        let scene = build(&[
            FieldDescriptor::new("A", 1.0, 1.0),
            FieldDescriptor::new("B", 1.0, 1.0).with_crop("wheat"),
        ]);
        let mut stalk_bases = Vec::new();
        scene.visit_world(|node, world| {
            if node.name == "wheat stalk" {
                let base = world * Vector4::new(0.0, -0.6, 0.0, 1.0);
                stalk_bases.push((base.x, base.y, base.z));
            }
        });
        assert_eq!(stalk_bases.len(), 9);
        for (x, y, z) in stalk_bases {
            assert!(y.abs() < 1e-5);
            assert!((x - 2.5).abs() <= 0.5 + 1e-5);
            assert!((z + 5.0).abs() <= 0.5 + 1e-5);
        }
    }

    #[test]
    fn builds_are_deterministic() {
        let fields = vec![
            FieldDescriptor::new("A", 6.0, 3.0).with_crop("maize"),
            FieldDescriptor::new("B", 2.0, 9.0).with_crop("Wheat"),
        ];
        assert_eq!(build(&fields), build(&fields));

        let mut tracker = ResourceTracker::new();
        let first = SceneBuilder::new().build(&fields, &mut tracker);
        let second = SceneBuilder::new().build(&fields, &mut tracker);
        assert_ne!(first.handles(), second.handles());
        assert_eq!(first.statistics(), second.statistics());
    }

    #[test]
    fn degenerate_sizes_pass_through() {
        let scene = build(&[FieldDescriptor::new("zero", 0.0, -4.0)]);
        assert_eq!(scene.count(NodeRole::Plot), 1);
        assert_eq!(scene.count(NodeRole::Label), 1);
    }
}
