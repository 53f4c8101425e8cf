use cgmath::{Matrix4, SquareMatrix};

use crate::gfx::resources::handle::ResourceHandle;

use super::node::{Drawable, Light, NodeKind, NodeRole, SceneNode};

/// Complete scene of one generation: a node tree plus the clear colour
#[derive(Debug, Clone, PartialEq)]
pub struct SceneGraph {
    pub root: SceneNode,
    pub background: [f32; 3],
}

impl SceneGraph {
    /// Creates an empty scene with an identity root
    pub fn new(background: [f32; 3]) -> Self {
        Self {
            root: SceneNode::group("root", NodeRole::Root, Matrix4::identity()),
            background,
        }
    }

    pub fn add(&mut self, node: SceneNode) {
        self.root.add_child(node);
    }

    /// Depth-first, parents before children
    pub fn visit<F>(&self, mut f: F)
    where
        F: FnMut(&SceneNode),
    {
        fn walk<F: FnMut(&SceneNode)>(node: &SceneNode, f: &mut F) {
            f(node);
            for child in &node.children {
                walk(child, f);
            }
        }
        walk(&self.root, &mut f);
    }

    /// Visits every node with its accumulated world transform
    pub fn visit_world<F>(&self, mut f: F)
    where
        F: FnMut(&SceneNode, Matrix4<f32>),
    {
        fn walk<F: FnMut(&SceneNode, Matrix4<f32>)>(
            node: &SceneNode,
            parent: Matrix4<f32>,
            f: &mut F,
        ) {
            let world = parent * node.transform;
            f(node, world);
            for child in &node.children {
                walk(child, world, f);
            }
        }
        walk(&self.root, Matrix4::identity(), &mut f);
    }

    /// Collects every drawable with its world transform
    pub fn drawables(&self) -> Vec<(&Drawable, Matrix4<f32>)> {
        let mut out = Vec::new();
        fn walk<'a>(
            node: &'a SceneNode,
            parent: Matrix4<f32>,
            out: &mut Vec<(&'a Drawable, Matrix4<f32>)>,
        ) {
            let world = parent * node.transform;
            if let NodeKind::Mesh(drawable) = &node.kind {
                out.push((drawable, world));
            }
            for child in &node.children {
                walk(child, world, out);
            }
        }
        walk(&self.root, Matrix4::identity(), &mut out);
        out
    }

    pub fn lights(&self) -> Vec<Light> {
        let mut lights = Vec::new();
        self.visit(|node| {
            if let NodeKind::Light(light) = node.kind {
                lights.push(light);
            }
        });
        lights
    }

    pub fn count(&self, role: NodeRole) -> usize {
        let mut n = 0;
        self.visit(|node| {
            if node.role == role {
                n += 1;
            }
        });
        n
    }

    /// Every GPU handle owned by any node in the tree
    pub fn handles(&self) -> Vec<ResourceHandle> {
        let mut handles = Vec::new();
        self.visit(|node| {
            if let Some(drawable) = node.drawable() {
                handles.extend(drawable.handles());
            }
        });
        handles
    }

    pub fn statistics(&self) -> SceneStatistics {
        let mut stats = SceneStatistics::default();
        self.visit(|node| {
            stats.node_count += 1;
            match &node.kind {
                NodeKind::Mesh(drawable) => {
                    stats.mesh_count += 1;
                    stats.total_triangles += drawable.geometry.triangle_count();
                    stats.total_vertices += drawable.geometry.vertex_count();
                    stats.handle_count += drawable.handles().count();
                }
                NodeKind::Light(_) => stats.light_count += 1,
                NodeKind::Group => {}
            }
        });
        stats
    }
}

/// Scene statistics for debugging and logging
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub node_count: usize,
    pub mesh_count: usize,
    pub light_count: usize,
    pub handle_count: usize,
    pub total_triangles: usize,
    pub total_vertices: usize,
}
