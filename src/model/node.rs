use glam::{Mat4, Quat, Vec3};

/// Handle into a [`SceneGraph`]. Only the graph hands these out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self { translation, ..Self::IDENTITY }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Local matrix: scale, then rotate, then translate.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Flat surface color, RGBA in 0..=1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: [f32; 4],
}

impl Material {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { color: [r, g, b, 1.0] }
    }

    /// `0xRRGGBB` as used for the scene palette
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xff) as f32 / 255.0;
        let g = ((hex >> 8) & 0xff) as f32 / 255.0;
        let b = (hex & 0xff) as f32 / 255.0;
        Self::rgb(r, g, b)
    }
}

/// Primitive geometry attached to a node, in node-local units.
/// Cylinders stand along local +Y, centered on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Sphere { radius: f32 },
    Box { size: Vec3 },
    Cylinder { radius_top: f32, radius_bottom: f32, height: f32 },
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: &'static str,
    pub transform: Transform,
    pub shape: Option<Shape>,
    pub material: Option<Material>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    /// A bare grouping node with no geometry
    pub fn group(name: &'static str, transform: Transform) -> Self {
        Self {
            name,
            transform,
            shape: None,
            material: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn mesh(name: &'static str, transform: Transform, shape: Shape, material: Material) -> Self {
        Self {
            shape: Some(shape),
            material: Some(material),
            ..Self::group(name, transform)
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Arena-backed transform hierarchy. Nodes are never removed, so every
/// `NodeId` handed out stays valid for the lifetime of the graph.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn add_root(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { parent: None, ..node });
        id
    }

    pub fn add_child(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { parent: Some(parent), ..node });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn transform(&self, id: NodeId) -> &Transform {
        &self.nodes[id.0].transform
    }

    pub fn transform_mut(&mut self, id: NodeId) -> &mut Transform {
        &mut self.nodes[id.0].transform
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Nodes that carry geometry, in insertion order
    pub fn drawables(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.iter().filter(|(_, n)| n.shape.is_some())
    }

    /// Accumulated transform from the root down to `id`
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut matrix = self.nodes[id.0].transform.matrix();
        let mut current = self.nodes[id.0].parent;
        while let Some(parent) = current {
            let node = &self.nodes[parent.0];
            matrix = node.transform.matrix() * matrix;
            current = node.parent;
        }
        matrix
    }

    pub fn world_position(&self, id: NodeId) -> Vec3 {
        self.world_matrix(id).transform_point3(Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_world_position_of_root_is_translation() {
        let mut graph = SceneGraph::new();
        let root = graph.add_root(Node::group("root", Transform::from_translation(Vec3::new(3.0, 4.0, 5.0))));
        assert_eq!(graph.world_position(root), Vec3::new(3.0, 4.0, 5.0));
    }

    #[test]
    fn test_world_position_through_rotated_parent() {
        let mut graph = SceneGraph::new();
        // Parent turned so local +Z points down
        let rig = graph.add_root(Node::group(
            "rig",
            Transform::from_translation(Vec3::new(10.0, 50.0, 0.0)).with_rotation(Quat::from_rotation_x(FRAC_PI_2)),
        ));
        let child = graph.add_child(rig, Node::group("child", Transform::from_translation(Vec3::new(0.0, 0.0, 20.0))));

        assert!(approx(graph.world_position(child), Vec3::new(10.0, 30.0, 0.0)));
    }

    #[test]
    fn test_world_position_through_scaled_chain() {
        let mut graph = SceneGraph::new();
        let root = graph.add_root(Node::group("root", Transform::IDENTITY.with_scale(Vec3::splat(2.0))));
        let mid = graph.add_child(root, Node::group("mid", Transform::from_translation(Vec3::new(1.0, 0.0, 0.0))));
        let leaf = graph.add_child(mid, Node::group("leaf", Transform::from_translation(Vec3::new(0.0, 1.0, 0.0))));

        // local offsets are doubled by the scaled root
        assert!(approx(graph.world_position(leaf), Vec3::new(2.0, 2.0, 0.0)));
    }

    #[test]
    fn test_children_and_drawables() {
        let mut graph = SceneGraph::new();
        let root = graph.add_root(Node::group("root", Transform::IDENTITY));
        let a = graph.add_child(
            root,
            Node::mesh("a", Transform::IDENTITY, Shape::Sphere { radius: 1.0 }, Material::rgb(1.0, 0.0, 0.0)),
        );
        let b = graph.add_child(root, Node::group("b", Transform::IDENTITY));

        assert_eq!(graph.node(root).children(), &[a, b]);
        assert_eq!(graph.node(a).parent(), Some(root));
        let drawn: Vec<NodeId> = graph.drawables().map(|(id, _)| id).collect();
        assert_eq!(drawn, vec![a]);
    }

    #[test]
    fn test_material_from_hex() {
        let m = Material::from_hex(0xff8000);
        assert_eq!(m.color[0], 1.0);
        assert!((m.color[1] - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(m.color[2], 0.0);
        assert_eq!(m.color[3], 1.0);
    }
}
