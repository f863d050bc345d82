use std::f32::consts::{FRAC_PI_2, FRAC_PI_3};

use glam::{Quat, Vec3};

use crate::model::node::{Material, Node, NodeId, SceneGraph, Shape, Transform};

/// Static geometry of the play field. Everything here is a named constant,
/// nothing is measured back from the built meshes.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLayout {
    /// World height of the shooter rig, and so of an idle bomb
    pub drop_height: f32,
    pub submarine_start: Vec3,
    /// Vertical half-extent of the hull
    pub submarine_radius: f32,
    /// Hull stretch along the direction of travel
    pub hull_stretch: f32,
    pub tower_size: Vec3,
    pub tower_offset: Vec3,
    pub rotor_offset: Vec3,
    pub shooter_start_x: f32,
    pub shooter_body_size: Vec3,
    pub bomb_radius: f32,
    pub hull_color: u32,
    pub tower_color: u32,
    pub rotor_color: u32,
    pub shooter_color: u32,
    pub bomb_color: u32,
    pub light: DirectionalLight,
}

impl Default for SceneLayout {
    fn default() -> Self {
        Self {
            drop_height: 50.0,
            submarine_start: Vec3::new(100.0, 0.0, 0.0),
            submarine_radius: 10.0,
            hull_stretch: 2.4,
            tower_size: Vec3::new(8.0, 10.0, 6.0),
            tower_offset: Vec3::new(-4.0, 11.0, 0.0),
            rotor_offset: Vec3::new(25.0, 0.0, 0.0),
            shooter_start_x: 0.0,
            shooter_body_size: Vec3::new(16.0, 6.0, 8.0),
            bomb_radius: 3.6,
            hull_color: 0xe0b000,
            tower_color: 0xc08a00,
            rotor_color: 0x8a8a8a,
            shooter_color: 0x2f4f4f,
            bomb_color: 0x202020,
            light: DirectionalLight::default(),
        }
    }
}

impl SceneLayout {
    /// Bomb depth at which the bomb first touches the top of the hull.
    pub fn strike_depth(&self) -> f32 {
        self.drop_height - self.submarine_radius - self.bomb_radius
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Points from the scene towards the light
    pub direction: Vec3,
    pub intensity: f32,
    pub ambient: f32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vec3::new(0.5, 1.0, 0.5).normalize(),
            intensity: 0.8,
            ambient: 0.35,
        }
    }
}

/// The built scene plus the handles the game logic drives.
#[derive(Debug, Clone)]
pub struct Scene {
    pub graph: SceneGraph,
    pub submarine: NodeId,
    pub body: NodeId,
    pub tower: NodeId,
    pub rotor: NodeId,
    pub shooter: NodeId,
    pub bomb: NodeId,
    pub light: DirectionalLight,
    pub layout: SceneLayout,
}

impl Scene {
    pub fn build(layout: SceneLayout) -> Self {
        let mut graph = SceneGraph::new();

        // Submarine: hull, tower and rotor hang off one root that moves along X
        let submarine = graph.add_root(Node::group("submarine", Transform::from_translation(layout.submarine_start)));
        let body = graph.add_child(
            submarine,
            Node::mesh(
                "hull",
                Transform::IDENTITY.with_scale(Vec3::new(layout.hull_stretch, 1.0, 1.0)),
                Shape::Sphere { radius: layout.submarine_radius },
                Material::from_hex(layout.hull_color),
            ),
        );
        let tower = graph.add_child(
            submarine,
            Node::mesh(
                "tower",
                Transform::from_translation(layout.tower_offset),
                Shape::Box { size: layout.tower_size },
                Material::from_hex(layout.tower_color),
            ),
        );
        let rotor = graph.add_child(submarine, Node::group("rotor", Transform::from_translation(layout.rotor_offset)));
        build_rotor(&mut graph, rotor, Material::from_hex(layout.rotor_color));

        // Shooter rig: turned a quarter around X so local +Z points down
        let shooter = graph.add_root(Node::group(
            "shooter",
            Transform::from_translation(Vec3::new(layout.shooter_start_x, layout.drop_height, 0.0))
                .with_rotation(Quat::from_rotation_x(FRAC_PI_2)),
        ));
        graph.add_child(
            shooter,
            Node::mesh(
                "shooter_body",
                Transform::from_translation(Vec3::new(0.0, 0.0, -(layout.bomb_radius + layout.shooter_body_size.z / 2.0))),
                Shape::Box { size: layout.shooter_body_size },
                Material::from_hex(layout.shooter_color),
            ),
        );
        let bomb = graph.add_child(
            shooter,
            Node::mesh(
                "bomb",
                Transform::IDENTITY,
                Shape::Sphere { radius: layout.bomb_radius },
                Material::from_hex(layout.bomb_color),
            ),
        );

        tracing::debug!(nodes = graph.len(), strike_depth = layout.strike_depth(), "scene built");

        Self {
            graph,
            submarine,
            body,
            tower,
            rotor,
            shooter,
            bomb,
            light: layout.light,
            layout,
        }
    }
}

/// One rotor part: a cylinder placed under the rotor group.
fn rotor_part(
    graph: &mut SceneGraph,
    rotor: NodeId,
    name: &'static str,
    shape: Shape,
    scale: Vec3,
    rotation: Quat,
    position: Vec3,
    material: Material,
) -> NodeId {
    let transform = Transform::from_translation(position).with_rotation(rotation).with_scale(scale);
    graph.add_child(rotor, Node::mesh(name, transform, shape, material))
}

fn build_rotor(graph: &mut SceneGraph, rotor: NodeId, material: Material) {
    // Shaft lies along the rotor axis (local X)
    rotor_part(
        graph,
        rotor,
        "rotor_shaft",
        Shape::Cylinder { radius_top: 1.0, radius_bottom: 1.0, height: 8.0 },
        Vec3::ONE,
        Quat::from_rotation_z(-FRAC_PI_2),
        Vec3::new(-2.0, 0.0, 0.0),
        material,
    );

    // Three flattened wings crossing the axis, 60 degrees apart
    let wing = Shape::Cylinder { radius_top: 0.8, radius_bottom: 0.8, height: 14.0 };
    for (i, name) in ["rotor_wing_0", "rotor_wing_60", "rotor_wing_120"].into_iter().enumerate() {
        rotor_part(
            graph,
            rotor,
            name,
            wing,
            Vec3::new(0.4, 1.0, 1.6),
            Quat::from_rotation_x(i as f32 * FRAC_PI_3),
            Vec3::new(1.5, 0.0, 0.0),
            material,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strike_depth() {
        let layout = SceneLayout::default();
        assert!((layout.strike_depth() - 36.4).abs() < 1e-4);
    }

    #[test]
    fn test_rotor_has_shaft_and_three_wings() {
        let scene = Scene::build(SceneLayout::default());
        let parts = scene.graph.node(scene.rotor).children();
        assert_eq!(parts.len(), 4);

        let angles: Vec<f32> = parts[1..]
            .iter()
            .map(|&id| {
                let (axis, angle) = scene.graph.transform(id).rotation.to_axis_angle();
                if angle.abs() < 1e-6 { 0.0 } else { angle * axis.x.signum() }
            })
            .collect();
        for (got, want) in angles.iter().zip([0.0f32, 60.0, 120.0]) {
            assert!((got.to_degrees() - want).abs() < 1e-3, "wing at {got} rad, want {want} deg");
        }
    }

    #[test]
    fn test_idle_bomb_hangs_at_drop_height() {
        let layout = SceneLayout::default();
        let scene = Scene::build(layout.clone());
        let bomb = scene.graph.world_position(scene.bomb);
        assert!((bomb - Vec3::new(layout.shooter_start_x, layout.drop_height, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_bomb_depth_points_down() {
        let mut scene = Scene::build(SceneLayout::default());
        scene.graph.transform_mut(scene.bomb).translation.z = 20.0;
        let bomb = scene.graph.world_position(scene.bomb);
        assert!((bomb.y - 30.0).abs() < 1e-4);
        assert!(bomb.x.abs() < 1e-4);
    }

    #[test]
    fn test_handles_are_distinct_and_drawable() {
        let scene = Scene::build(SceneLayout::default());
        let ids = [scene.submarine, scene.body, scene.tower, scene.rotor, scene.shooter, scene.bomb];
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(scene.graph.node(scene.body).material.is_some());
        assert!(scene.graph.node(scene.tower).material.is_some());
        assert!(scene.graph.node(scene.bomb).shape.is_some());
        // hull, tower, shaft, three wings, shooter body, bomb
        assert_eq!(scene.graph.drawables().count(), 8);
    }
}
