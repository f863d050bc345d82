// MODEL: Scene graph and static scene data
pub mod node;
pub mod camera;
pub mod scene;

pub use node::{Material, Node, NodeId, SceneGraph, Shape, Transform};
pub use camera::Camera;
pub use scene::{DirectionalLight, Scene, SceneLayout};
