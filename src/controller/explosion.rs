use crate::config::GameConfig;
use crate::model::{Material, Scene};

/// Submarine appearance before an explosion, put back when it ends
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavedLook {
    pub body: Option<Material>,
    pub tower: Option<Material>,
    pub tower_offset: f32,
}

impl SavedLook {
    fn capture(scene: &Scene) -> Self {
        Self {
            body: scene.graph.node(scene.body).material,
            tower: scene.graph.node(scene.tower).material,
            tower_offset: scene.graph.transform(scene.tower).translation.y,
        }
    }

    fn restore(&self, scene: &mut Scene) {
        scene.graph.node_mut(scene.body).material = self.body;
        scene.graph.node_mut(scene.tower).material = self.tower;
        scene.graph.transform_mut(scene.tower).translation.y = self.tower_offset;
    }
}

/// Frame-counted explosion sequence
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Explosion {
    #[default]
    Normal,
    Exploding { progress: u32, saved: SavedLook },
}

/// Explosion tint for a given progress. The red channel follows the counter,
/// clamped to the 8-bit range before normalizing.
pub fn explosion_color(progress: u32) -> Material {
    Material::rgb(progress.min(255) as f32 / 255.0, 0.0, 0.0)
}

impl Explosion {
    pub fn is_exploding(&self) -> bool {
        matches!(self, Explosion::Exploding { .. })
    }

    pub fn progress(&self) -> Option<u32> {
        match self {
            Explosion::Normal => None,
            Explosion::Exploding { progress, .. } => Some(*progress),
        }
    }

    /// Start exploding. Returns false and changes nothing if already exploding.
    pub fn ignite(&mut self, scene: &Scene, config: &GameConfig) -> bool {
        if self.is_exploding() {
            return false;
        }
        *self = Explosion::Exploding {
            progress: config.explosion_base,
            saved: SavedLook::capture(scene),
        };
        true
    }

    /// One explosion frame. Returns true on the frame the sequence ends and
    /// the submarine's look is restored.
    pub fn advance(&mut self, scene: &mut Scene, config: &GameConfig) -> bool {
        let Explosion::Exploding { progress, saved } = self else {
            return false;
        };

        if *progress <= config.explosion_terminal {
            let tint = explosion_color(*progress);
            scene.graph.node_mut(scene.body).material = Some(tint);
            scene.graph.node_mut(scene.tower).material = Some(tint);
            scene.graph.transform_mut(scene.tower).translation.y += config.tower_lift;
            *progress += config.explosion_step;
            false
        } else {
            saved.restore(scene);
            *self = Explosion::Normal;
            true
        }
    }
}
