use crate::config::GameConfig;
use crate::model::SceneLayout;

/// Region, in bomb depth and horizontal offset, in which a falling bomb hits
/// the submarine. Fixed when the game starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionZone {
    /// Shallowest hitting depth (H)
    pub floor: f32,
    /// Deepest hitting depth (H + band)
    pub ceiling: f32,
    /// Largest |dx| that hits (W)
    pub tolerance: f32,
}

impl CollisionZone {
    pub fn new(layout: &SceneLayout, config: &GameConfig) -> Self {
        let floor = layout.strike_depth();
        Self {
            floor,
            ceiling: floor + config.hit_band,
            tolerance: config.hit_tolerance,
        }
    }

    /// `dx` is submarine world X minus bomb world X, `depth` the bomb's
    /// depth coordinate. Both bounds are inclusive.
    pub fn contains(&self, dx: f32, depth: f32) -> bool {
        depth >= self.floor && depth <= self.ceiling && dx.abs() <= self.tolerance
    }
}
