/// Tunables for the per-frame update. All rates are per frame, never per
/// second: the update is frame-counted.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Rotor spin, radians per frame
    pub rotor_step: f32,
    /// Submarine travel along X, units per frame
    pub submarine_step: f32,
    /// Horizontal range the submarine wraps around in, also the shooter's range
    pub x_min: f32,
    pub x_max: f32,
    /// Bomb depth advance, units per frame
    pub bomb_step: f32,
    /// Depth past which a falling bomb counts as a miss
    pub miss_depth: f32,
    /// Height of the depth band above the strike depth that still counts as a hit
    pub hit_band: f32,
    /// Largest horizontal distance between bomb and submarine that counts as a hit
    pub hit_tolerance: f32,
    pub explosion_base: u32,
    pub explosion_step: u32,
    pub explosion_terminal: u32,
    /// Tower rise per explosion frame
    pub tower_lift: f32,
    /// Shooter travel per key press
    pub shooter_step: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rotor_step: 0.08,
            submarine_step: -2.0,
            x_min: -120.0,
            x_max: 120.0,
            bomb_step: 1.0,
            miss_depth: 80.0,
            hit_band: 8.0,
            hit_tolerance: 18.0,
            explosion_base: 10,
            explosion_step: 10,
            explosion_terminal: 220,
            tower_lift: 0.5,
            shooter_step: 5.0,
        }
    }
}
