use std::f32::consts::TAU;

use glam::{Quat, Vec3};

use crate::config::GameConfig;
use crate::controller::collision::CollisionZone;
use crate::controller::explosion::Explosion;
use crate::controller::input::Action;
use crate::model::{Scene, SceneLayout};

/// Bomb lifecycle. The bomb's current position is its node's local
/// translation; its Z component is the drop depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BombState {
    pub dropping: bool,
    /// Local position recorded when the current drop started
    pub reset_position: Vec3,
}

/// Wrap-around movement policy: leaving the range on one side re-enters on
/// the other.
pub fn wrap_x(x: f32, min: f32, max: f32) -> f32 {
    if x < min {
        max
    } else if x > max {
        min
    } else {
        x
    }
}

/// All mutable game state. Input and the frame loop both go through this.
pub struct Game {
    pub scene: Scene,
    pub config: GameConfig,
    pub zone: CollisionZone,
    /// Rotor rotation in radians, reduced to a single turn
    pub rotor_angle: f32,
    /// Frames the rotor has turned
    pub rotor_frames: u64,
    pub bomb: BombState,
    pub explosion: Explosion,
    pub frame: u64,
}

impl Game {
    pub fn new(config: GameConfig, layout: SceneLayout) -> Self {
        let scene = Scene::build(layout);
        let zone = CollisionZone::new(&scene.layout, &config);
        let bomb = BombState {
            dropping: false,
            reset_position: scene.graph.transform(scene.bomb).translation,
        };
        tracing::info!(floor = zone.floor, ceiling = zone.ceiling, tolerance = zone.tolerance, "game ready");

        Self {
            scene,
            config,
            zone,
            rotor_angle: 0.0,
            rotor_frames: 0,
            bomb,
            explosion: Explosion::Normal,
            frame: 0,
        }
    }

    pub fn submarine_x(&self) -> f32 {
        self.scene.graph.world_position(self.scene.submarine).x
    }

    pub fn shooter_x(&self) -> f32 {
        self.scene.graph.world_position(self.scene.shooter).x
    }

    pub fn bomb_depth(&self) -> f32 {
        self.scene.graph.transform(self.scene.bomb).translation.z
    }

    /// Advance the game by one display frame
    pub fn tick(&mut self) {
        self.frame += 1;

        if self.explosion.is_exploding() {
            // Rotor and hull hold still until the explosion is over
            if self.explosion.advance(&mut self.scene, &self.config) {
                tracing::info!(frame = self.frame, "explosion finished");
            }
        } else {
            self.move_submarine();
        }

        if self.bomb.dropping {
            self.advance_bomb();
        }
    }

    fn move_submarine(&mut self) {
        let c = &self.config;
        self.rotor_angle = (self.rotor_angle.rem_euclid(TAU) + c.rotor_step).rem_euclid(TAU);
        self.rotor_frames += 1;
        self.scene.graph.transform_mut(self.scene.rotor).rotation = Quat::from_rotation_x(self.rotor_angle);

        let hull = self.scene.graph.transform_mut(self.scene.submarine);
        hull.translation.x = wrap_x(hull.translation.x + c.submarine_step, c.x_min, c.x_max);
    }

    fn advance_bomb(&mut self) {
        let bomb = self.scene.bomb;
        self.scene.graph.transform_mut(bomb).translation.z += self.config.bomb_step;
        let depth = self.bomb_depth();

        // Bomb and hull sit under differently transformed parents
        let dx = self.submarine_x() - self.scene.graph.world_position(bomb).x;

        if self.zone.contains(dx, depth) {
            if self.explosion.ignite(&self.scene, &self.config) {
                tracing::info!(frame = self.frame, dx, depth, "bomb hit submarine");
            }
            self.reset_bomb();
        } else if depth > self.config.miss_depth {
            tracing::debug!(frame = self.frame, depth, "bomb missed");
            self.reset_bomb();
        }
    }

    fn reset_bomb(&mut self) {
        self.scene.graph.transform_mut(self.scene.bomb).translation = self.bomb.reset_position;
        self.bomb.dropping = false;
    }

    /// Apply one input action
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::MoveLeft => self.move_shooter(-self.config.shooter_step),
            Action::MoveRight => self.move_shooter(self.config.shooter_step),
            Action::DropBomb => {
                if self.drop_bomb() {
                    tracing::debug!(frame = self.frame, shooter_x = self.shooter_x(), "bomb dropped");
                }
            }
        }
    }

    fn move_shooter(&mut self, dx: f32) {
        let (min, max) = (self.config.x_min, self.config.x_max);
        let shooter = self.scene.graph.transform_mut(self.scene.shooter);
        shooter.translation.x = (shooter.translation.x + dx).clamp(min, max);
    }

    /// At most one bomb in flight; returns false if one already is.
    fn drop_bomb(&mut self) -> bool {
        if self.bomb.dropping {
            return false;
        }
        self.bomb.reset_position = self.scene.graph.transform(self.scene.bomb).translation;
        self.bomb.dropping = true;
        true
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default(), SceneLayout::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::explosion::explosion_color;

    /// Submarine parked at `sub_x`, shooter at `shooter_x`
    fn parked_game(sub_x: f32, shooter_x: f32) -> Game {
        let config = GameConfig { submarine_step: 0.0, ..GameConfig::default() };
        let layout = SceneLayout {
            submarine_start: Vec3::new(sub_x, 0.0, 0.0),
            shooter_start_x: shooter_x,
            ..SceneLayout::default()
        };
        Game::new(config, layout)
    }

    #[test]
    fn test_wrap_x() {
        assert_eq!(wrap_x(0.0, -120.0, 120.0), 0.0);
        assert_eq!(wrap_x(-120.0, -120.0, 120.0), -120.0);
        assert_eq!(wrap_x(-121.0, -120.0, 120.0), 120.0);
        assert_eq!(wrap_x(121.0, -120.0, 120.0), -120.0);
    }

    #[test]
    fn test_rotor_rotation_accumulates() {
        let mut game = Game::default();
        let n = 100;
        for _ in 0..n {
            game.tick();
        }
        assert_eq!(game.rotor_frames, n);
        assert!((0.0..=TAU).contains(&game.rotor_angle));

        // Same orientation as one rotation by the full N x step
        let rotation = game.scene.graph.transform(game.scene.rotor).rotation;
        let expected = Quat::from_rotation_x(n as f32 * game.config.rotor_step);
        assert!((rotation * Vec3::Y).abs_diff_eq(expected * Vec3::Y, 1e-4));
        assert!((rotation * Vec3::Z).abs_diff_eq(expected * Vec3::Z, 1e-4));
    }

    #[test]
    fn test_rotor_keeps_turning_after_long_runs() {
        let mut game = Game::default();
        game.rotor_angle = 2_097_152.0;
        let rotor = game.scene.rotor;
        game.tick();

        let mut previous = game.scene.graph.transform(rotor).rotation * Vec3::Y;
        for _ in 0..3 {
            game.tick();
            assert!((0.0..=TAU).contains(&game.rotor_angle));
            let current = game.scene.graph.transform(rotor).rotation * Vec3::Y;
            let turned = previous.angle_between(current);
            assert!((turned - game.config.rotor_step).abs() < 1e-3, "rotor turned {turned}");
            previous = current;
        }
    }

    #[test]
    fn test_submarine_follows_wrap_policy() {
        let mut game = Game::default();
        let c = game.config.clone();
        let mut expected = game.submarine_x();
        let mut wrapped = false;

        for _ in 0..300 {
            game.tick();
            let next = wrap_x(expected + c.submarine_step, c.x_min, c.x_max);
            wrapped |= next > expected;
            expected = next;
            assert_eq!(game.submarine_x(), expected);
        }
        assert!(wrapped, "submarine never reached the edge");
    }

    #[test]
    fn test_miss_restores_drop_position() {
        let mut game = parked_game(100.0, 0.0);
        let bomb = game.scene.bomb;
        let start = Vec3::new(0.25, -0.5, 0.1);
        game.scene.graph.transform_mut(bomb).translation = start;

        game.apply(Action::DropBomb);
        assert!(game.bomb.dropping);

        let mut frames = 0;
        while game.bomb.dropping {
            game.tick();
            frames += 1;
            assert!(frames <= 100, "bomb never reset");
        }

        assert_eq!(frames, 80);
        assert!(!game.explosion.is_exploding());
        assert_eq!(game.scene.graph.transform(bomb).translation, start);
    }

    #[test]
    fn test_drop_while_in_flight_is_ignored() {
        let mut game = parked_game(100.0, 0.0);
        game.apply(Action::DropBomb);
        for _ in 0..5 {
            game.tick();
        }
        let before_state = game.bomb;
        let before_pos = game.scene.graph.transform(game.scene.bomb).translation;

        game.apply(Action::DropBomb);

        assert_eq!(game.bomb, before_state);
        assert_eq!(game.scene.graph.transform(game.scene.bomb).translation, before_pos);
    }

    #[test]
    fn test_end_to_end_hit_and_explosion() {
        let mut game = parked_game(0.0, 0.0);
        let body_before = game.scene.graph.node(game.scene.body).material;
        let tower_before = game.scene.graph.node(game.scene.tower).material;
        let tower_y_before = game.scene.graph.transform(game.scene.tower).translation.y;

        game.apply(Action::DropBomb);
        for frame in 1..=36 {
            game.tick();
            assert!(!game.explosion.is_exploding(), "early hit at frame {frame}");
            assert_eq!(game.bomb_depth(), frame as f32);
        }

        game.tick();
        assert_eq!(game.explosion.progress(), Some(10));
        assert!(!game.bomb.dropping);
        assert_eq!(game.bomb_depth(), 0.0);

        let rotor_angle = game.rotor_angle;
        for i in 1..=22u32 {
            assert_eq!(game.explosion.progress(), Some(i * 10));
            game.tick();
            assert_eq!(game.scene.graph.node(game.scene.body).material, Some(explosion_color(i * 10)));
        }
        assert_eq!(game.explosion.progress(), Some(230));
        assert_eq!(game.rotor_angle, rotor_angle);

        game.tick();
        assert!(!game.explosion.is_exploding());
        assert_eq!(game.scene.graph.node(game.scene.body).material, body_before);
        assert_eq!(game.scene.graph.node(game.scene.tower).material, tower_before);
        assert_eq!(game.scene.graph.transform(game.scene.tower).translation.y, tower_y_before);
    }

    #[test]
    fn test_hit_uses_world_positions() {
        // Within tolerance once the shooter's own offset is accounted for
        let mut near = parked_game(0.0, 10.0);
        near.apply(Action::DropBomb);
        for _ in 0..37 {
            near.tick();
        }
        assert!(near.explosion.is_exploding());

        let mut far = parked_game(0.0, 20.0);
        far.apply(Action::DropBomb);
        for _ in 0..81 {
            far.tick();
        }
        assert!(!far.explosion.is_exploding());
        assert!(!far.bomb.dropping);
    }

    #[test]
    fn test_submarine_holds_still_while_exploding() {
        let mut game = parked_game(0.0, 0.0);
        game.apply(Action::DropBomb);
        for _ in 0..37 {
            game.tick();
        }
        assert!(game.explosion.is_exploding());

        game.config.submarine_step = -2.0;
        let x = game.submarine_x();
        for _ in 0..10 {
            game.tick();
            assert_eq!(game.submarine_x(), x);
        }
    }

    #[test]
    fn test_shooter_moves_and_clamps() {
        let mut game = Game::default();
        let step = game.config.shooter_step;
        let start = game.shooter_x();

        game.apply(Action::MoveLeft);
        assert_eq!(game.shooter_x(), start - step);
        game.apply(Action::MoveRight);
        game.apply(Action::MoveRight);
        assert_eq!(game.shooter_x(), start + step);

        for _ in 0..200 {
            game.apply(Action::MoveRight);
        }
        assert_eq!(game.shooter_x(), game.config.x_max);
        // the bomb rides along with the rig
        let bomb = game.scene.graph.world_position(game.scene.bomb);
        assert!((bomb.x - game.config.x_max).abs() < 1e-4);
    }
}
