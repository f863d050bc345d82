// CONTROLLER: Input, game logic, and update loop
pub mod input;
pub mod collision;
pub mod explosion;
pub mod game;

pub use input::{Action, InputEvent, InputProcessor, KeyBindings};
pub use collision::CollisionZone;
pub use explosion::Explosion;
pub use game::{BombState, Game};
