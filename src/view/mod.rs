// VIEW: Rendering and graphics
pub mod frame_loop;
pub mod gpu_init;
pub mod mesh;
pub mod render;

#[cfg(target_arch = "wasm32")]
pub use frame_loop::FrameLoopContext;
pub use frame_loop::FpsCounter;
pub use gpu_init::GpuContext;
pub use mesh::{Mesh, MeshBuffer, Vertex};
pub use render::{HudFrame, SceneRenderer};
