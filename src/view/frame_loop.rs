/// Rolling frame-rate estimate for the HUD. Display only: game logic is
/// frame-counted and never sees wall-clock time.
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    frames: u32,
    elapsed: f32,
    fps: f32,
}

impl FpsCounter {
    /// Publishes a new estimate once a second has been accumulated
    pub fn record(&mut self, dt: f32) {
        self.frames += 1;
        self.elapsed += dt;
        if self.elapsed >= 1.0 {
            self.fps = self.frames as f32 / self.elapsed;
            self.frames = 0;
            self.elapsed = 0.0;
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::FrameLoopContext;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use web_sys::{HtmlCanvasElement, Window};

    use super::FpsCounter;
    use crate::controller::Game;
    use crate::model::Camera;
    use crate::ui;
    use crate::view::{GpuContext, SceneRenderer};

    /// Everything the browser frame callback needs
    pub struct FrameLoopContext {
        pub gpu: GpuContext,
        pub renderer: SceneRenderer,
        pub camera: Camera,
        pub canvas: HtmlCanvasElement,
        pub game: Rc<RefCell<Game>>,
        pub egui_ctx: egui::Context,
        pub fps: FpsCounter,
        pub last_time: f64,
    }

    impl FrameLoopContext {
        pub fn new(gpu: GpuContext, renderer: SceneRenderer, canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>, now: f64) -> Self {
            let camera = Camera::new(gpu.config.width, gpu.config.height);
            Self {
                gpu,
                renderer,
                camera,
                canvas,
                game,
                egui_ctx: egui::Context::default(),
                fps: FpsCounter::default(),
                last_time: now,
            }
        }

        /// One display refresh: tick the game, sync GPU state, draw
        pub fn frame(&mut self, window: &Window) {
            let now = window.performance().map(|p| p.now()).unwrap_or(self.last_time);
            let dt = ((now - self.last_time) / 1000.0).clamp(0.0, 0.1) as f32;
            self.last_time = now;
            self.fps.record(dt);

            self.handle_resize();

            let mut game = self.game.borrow_mut();
            game.tick();
            self.renderer.update(&self.gpu.queue, &game.scene, &self.camera);

            let dpr = window.device_pixel_ratio() as f32;
            self.egui_ctx.set_pixels_per_point(dpr);
            let raw_input = egui::RawInput {
                time: Some(now / 1000.0),
                screen_rect: Some(egui::Rect::from_min_size(
                    egui::Pos2::ZERO,
                    egui::vec2(self.renderer.width as f32 / dpr, self.renderer.height as f32 / dpr),
                )),
                ..Default::default()
            };
            let output = ui::build_hud(&self.egui_ctx, raw_input, &game, self.fps.fps());
            drop(game);

            let hud = ui::into_hud_frame(&self.egui_ctx, output);
            self.renderer.draw_frame(&self.gpu, Some(hud));
        }

        /// Follow the canvas' backing size
        fn handle_resize(&mut self) {
            let (w, h) = (self.canvas.width(), self.canvas.height());
            if w == 0 || h == 0 || (w == self.renderer.width && h == self.renderer.height) {
                return;
            }
            tracing::debug!(width = w, height = h, "canvas resized");
            self.gpu.resize(w, h);
            self.renderer.resize(&self.gpu.device, w, h);
            self.camera.set_aspect(w, h);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_counter_publishes_each_second() {
        let mut fps = FpsCounter::default();
        for _ in 0..59 {
            fps.record(1.0 / 60.0);
        }
        assert_eq!(fps.fps(), 0.0);
        fps.record(1.0 / 60.0 + 0.001);
        assert!((fps.fps() - 60.0).abs() < 0.1);
    }
}
