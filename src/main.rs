use std::sync::Arc;

use winit::{
    event::*,
    event_loop::EventLoop,
    window::Window,
};

// Import from the library crate
use subhunt::{
    controller::{input, Game, InputProcessor},
    logging,
    model::Camera,
    ui,
    view::{FpsCounter, GpuContext, SceneRenderer},
    StartupError,
};

struct App {
    window: Arc<Window>,
    gpu: GpuContext,
    renderer: SceneRenderer,
    camera: Camera,

    // egui
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,

    // Game state
    game: Game,
    input_processor: InputProcessor,

    // Frame timing
    last_frame_time: std::time::Instant,
    fps: FpsCounter,
}

impl App {
    async fn new(window: Arc<Window>) -> Result<Self, StartupError> {
        let gpu = GpuContext::new_native(window.clone()).await?;
        let game = Game::default();
        let renderer = SceneRenderer::new(&gpu, &game.scene);
        let camera = Camera::new(gpu.config.width, gpu.config.height);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            None,
            None,
            None,
        );

        tracing::info!(width = gpu.config.width, height = gpu.config.height, "renderer ready");

        Ok(Self {
            window,
            gpu,
            renderer,
            camera,
            egui_state,
            egui_ctx,
            game,
            input_processor: InputProcessor::default(),
            last_frame_time: std::time::Instant::now(),
            fps: FpsCounter::default(),
        })
    }

    /// Returns true when the event was consumed
    fn input(&mut self, event: &WindowEvent) -> bool {
        // First let egui process the event
        if self.egui_state.on_window_event(self.window.as_ref(), event).consumed {
            return true;
        }

        match event {
            WindowEvent::KeyboardInput { event: KeyEvent { state: ElementState::Pressed, logical_key, .. }, .. } => {
                let action = input::native::key_to_input(logical_key)
                    .and_then(|e| self.input_processor.process_event(&e));
                if let Some(action) = action {
                    self.game.apply(action);
                }
                true
            }
            _ => false,
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.gpu.resize(new_size.width, new_size.height);
            self.renderer.resize(&self.gpu.device, new_size.width, new_size.height);
            self.camera.set_aspect(new_size.width, new_size.height);
        }
    }

    fn redraw(&mut self) {
        let now = std::time::Instant::now();
        self.fps.record((now - self.last_frame_time).as_secs_f32());
        self.last_frame_time = now;

        self.game.tick();
        self.renderer.update(&self.gpu.queue, &self.game.scene, &self.camera);

        let raw_input = self.egui_state.take_egui_input(&self.window);
        let mut output = ui::build_hud(&self.egui_ctx, raw_input, &self.game, self.fps.fps());
        self.egui_state
            .handle_platform_output(&self.window, std::mem::take(&mut output.platform_output));
        let hud = ui::into_hud_frame(&self.egui_ctx, output);

        self.renderer.draw_frame(&self.gpu, Some(hud));
    }
}

fn main() {
    logging::init();

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            tracing::error!("failed to create event loop: {e}");
            std::process::exit(1);
        }
    };
    let window_attributes = Window::default_attributes()
        .with_title("Subhunt")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
    let window = match event_loop.create_window(window_attributes) {
        Ok(window) => Arc::new(window),
        Err(e) => {
            tracing::error!("failed to create window: {e}");
            std::process::exit(1);
        }
    };

    let mut app = match pollster::block_on(App::new(window)) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("startup failed: {e}");
            std::process::exit(1);
        }
    };

    let result = event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { ref event, window_id } if window_id == app.window.id() => {
            if !app.input(event) {
                match event {
                    WindowEvent::CloseRequested => elwt.exit(),
                    WindowEvent::Resized(physical_size) => app.resize(*physical_size),
                    WindowEvent::RedrawRequested => app.redraw(),
                    _ => {}
                }
            }
        }
        Event::AboutToWait => {
            app.window.request_redraw();
        }
        _ => {}
    });

    if let Err(e) = result {
        tracing::error!("event loop terminated: {e}");
    }
}
