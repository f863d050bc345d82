// Re-export all public modules so they can be used from main.rs
pub mod config;
pub mod error;
pub mod logging;
pub mod ui;

// MVC Architecture
pub mod model;
pub mod view;
pub mod controller;

pub use config::GameConfig;
pub use controller::Game;
pub use error::StartupError;

/// Id of the canvas the game renders into
pub const CANVAS_ID: &str = "viewport";
/// Id of the element that receives the fallback message
pub const ERROR_ELEMENT_ID: &str = "error-message";
pub const FALLBACK_HTML: &str = "<h1>Enable WebGL to continue.</h1>";

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{prelude::wasm_bindgen, JsCast, JsValue};
#[cfg(target_arch = "wasm32")]
use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, Window};

#[cfg(target_arch = "wasm32")]
use controller::InputProcessor;
#[cfg(target_arch = "wasm32")]
use view::{FrameLoopContext, GpuContext, SceneRenderer};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    logging::init();

    if let Err(e) = setup_app().await {
        tracing::error!("startup failed: {e}");
        show_fallback();
    }
    Ok(())
}

/// Main application setup for WASM
#[cfg(target_arch = "wasm32")]
async fn setup_app() -> Result<(), StartupError> {
    let window = web_sys::window().ok_or(StartupError::MissingHost("window"))?;
    let document = window.document().ok_or(StartupError::MissingHost("document"))?;
    let canvas = find_canvas(&document, CANVAS_ID)?;

    let gpu = GpuContext::new(&canvas, canvas.width(), canvas.height()).await?;
    let game = Rc::new(RefCell::new(Game::default()));
    let renderer = SceneRenderer::new(&gpu, &game.borrow().scene);
    tracing::info!(width = gpu.config.width, height = gpu.config.height, "renderer ready");

    setup_input_listeners(&document, game.clone())?;

    let now = window.performance().map(|p| p.now()).unwrap_or(0.0);
    let mut frame_ctx = FrameLoopContext::new(gpu, renderer, canvas, game, now);
    let f = RcCellCallback::new(window.clone(), {
        let window_for_loop = window.clone();
        move || frame_ctx.frame(&window_for_loop)
    });
    f.start()
}

#[cfg(target_arch = "wasm32")]
fn find_canvas(document: &Document, id: &'static str) -> Result<HtmlCanvasElement, StartupError> {
    document
        .get_element_by_id(id)
        .ok_or(StartupError::MissingElement(id))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| StartupError::NotACanvas(id))
}

/// Replace the page's error element with the fallback message
#[cfg(target_arch = "wasm32")]
fn show_fallback() {
    let element = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(ERROR_ELEMENT_ID));
    match element {
        Some(el) => el.set_inner_html(FALLBACK_HTML),
        None => tracing::warn!("no `{ERROR_ELEMENT_ID}` element to report into"),
    }
}

/// Keyboard events are turned into actions and applied between frames
#[cfg(target_arch = "wasm32")]
fn setup_input_listeners(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), StartupError> {
    let input_processor = InputProcessor::default();

    let keydown = Closure::wrap(Box::new(move |e: KeyboardEvent| {
        let event = controller::input::wasm::keyboard_event_to_input(&e);
        if let Some(action) = input_processor.process_event(&event) {
            game.borrow_mut().apply(action);
            e.prevent_default();
        }
    }) as Box<dyn FnMut(KeyboardEvent)>);
    document.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
    keydown.forget();

    Ok(())
}

/// Drives a closure from `requestAnimationFrame` for the lifetime of the page
#[cfg(target_arch = "wasm32")]
struct RcCellCallback {
    inner: Rc<RefCell<Box<dyn FnMut()>>>,
    window: Window,
}

#[cfg(target_arch = "wasm32")]
impl RcCellCallback {
    fn new(window: Window, f: impl FnMut() + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Box::new(f))),
            window,
        }
    }

    fn start(self) -> Result<(), StartupError> {
        let inner = self.inner.clone();
        let window = self.window.clone();

        let callback = Rc::new(RefCell::new(None::<Closure<dyn FnMut()>>));
        let callback_clone = callback.clone();

        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            inner.borrow_mut().as_mut()();

            // Schedule the next frame
            if let Some(cb) = callback_clone.borrow().as_ref() {
                if let Err(e) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    tracing::error!("requestAnimationFrame failed: {e:?}");
                }
            }
        }) as Box<dyn FnMut()>));

        if let Some(cb) = callback.borrow().as_ref() {
            self.window.request_animation_frame(cb.as_ref().unchecked_ref())?;
        }

        // Leak the closure to keep it alive
        std::mem::forget(callback);
        Ok(())
    }
}
