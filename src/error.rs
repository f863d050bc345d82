/// Everything that can stop the game from starting. Once the frame loop
/// runs, nothing is fallible.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("no `{0}` available")]
    MissingHost(&'static str),

    #[error("no element with id `{0}`")]
    MissingElement(&'static str),

    #[error("element `{0}` is not a canvas")]
    NotACanvas(&'static str),

    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,

    #[error("javascript error: {0}")]
    Js(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for StartupError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        StartupError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}
