use thiserror::Error;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("counter text {0:?} has no digits")]
    MalformedCounter(String),
    #[error("counter text {0:?} is out of range")]
    CounterOverflow(String),
    #[error("invalid data-target {0:?}")]
    InvalidTickerTarget(String),
    #[error("playlist has no sources")]
    EmptyPlaylist,
    #[error("invalid site config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("storage unavailable")]
    StorageUnavailable,
    #[error("browser call failed: {0}")]
    Js(String),
}

impl From<wasm_bindgen::JsValue> for SiteError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        SiteError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}
