use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("gamepad in slot {slot} reports {buttons} buttons, at least 4 are required")]
    MalformedDevice { slot: usize, buttons: usize },
    #[error("invalid session file: {0}")]
    InvalidSessionFile(String),
    #[error("session io error: {0}")]
    SessionIo(String),
    #[error("input substitution is already active")]
    DoubleActivation,
    #[error("config io error: {0}")]
    ConfigIo(String),
    #[error("config parse error: {0}")]
    ConfigParse(String),
}
