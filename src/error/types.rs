use thiserror::Error;

/// Unified result type for the maw crate.
pub type Result<T> = std::result::Result<T, MawError>;

/// Errors surfaced by the widget layer, the runtime, and the wrap-job layer.
#[derive(Debug, Error)]
pub enum MawError {
    #[error("invalid notebook style: {0}")]
    InvalidStyle(String),
    #[error("tab container requires a notebook parent, found `{found}`")]
    InvalidParent { found: String },
    #[error("art provider cannot render this content: {0}")]
    UnsupportedContent(String),
    #[error("zone `{0}` not found")]
    ZoneNotFound(String),
    #[error("layout strip has no slots")]
    EmptyLayout,
    #[error("wrap job failure: {0}")]
    Binding(String),
    #[error("test failed: {0}")]
    TestFailed(String),
    #[error("watchdog timed out")]
    WatchdogTimeout,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
