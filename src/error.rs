//! Error types for the mascot core.

/// Top-level error type.
///
/// Speech suppression and dialogue lookups that miss are NOT errors; they are
/// ordinary values (`SpeechDecision::Suppressed`, fallback nodes).
#[derive(Debug, thiserror::Error)]
pub enum MascotError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode error (content catalog, persisted flags).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Content catalog failed validation.
    #[error("content error: {0}")]
    Content(String),

    /// Flag store error.
    #[error("storage error: {0}")]
    Storage(String),

    /// The host selected an action that is not currently on screen.
    #[error("no dialogue action at index {index} ({available} available)")]
    NoSuchAction { index: usize, available: usize },

    /// No on-screen action carries this label.
    #[error("no dialogue action labelled '{0}'")]
    NoSuchLabel(String),

    /// The dialogue panel is closed.
    #[error("dialogue panel is not open")]
    DialogueClosed,
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, MascotError>;
