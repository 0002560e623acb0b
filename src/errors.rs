// Error types shared by the preview engine and its hosts

use thiserror::Error;

/// Result type for preview engine operations
pub type PreviewResult<T> = Result<T, PreviewError>;

/// Failures reported by a `Compositor` implementation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositorError {
    #[error("desktop composition is unavailable")]
    Unavailable,
    #[error("compositor {op} failed (code {code:#x})")]
    Failed { op: &'static str, code: i64 },
    #[error("unknown thumbnail handle {0}")]
    UnknownHandle(u64),
}

#[derive(Debug, Error)]
pub enum PreviewError {
    /// Insert rejected because every slot is already in use
    #[error("The maximum number of previews is {capacity}.")]
    CapacityReached { capacity: usize },

    /// Remove rejected because only one slot is left
    #[error("The minimum number of previews is 1.")]
    MinimumReached,

    #[error("slot index {index} is outside the active range 0..{active}")]
    SlotOutOfRange { index: usize, active: usize },

    #[error(transparent)]
    Compositor(#[from] CompositorError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("settings store error: {0}")]
    Settings(String),

    #[error("platform error: {0}")]
    Platform(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PreviewError {
    /// Whether this error is a rejected user action that should be shown to the user
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            PreviewError::CapacityReached { .. } | PreviewError::MinimumReached
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = PreviewError::CapacityReached { capacity: 6 };
        assert_eq!(error.to_string(), "The maximum number of previews is 6.");
        assert!(error.is_user_facing());

        let error = PreviewError::from(CompositorError::Failed {
            op: "register",
            code: 0x8007_0057,
        });
        assert!(error.to_string().contains("register"));
        assert!(!error.is_user_facing());
    }
}
