use thiserror::Error;

/// Errors raised while loading or validating a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scenario: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid scenario parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl ScenarioError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ScenarioError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
