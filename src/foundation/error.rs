/// Convenience result type used across the crate.
pub type GrantResult<T> = Result<T, GrantError>;

/// Top-level error taxonomy for conversion and asset generation.
#[derive(thiserror::Error, Debug)]
pub enum GrantError {
    /// Invalid job parameters or asset plan values.
    #[error("validation error: {0}")]
    Validation(String),

    /// A required input file or external tool is missing.
    #[error("missing prerequisite: {0}")]
    Prerequisite(String),

    /// The external transcoder failed to run or exited unsuccessfully.
    #[error("transcode error: {0}")]
    Transcode(String),

    /// An asset could not be rendered or written.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GrantError {
    /// Build a [`GrantError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GrantError::Prerequisite`] value.
    pub fn prerequisite(msg: impl Into<String>) -> Self {
        Self::Prerequisite(msg.into())
    }

    /// Build a [`GrantError::Transcode`] value.
    pub fn transcode(msg: impl Into<String>) -> Self {
        Self::Transcode(msg.into())
    }

    /// Build a [`GrantError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}
