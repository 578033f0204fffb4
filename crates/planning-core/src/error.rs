use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanningError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Phase not found: {0}")]
    PhaseNotFound(String),

    #[error("Field not found: {0}")]
    FieldNotFound(String),

    #[error("invalid phase number '{0}': expected a positive integer")]
    InvalidPhaseNumber(String),

    #[error("invalid milestone version '{0}': must be non-empty and contain no path separators")]
    InvalidVersion(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Regex(#[from] regex::Error),
}

impl PlanningError {
    /// Missing-input faults that are reported as an outcome record rather
    /// than aborting the invocation.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            PlanningError::FileNotFound(_)
                | PlanningError::PhaseNotFound(_)
                | PlanningError::FieldNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PlanningError>;
