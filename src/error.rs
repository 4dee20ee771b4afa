use thiserror::Error;

/// Application-level error: a message plus the process exit code it maps to.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Hard failures inside the scoring pipeline.
///
/// These are never recovered locally: a mismatched schema or an empty
/// training set ends the run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("Schema mismatch: expected {expected} feature columns, found {found}.")]
    SchemaMismatch { expected: usize, found: usize },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PipelineError {
    pub fn exit_code(&self) -> u8 {
        match self {
            PipelineError::InvalidConfig(_) => 2,
            PipelineError::InsufficientData(_) => 3,
            PipelineError::SchemaMismatch { .. } => 4,
        }
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_errors_map_to_exit_codes() {
        let err: AppError = PipelineError::SchemaMismatch { expected: 13, found: 12 }.into();
        assert_eq!(err.exit_code(), 4);
        assert_eq!(
            err.to_string(),
            "Schema mismatch: expected 13 feature columns, found 12."
        );

        let err: AppError = PipelineError::InvalidConfig("threshold".into()).into();
        assert_eq!(err.exit_code(), 2);
    }
}
