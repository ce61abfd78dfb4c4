//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Usage(String),

    #[error("snapshot has {count} link problem(s)")]
    Inconsistent { count: usize },

    #[error("chart is {depth} levels deep, output is limited to {limit}")]
    TooDeep { depth: usize, limit: usize },
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Inconsistent { .. } | CliError::TooDeep { .. } => crate::exitcode::DATAERR,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Serialize(_) => crate::exitcode::SOFTWARE,
                InfraError::Application(app) => match app {
                    ApplicationError::InvalidSnapshot { .. } => crate::exitcode::DATAERR,
                    ApplicationError::SnapshotNotFound(_) => crate::exitcode::NOINPUT,
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::OperationFailed { .. } => crate::exitcode::IOERR,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn given_missing_snapshot_when_mapping_exit_code_then_noinput() {
        let err: CliError = ApplicationError::SnapshotNotFound(PathBuf::from("x.json")).into();
        assert_eq!(err.exit_code(), crate::exitcode::NOINPUT);
    }

    #[test]
    fn given_inconsistent_snapshot_when_mapping_exit_code_then_dataerr() {
        let err = CliError::Inconsistent { count: 2 };
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
        assert_eq!(err.to_string(), "snapshot has 2 link problem(s)");
    }

    #[test]
    fn given_too_deep_chart_when_mapping_exit_code_then_dataerr() {
        let err = CliError::TooDeep {
            depth: 5000,
            limit: 1000,
        };
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
        assert_eq!(
            err.to_string(),
            "chart is 5000 levels deep, output is limited to 1000"
        );
    }
}
