//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Io { .. } => crate::exitcode::IOERR,
            CliError::Application(e) => match e {
                ApplicationError::Domain(_)
                | ApplicationError::InvalidInput { .. }
                | ApplicationError::Script { .. }
                | ApplicationError::Snapshot { .. } => crate::exitcode::DATAERR,
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::OperationFailed { source, .. } => {
                    match source.downcast_ref::<std::io::Error>() {
                        Some(io) if io.kind() == std::io::ErrorKind::NotFound => {
                            crate::exitcode::NOINPUT
                        }
                        Some(_) => crate::exitcode::IOERR,
                        None => crate::exitcode::SOFTWARE,
                    }
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::IoResultExt;
    use crate::domain::DomainError;
    use std::path::Path;

    #[test]
    fn given_missing_file_when_mapping_exit_code_then_noinput() {
        let err: CliError = std::fs::read_to_string("/definitely/not/here.txt")
            .with_path_context("read script", Path::new("/definitely/not/here.txt"))
            .unwrap_err()
            .into();
        assert_eq!(err.exit_code(), crate::exitcode::NOINPUT);
    }

    #[test]
    fn given_data_errors_when_mapping_exit_code_then_dataerr() {
        let errors = [
            ApplicationError::Domain(DomainError::MultipleRoots(2)),
            ApplicationError::InvalidInput { field: "name" },
            ApplicationError::Script {
                line: 1,
                message: "x".into(),
            },
        ];
        for e in errors {
            assert_eq!(CliError::from(e).exit_code(), crate::exitcode::DATAERR);
        }
    }

    #[test]
    fn given_usage_error_when_mapping_exit_code_then_usage() {
        assert_eq!(
            CliError::Usage("no command".into()).exit_code(),
            crate::exitcode::USAGE
        );
    }
}
