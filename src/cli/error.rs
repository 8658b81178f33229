//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::exitcode;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        CliError::Application(e.into())
    }
}

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => exitcode::USAGE,
            CliError::Application(e) => match e {
                ApplicationError::Domain(_)
                | ApplicationError::Input { .. }
                | ApplicationError::TooDeep { .. } => exitcode::DATAERR,
                ApplicationError::Config { .. } => exitcode::CONFIG,
                ApplicationError::OperationFailed { source, .. } => {
                    match source.downcast_ref::<std::io::Error>().map(|io| io.kind()) {
                        Some(std::io::ErrorKind::NotFound) => exitcode::NOINPUT,
                        Some(std::io::ErrorKind::PermissionDenied) => exitcode::CANTCREAT,
                        Some(_) => exitcode::IOERR,
                        None => exitcode::SOFTWARE,
                    }
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn io_failure(kind: std::io::ErrorKind) -> CliError {
        CliError::Application(ApplicationError::OperationFailed {
            context: "read input: x.toml".into(),
            source: Box::new(std::io::Error::from(kind)),
        })
    }

    #[rstest]
    #[case(CliError::Usage("x".into()), exitcode::USAGE)]
    #[case(CliError::InvalidArgs("x".into()), exitcode::USAGE)]
    #[case(DomainError::EmptyAdjacency.into(), exitcode::DATAERR)]
    #[case(
        CliError::Application(ApplicationError::Config { message: "bad".into() }),
        exitcode::CONFIG
    )]
    #[case(
        CliError::Application(ApplicationError::TooDeep { height: 600, limit: 512 }),
        exitcode::DATAERR
    )]
    #[case(io_failure(std::io::ErrorKind::NotFound), exitcode::NOINPUT)]
    #[case(io_failure(std::io::ErrorKind::Other), exitcode::IOERR)]
    fn given_error_when_mapping_then_exit_code(#[case] error: CliError, #[case] expected: i32) {
        assert_eq!(error.exit_code(), expected);
    }

    #[test]
    fn given_domain_error_when_displayed_then_message_passes_through() {
        let error: CliError = DomainError::RootNotFound("Z".into()).into();
        assert!(error.to_string().contains("Z"));
    }
}
