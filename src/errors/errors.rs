use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// Result of any rule, skipper or engine primitive.
pub type MatchResult<T> = Result<T, Error>;

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Option<Position>,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position: Some(position),
        }
    }

    /// An error that carries no location, such as a bare backtrack.
    pub fn unpositioned(error_impl: ErrorImpl) -> Self {
        Error {
            internal_error: error_impl,
            position: None,
        }
    }

    /// Anchors a positionless error at `position`; errors that already carry one keep it.
    pub fn or_at(mut self, position: Position) -> Self {
        if self.position.is_none() {
            self.position = Some(position);
        }
        self
    }

    pub fn get_position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn message(&self) -> String {
        self.internal_error.to_string()
    }

    /// Fatal errors are never turned into a failed speculative match.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.internal_error,
            ErrorImpl::UnknownSkipper { .. } | ErrorImpl::ReadFailed { .. }
        )
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::Expected { .. } => "Expected",
            ErrorImpl::Custom { .. } => "Custom",
            ErrorImpl::Backtrack => "Backtrack",
            ErrorImpl::UnknownSkipper { .. } => "UnknownSkipper",
            ErrorImpl::ReadFailed { .. } => "ReadFailed",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::Expected { expected } if expected.len() == 1 => {
                ErrorTip::Suggestion(format!("Insert `{}` here", expected[0]))
            }
            ErrorImpl::Expected { .. } => ErrorTip::None,
            ErrorImpl::Custom { .. } => ErrorTip::None,
            ErrorImpl::Backtrack => ErrorTip::None,
            ErrorImpl::UnknownSkipper { id } => ErrorTip::Suggestion(format!(
                "Skipper `{}` is not registered in the grammar",
                id
            )),
            ErrorImpl::ReadFailed { path, .. } => {
                ErrorTip::Suggestion(format!("Check that `{}` exists and is readable", path))
            }
        }
    }
}

impl Display for Error {
    /*
        ERROR: Expected: main
        -> file.pt:3:5
          |
        3 |     end
          |     ^
    */
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ERROR: {}", self.internal_error)?;
        if let Some(position) = &self.position {
            write!(f, "\n{}", position.describe())?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.internal_error)
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorImpl {
    #[error("Expected: {}", .expected.join(", "))]
    Expected { expected: Vec<String> },
    #[error("{message}")]
    Custom { message: String },
    #[error("backtrace()")]
    Backtrack,
    #[error("unknown skipper: {id:?}")]
    UnknownSkipper { id: String },
    #[error("failed to read {path:?}: {message}")]
    ReadFailed { path: String, message: String },
}
