//! # Decode Errors
//!
//! Every failure a branch of a response can produce while being decoded.
//!
//! A response is a tree, and each branch fails independently. Sibling failures are kept
//! together in a [`CombinedError`] so that no failure is ever hidden behind the first one.
use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The value carries a `status` and looks like an envelope, but one of its fields has the
    /// wrong type.
    #[error("Malformed response envelope: field '{field}' must be {expected}, found {found}")]
    EnvelopeMismatch {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    /// The backend reported a failed statement.
    #[error(transparent)]
    Backend(#[from] BackendFailure),
    /// The record type could not represent the decoded shape.
    #[error("Failed to convert value into the target record type: '{0}'")]
    Conversion(#[source] serde_json::Error),
    #[error(transparent)]
    Combined(#[from] CombinedError),
}

impl DecodeError {
    /// Iterates over the leaf errors: the error itself, or every member of a combined error.
    pub fn iter(&self) -> impl Iterator<Item = &DecodeError> {
        let errors = match self {
            DecodeError::Combined(combined) => combined.errors.as_slice(),
            single => std::slice::from_ref(single),
        };
        errors.iter()
    }

    /// Iterates over every failure reported by the backend itself.
    pub fn backend_failures(&self) -> impl Iterator<Item = &BackendFailure> {
        self.iter().filter_map(|err| match err {
            DecodeError::Backend(failure) => Some(failure),
            _ => None,
        })
    }
}

/// A failure reported by the backend through a response envelope.
///
/// The message is kept verbatim, so callers can look for well known conditions such as
/// `already exists` or `cancelled transaction`. It displays as `<status>: <detail>`, or as the
/// bare status when the backend gave no explanation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendFailure {
    status: String,
    detail: Option<String>,
}

impl BackendFailure {
    pub fn new(status: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            detail: Some(detail.into()),
        }
    }

    /// A failure that carries nothing but its status token.
    pub fn without_detail(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            detail: None,
        }
    }

    /// The status token reported by the backend (e.g. `ERR`).
    pub fn status(&self) -> &str {
        &self.status
    }

    /// The human readable explanation reported by the backend, if any.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// The detail when there is one, otherwise the status.
    pub fn explanation(&self) -> &str {
        self.detail().unwrap_or(&self.status)
    }
}

impl fmt::Display for BackendFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {}", self.status, detail),
            None => write!(f, "{}", self.status),
        }
    }
}

impl std::error::Error for BackendFailure {}

/// Every error collected across the sibling branches of a sequence.
///
/// Always holds at least two errors, none of them a `Combined` one.
#[derive(Debug)]
pub struct CombinedError {
    errors: Vec<DecodeError>,
}

impl CombinedError {
    /// Merges a list of errors into at most one.
    ///
    /// Nested combined errors are flattened. Zero errors yield `None` and a single error is
    /// returned as is.
    pub fn combine(errors: impl IntoIterator<Item = DecodeError>) -> Option<DecodeError> {
        let mut flat = Vec::new();
        for err in errors {
            match err {
                DecodeError::Combined(combined) => flat.extend(combined.errors),
                err => flat.push(err),
            }
        }

        match flat.len() {
            0 => None,
            1 => flat.pop(),
            _ => Some(DecodeError::Combined(CombinedError { errors: flat })),
        }
    }

    pub fn errors(&self) -> &[DecodeError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for CombinedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CombinedError {}
