//! # Recursive Flattening Decoder
//!
//! This module turns a whole response into a flat list of records.
//!
//! ## How it works
//!
//! The response is walked depth-first:
//!
//! 1. **Sequences** are decoded element by element and the records are concatenated in
//!    encounter order. Every element is attempted, even after a failing one.
//! 2. **Single items** are classified by [`crate::envelope::classify`]:
//!    - Raw payload is converted into one record.
//!    - A successful envelope is unwrapped and its `result` is walked again, to whatever depth
//!      the response actually has.
//!    - A failed envelope contributes no records and a [`BackendFailure`](crate::BackendFailure).
//!
//! Errors from sibling branches are merged with [`CombinedError::combine`], so the final
//! [`Decoded`] can hold both records and an error.
use crate::{
    envelope::{EnvelopeOutcome, classify},
    error::{CombinedError, DecodeError},
    value::{DynamicValue, convert},
};
use serde::de::DeserializeOwned;

/// The status token SurrealDB uses to mark a successful statement.
pub const SUCCESS_STATUS: &str = "OK";

/// Decodes a response into a flat list of records using the default [`Decoder`].
///
/// # Example
///
/// ```rust
/// use surrealtest_core::decode_all;
///
/// let response = serde_json::json!({ "status": "ERR", "detail": "Database record already exists" });
///
/// let decoded = decode_all::<serde_json::Value>(response);
///
/// assert!(decoded.records().is_empty());
/// assert!(decoded.error().unwrap().to_string().contains("already exists"));
/// ```
pub fn decode_all<T>(value: serde_json::Value) -> Decoded<T>
where
    T: DeserializeOwned,
{
    Decoder::default().decode_all(value)
}

/// A response decoder.
///
/// Holds no state besides its configuration, so a single instance can be shared and reused
/// for any number of responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoder {
    success_status: String,
}

impl Default for Decoder {
    fn default() -> Self {
        Self {
            success_status: SUCCESS_STATUS.to_string(),
        }
    }
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the status token that marks a successful envelope.
    pub fn with_success_status(mut self, status: impl Into<String>) -> Self {
        self.success_status = status.into();
        self
    }

    pub fn success_status(&self) -> &str {
        &self.success_status
    }

    /// Decodes a response into a flat list of records of type `T`.
    ///
    /// The response may be a bare record, a list of records, a status envelope or any nesting
    /// of these.
    ///
    /// # Returns
    ///
    /// A [`Decoded`] holding every record that could be decoded, in depth-first order, and the
    /// combination of every error found on the way (if any).
    pub fn decode_all<T>(&self, value: serde_json::Value) -> Decoded<T>
    where
        T: DeserializeOwned,
    {
        self.decode_value(DynamicValue::from(value))
    }

    /// Same as [`Decoder::decode_all`], for an already tagged value.
    pub fn decode_value<T>(&self, value: DynamicValue) -> Decoded<T>
    where
        T: DeserializeOwned,
    {
        match value {
            DynamicValue::Sequence(items) => items
                .into_iter()
                .map(|item| self.decode_value(item))
                .collect(),
            item => self.decode_item(item),
        }
    }

    fn decode_item<T>(&self, item: DynamicValue) -> Decoded<T>
    where
        T: DeserializeOwned,
    {
        match classify(item, &self.success_status) {
            Ok(EnvelopeOutcome::NotAnEnvelope(raw)) => match convert(raw) {
                Ok(record) => Decoded::one(record),
                Err(err) => {
                    tracing::debug!(error = %err, "failed to convert raw payload");
                    Decoded::failed(err)
                }
            },
            Ok(EnvelopeOutcome::Success(Some(inner))) => self.decode_value(inner),
            Ok(EnvelopeOutcome::Success(None)) => Decoded::empty(),
            Ok(EnvelopeOutcome::Failure(failure)) => {
                tracing::debug!(
                    status = %failure.status(),
                    detail = failure.detail().unwrap_or_default(),
                    "backend reported a failure"
                );
                Decoded::failed(failure.into())
            }
            Err(err) => {
                tracing::debug!(error = %err, "malformed response envelope");
                Decoded::failed(err)
            }
        }
    }
}

/// The outcome of decoding a response.
///
/// Decoding never stops at the first failure, so a `Decoded` can hold records **and** an
/// error at the same time. Use [`Decoded::into_result`] to treat any failure as fatal, or
/// [`Decoded::into_parts`] to keep the partial result.
#[derive(Debug)]
pub struct Decoded<T> {
    records: Vec<T>,
    error: Option<DecodeError>,
}

impl<T> Decoded<T> {
    fn empty() -> Self {
        Self {
            records: Vec::new(),
            error: None,
        }
    }

    fn one(record: T) -> Self {
        Self {
            records: vec![record],
            error: None,
        }
    }

    fn failed(error: DecodeError) -> Self {
        Self {
            records: Vec::new(),
            error: Some(error),
        }
    }

    /// The records decoded so far, in depth-first order.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// The combination of every error found, if any.
    pub fn error(&self) -> Option<&DecodeError> {
        self.error.as_ref()
    }

    /// Returns `true` if no branch of the response failed.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_parts(self) -> (Vec<T>, Option<DecodeError>) {
        (self.records, self.error)
    }

    /// Returns the records, or the error if any branch of the response failed.
    ///
    /// The partial records are dropped in the error case.
    pub fn into_result(self) -> Result<Vec<T>, DecodeError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.records),
        }
    }
}

impl<T> FromIterator<Decoded<T>> for Decoded<T> {
    fn from_iter<I: IntoIterator<Item = Decoded<T>>>(iter: I) -> Self {
        let mut records = Vec::new();
        let mut errors = Vec::new();

        for decoded in iter {
            records.extend(decoded.records);
            errors.extend(decoded.error);
        }

        Self {
            records,
            error: CombinedError::combine(errors),
        }
    }
}
