//! # Response Checker
//!
//! Validates the response of a multi-statement query whose results are not needed, such as a
//! schema definition or test fixture setup:
//!
//! ```sql
//! DEFINE TABLE user;
//! DEFINE FIELD name ON TABLE user ASSERT $value != none;
//! CREATE user:john SET name = "John";
//! ```
//!
//! Each statement answers with its own envelope. Instead of stopping at the first failing
//! statement, every failure is reported.
use crate::{
    decode::Decoder,
    envelope::{EnvelopeOutcome, classify},
    error::{CombinedError, DecodeError},
    value::DynamicValue,
};

const NO_STATUS: &str = "statement returned no status";

#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("Failed to read the query response: '{0}'")]
    Malformed(#[from] DecodeError),
    #[error("Failed to execute query:\n    {}", .0.join("\n    "))]
    StatementsFailed(Vec<String>),
}

/// Checks a query response with the default [`Decoder`].
pub fn check_response(value: serde_json::Value) -> Result<(), CheckError> {
    Decoder::default().check_response(value)
}

/// Everything found while walking the statements of a response.
#[derive(Debug, Default)]
struct Findings {
    /// One line per failing statement, malformed ones included, in encounter order.
    lines: Vec<String>,
    malformed: Vec<DecodeError>,
}

impl Findings {
    fn push_malformed(&mut self, err: DecodeError) {
        self.lines.push(err.to_string());
        self.malformed.push(err);
    }

    fn into_result(self) -> Result<(), CheckError> {
        if self.lines.len() > self.malformed.len() {
            tracing::debug!(
                count = self.lines.len(),
                malformed = self.malformed.len(),
                "query statements failed"
            );
            return Err(CheckError::StatementsFailed(self.lines));
        }

        match CombinedError::combine(self.malformed) {
            Some(err) => Err(CheckError::Malformed(err)),
            None => Ok(()),
        }
    }
}

impl Decoder {
    /// Checks that every statement of a query response succeeded.
    ///
    /// The response may be a list of statement envelopes (nested lists are walked too) or a
    /// single envelope. Every element is checked, even after a failing or malformed one.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Every statement reported success.
    /// * `Err(CheckError::StatementsFailed)` - One entry per failing statement, holding the
    ///   backend's detail (or its status when there is none). Malformed envelopes found in the
    ///   same response are listed among them.
    /// * `Err(CheckError::Malformed)` - If the only problems are envelopes with ill-typed fields.
    pub fn check_response(&self, value: serde_json::Value) -> Result<(), CheckError> {
        let mut findings = Findings::default();
        self.collect_failures(DynamicValue::from(value), &mut findings);
        findings.into_result()
    }

    fn collect_failures(&self, value: DynamicValue, findings: &mut Findings) {
        match value {
            DynamicValue::Sequence(items) => {
                for item in items {
                    self.collect_failures(item, findings);
                }
            }
            item => match classify(item, self.success_status()) {
                Ok(EnvelopeOutcome::Success(_)) => {}
                Ok(EnvelopeOutcome::Failure(failure)) => {
                    findings.lines.push(failure.explanation().to_string())
                }
                Ok(EnvelopeOutcome::NotAnEnvelope(_)) => findings.lines.push(NO_STATUS.to_string()),
                Err(err) => findings.push_malformed(err),
            },
        }
    }
}
