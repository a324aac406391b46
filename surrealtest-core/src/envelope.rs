//! # Envelope Classifier
//!
//! SurrealDB wraps the result of every statement in a status envelope:
//!
//! ```json
//! { "status": "OK", "time": "35.2µs", "result": [{ "id": "user:john", "name": "John" }] }
//! { "status": "ERR", "time": "12.1µs", "detail": "Database record `user:j` already exists" }
//! ```
//!
//! Some RPC methods (`select`, `create`) return the records directly instead. This module
//! decides which of the two a single value is.
//!
//! ## Classification rules
//!
//! * Anything that is not an object, or an object without a `status` (or with a `null` or
//!   empty one) is **raw payload**.
//! * An object whose `status` is the success token is a **successful envelope**; its `result`
//!   is the payload.
//! * Any other non-empty `status` is a **failed envelope**.
//! * An object whose `status` (or `time`/`detail`, once `status` marks it as an envelope) has
//!   the wrong type is **malformed**. This is a hard error, never a fallback to raw payload.
use crate::{
    error::{BackendFailure, DecodeError},
    value::{DynamicValue, Scalar},
};
use std::collections::BTreeMap;

const STATUS: &str = "status";
const TIME: &str = "time";
const RESULT: &str = "result";
const DETAIL: &str = "detail";

/// The outcome of classifying a single (non-sequence) value.
#[derive(Debug, Clone, PartialEq)]
pub enum EnvelopeOutcome {
    /// The value is raw payload. Ownership is handed back to the caller.
    NotAnEnvelope(DynamicValue),
    /// The envelope reports success. `None` when the `result` is absent or `null`.
    Success(Option<DynamicValue>),
    /// The envelope reports a failure.
    Failure(BackendFailure),
}

/// The fields of a response envelope, once recognised as such.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub status: String,
    pub time: Option<String>,
    pub result: Option<DynamicValue>,
    pub detail: Option<String>,
}

impl Envelope {
    /// Builds the failure reported by this envelope.
    ///
    /// The explanation is the `detail`, falling back to the `result` rendered as text.
    fn into_failure(self) -> BackendFailure {
        let detail = match (self.detail, self.result) {
            (Some(detail), _) if !detail.is_empty() => detail,
            (_, Some(DynamicValue::Scalar(Scalar::String(text)))) => text,
            (_, Some(result)) => serde_json::Value::from(result).to_string(),
            (_, None) => String::new(),
        };

        if detail.is_empty() {
            return BackendFailure::without_detail(self.status);
        }

        BackendFailure::new(self.status, detail)
    }
}

/// Classifies a single value as raw payload, a successful envelope or a failed envelope.
///
/// # Arguments
///
/// * `value` - The value to classify. Sequences are raw payload from this function's point of
///   view; flattening them is the decoder's job.
/// * `success_status` - The status token that marks a successful envelope (e.g. `OK`).
///
/// # Returns
///
/// * `Ok(EnvelopeOutcome)` - The classification.
/// * `Err(DecodeError::EnvelopeMismatch)` - If the value is an envelope with ill-typed fields.
pub fn classify(
    value: DynamicValue,
    success_status: &str,
) -> Result<EnvelopeOutcome, DecodeError> {
    let mut map = match value {
        DynamicValue::Mapping(map) => map,
        other => return Ok(EnvelopeOutcome::NotAnEnvelope(other)),
    };

    let status = match map.get(STATUS) {
        None | Some(DynamicValue::Scalar(Scalar::Null)) => None,
        Some(DynamicValue::Scalar(Scalar::String(s))) if s.is_empty() => None,
        Some(DynamicValue::Scalar(Scalar::String(s))) => Some(s.clone()),
        Some(other) => {
            return Err(DecodeError::EnvelopeMismatch {
                field: STATUS,
                expected: "a string",
                found: other.kind(),
            });
        }
    };

    let Some(status) = status else {
        return Ok(EnvelopeOutcome::NotAnEnvelope(DynamicValue::Mapping(map)));
    };

    let envelope = Envelope {
        status,
        time: take_text(&mut map, TIME)?,
        detail: take_text(&mut map, DETAIL)?,
        result: map.remove(RESULT).filter(|result| !result.is_null()),
    };

    if let Some(time) = &envelope.time {
        tracing::trace!(status = %envelope.status, time = %time, "classified response envelope");
    }

    if envelope.status == success_status {
        Ok(EnvelopeOutcome::Success(envelope.result))
    } else {
        Ok(EnvelopeOutcome::Failure(envelope.into_failure()))
    }
}

fn take_text(
    map: &mut BTreeMap<String, DynamicValue>,
    field: &'static str,
) -> Result<Option<String>, DecodeError> {
    match map.remove(field) {
        None | Some(DynamicValue::Scalar(Scalar::Null)) => Ok(None),
        Some(DynamicValue::Scalar(Scalar::String(s))) => Ok(Some(s)),
        Some(other) => Err(DecodeError::EnvelopeMismatch {
            field,
            expected: "a string",
            found: other.kind(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn classify_json(value: serde_json::Value) -> Result<EnvelopeOutcome, DecodeError> {
        classify(DynamicValue::from(value), "OK")
    }

    #[test]
    fn object_without_status_is_raw_payload() {
        let value = json!({ "name": "Jo" });

        let outcome = classify_json(value.clone()).unwrap();

        assert_eq!(
            outcome,
            EnvelopeOutcome::NotAnEnvelope(DynamicValue::from(value))
        );
    }

    #[test]
    fn empty_or_null_status_is_raw_payload() {
        for value in [json!({ "status": "" }), json!({ "status": null, "x": 1 })] {
            let outcome = classify_json(value).unwrap();
            assert!(matches!(outcome, EnvelopeOutcome::NotAnEnvelope(_)));
        }
    }

    #[test]
    fn scalars_and_sequences_are_raw_payload() {
        for value in [json!("text"), json!(3), json!(null), json!([1, 2])] {
            let outcome = classify_json(value).unwrap();
            assert!(matches!(outcome, EnvelopeOutcome::NotAnEnvelope(_)));
        }
    }

    #[test]
    fn success_envelope_yields_its_result() {
        let outcome =
            classify_json(json!({ "status": "OK", "time": "1ms", "result": [{ "a": 1 }] }))
                .unwrap();

        assert_eq!(
            outcome,
            EnvelopeOutcome::Success(Some(DynamicValue::from(json!([{ "a": 1 }]))))
        );
    }

    #[test]
    fn success_envelope_without_result_is_empty() {
        for value in [json!({ "status": "OK" }), json!({ "status": "OK", "result": null })] {
            assert_eq!(classify_json(value).unwrap(), EnvelopeOutcome::Success(None));
        }
    }

    #[test]
    fn failure_envelope_formats_status_and_detail() {
        let outcome = classify_json(json!({
            "status": "ERR",
            "time": "4µs",
            "detail": "Database record `user:j` already exists"
        }))
        .unwrap();

        let EnvelopeOutcome::Failure(failure) = outcome else {
            panic!("Expected a failure");
        };

        assert_eq!(failure.status(), "ERR");
        assert_eq!(
            failure.to_string(),
            "ERR: Database record `user:j` already exists"
        );
    }

    #[test]
    fn failure_without_detail_falls_back_to_result() {
        let outcome =
            classify_json(json!({ "status": "ERR", "result": "cancelled transaction" })).unwrap();

        let EnvelopeOutcome::Failure(failure) = outcome else {
            panic!("Expected a failure");
        };

        assert_eq!(failure.to_string(), "ERR: cancelled transaction");
    }

    #[test]
    fn failure_without_any_explanation_is_its_status() {
        let EnvelopeOutcome::Failure(failure) = classify_json(json!({ "status": "ERR" })).unwrap()
        else {
            panic!("Expected a failure");
        };

        assert_eq!(failure.detail(), None);
        assert_eq!(failure.to_string(), "ERR");
    }

    #[test]
    fn custom_success_token_is_honoured() {
        let value = DynamicValue::from(json!({ "status": "SUCCESS", "result": 1 }));

        let outcome = classify(value, "SUCCESS").unwrap();

        assert!(matches!(outcome, EnvelopeOutcome::Success(Some(_))));
    }

    #[test]
    fn ill_typed_status_is_a_hard_error() {
        let err = classify_json(json!({ "status": 200, "result": [] })).unwrap_err();

        assert!(matches!(
            err,
            DecodeError::EnvelopeMismatch {
                field: "status",
                found: "a number",
                ..
            }
        ));
    }

    #[test]
    fn ill_typed_detail_is_a_hard_error() {
        let err = classify_json(json!({ "status": "ERR", "detail": { "code": 1 } })).unwrap_err();

        assert!(matches!(
            err,
            DecodeError::EnvelopeMismatch {
                field: "detail",
                ..
            }
        ));
    }
}
