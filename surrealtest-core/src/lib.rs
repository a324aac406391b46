//! # Surrealtest Core
//!
//! `surrealtest-core` is the foundational library powering the `surrealtest` CLI. It decodes
//! the dynamically-shaped responses returned by SurrealDB (and compatible query backends) into
//! statically-typed records without compile-time knowledge of how the response is nested.
//!
//! A single response can be a bare record, a list of records, a status envelope
//! (`{ "status": "OK", "time": "...", "result": ... }`) or any recursive mixture of these.
//!
//! ## Key Components
//!
//! * **[`decode_all`]:** The main entry point. Flattens any response into a [`Decoded`] list of
//!   records, unwrapping successful envelopes and collecting every failure on the way.
//! * **[`Decoder`]:** The configurable version of [`decode_all`], for backends that use a
//!   success token other than [`SUCCESS_STATUS`].
//! * **[`DecodeError`]:** Every way a branch of the response can fail. Failures of sibling
//!   branches are aggregated into a [`CombinedError`] instead of stopping at the first one.
//!
//! ## Example
//!
//! ```rust
//! use serde::Deserialize;
//! use surrealtest_core::decode_all;
//!
//! #[derive(Debug, Deserialize, PartialEq)]
//! struct User {
//!     name: String,
//! }
//!
//! let response = serde_json::json!([
//!     { "status": "OK", "time": "12µs", "result": [{ "name": "John" }] },
//!     { "status": "OK", "time": "9µs", "result": [{ "name": "Johnny" }] },
//! ]);
//!
//! let users = decode_all::<User>(response).into_result().unwrap();
//! assert_eq!(users[0].name, "John");
//! assert_eq!(users[1].name, "Johnny");
//! ```
//!
//! ## Supporting modules
//!
//! * **[`check`]:** Validates the per-statement status of a multi-statement query (schema setup).
//! * **[`client`]:** A thin query client on top of any [`client::Rpc`] transport, decoding every
//!   response with a [`Decoder`].
//!
//! See the README.md for more details about usage.
pub mod check;
pub mod client;
pub mod decode;
pub mod envelope;
pub mod error;
pub mod value;

pub use check::check_response;
pub use decode::{Decoded, Decoder, SUCCESS_STATUS, decode_all};
pub use error::{BackendFailure, CombinedError, DecodeError};

/// Type alias for the standard boxed error used by transport collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
