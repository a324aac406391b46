//! # Surreal Client
//!
//! This module implements a thin query client that decodes every response it receives.
//!
//! The client is agnostic to how the backend is reached. Establishing the session (WebSocket,
//! HTTP, authentication, namespace selection) is the job of an [`Rpc`] implementation; the
//! client only builds the RPC parameters and decodes the returned value with its [`Decoder`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use serde::Deserialize;
//! use surrealtest_core::client::{Rpc, SurrealClient};
//!
//! #[derive(Debug, Deserialize)]
//! struct User {
//!     name: String,
//! }
//!
//! # async fn run<R: Rpc>(rpc: R) -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = SurrealClient::new(rpc);
//!
//! client.prepare("DEFINE TABLE user; CREATE user:john SET name = 'John';").await?;
//!
//! let users = client.select::<User>("user").await?.into_result()?;
//! println!("{users:?}");
//! # Ok(())
//! # }
//! ```
use crate::{
    BoxError,
    check::CheckError,
    decode::{Decoded, Decoder},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::future::Future;

const QUERY: &str = "query";
const SELECT: &str = "select";
const CREATE: &str = "create";

/// The transport used to reach the backend.
///
/// An implementation sends one RPC call and resolves to the fully parsed response value.
pub trait Rpc {
    type Error: Into<BoxError>;

    fn send(
        &mut self,
        method: &str,
        params: Vec<Value>,
    ) -> impl Future<Output = Result<Value, Self::Error>> + Send;
}

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("Failed to encode the parameters of '{method}': '{source}'")]
    Encode {
        method: &'static str,
        source: serde_json::Error,
    },
    #[error("RPC call '{method}' failed: '{source}'")]
    Transport {
        method: &'static str,
        source: BoxError,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum PrepareError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error("Failed to prepare the database: '{0}'")]
    Check(#[from] CheckError),
}

/// A query client decoding every response into typed records.
#[derive(Debug, Clone)]
pub struct SurrealClient<R> {
    rpc: R,
    decoder: Decoder,
}

impl<R> SurrealClient<R>
where
    R: Rpc,
{
    pub fn new(rpc: R) -> Self {
        Self {
            rpc,
            decoder: Decoder::default(),
        }
    }

    /// Replaces the decoder, e.g. to use a different success token.
    pub fn with_decoder(mut self, decoder: Decoder) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    /// Gives back the underlying transport.
    pub fn into_inner(self) -> R {
        self.rpc
    }

    /// Runs a (possibly multi-statement) query and decodes every statement result.
    ///
    /// # Returns
    ///
    /// * `Ok(Decoded)` - The call succeeded; statement failures are reported inside.
    /// * `Err(RequestError)` - The call itself failed.
    pub async fn query<T>(
        &mut self,
        sql: &str,
        vars: Option<Value>,
    ) -> Result<Decoded<T>, RequestError>
    where
        T: DeserializeOwned,
    {
        let params = vec![Value::String(sql.to_string()), vars.unwrap_or(Value::Null)];
        let response = self.call(QUERY, params).await?;
        Ok(self.decoder.decode_all(response))
    }

    /// Selects a whole table (`user`) or a single record (`user:john`).
    pub async fn select<T>(&mut self, what: &str) -> Result<Decoded<T>, RequestError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .call(SELECT, vec![Value::String(what.to_string())])
            .await?;
        Ok(self.decoder.decode_all(response))
    }

    /// Creates a record in a table (`user`) or with a given id (`user:john`).
    pub async fn create<T, D>(
        &mut self,
        thing: &str,
        data: &D,
    ) -> Result<Decoded<T>, RequestError>
    where
        T: DeserializeOwned,
        D: Serialize + ?Sized,
    {
        let data = serde_json::to_value(data).map_err(|source| RequestError::Encode {
            method: CREATE,
            source,
        })?;
        let response = self
            .call(CREATE, vec![Value::String(thing.to_string()), data])
            .await?;
        Ok(self.decoder.decode_all(response))
    }

    /// Runs a schema or fixture script and fails if any of its statements failed.
    ///
    /// Statements are separated by semicolons, following SurrealQL syntax.
    pub async fn prepare(&mut self, schema: &str) -> Result<(), PrepareError> {
        let params = vec![Value::String(schema.to_string()), Value::Null];
        let response = self.call(QUERY, params).await?;
        self.decoder.check_response(response)?;
        Ok(())
    }

    async fn call(
        &mut self,
        method: &'static str,
        params: Vec<Value>,
    ) -> Result<Value, RequestError> {
        tracing::debug!(method, "sending rpc call");

        self.rpc
            .send(method, params)
            .await
            .map_err(|e| RequestError::Transport {
                method,
                source: e.into(),
            })
    }
}
