use serde_json::Value;
use std::collections::VecDeque;
use std::future::Future;
use surrealtest_core::client::Rpc;

#[derive(Debug, thiserror::Error)]
pub enum ScriptedRpcError {
    #[error("No scripted response left")]
    Exhausted,
    #[error("Connection refused")]
    ConnectionRefused,
}

// An in-memory backend that answers calls with canned responses, in order,
// and remembers every call it received.
#[derive(Debug, Default)]
pub struct ScriptedRpc {
    responses: VecDeque<Result<Value, ScriptedRpcError>>,
    pub calls: Vec<(String, Vec<Value>)>,
}

impl ScriptedRpc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, response: Value) -> Self {
        self.responses.push_back(Ok(response));
        self
    }

    pub fn fail(mut self, error: ScriptedRpcError) -> Self {
        self.responses.push_back(Err(error));
        self
    }
}

impl Rpc for ScriptedRpc {
    type Error = ScriptedRpcError;

    fn send(
        &mut self,
        method: &str,
        params: Vec<Value>,
    ) -> impl Future<Output = Result<Value, Self::Error>> + Send {
        self.calls.push((method.to_string(), params));
        let next = self
            .responses
            .pop_front()
            .unwrap_or(Err(ScriptedRpcError::Exhausted));

        async move { next }
    }
}
