//! Builder for `run_job` request payloads.

use indexmap::IndexMap;
use nodepack_codec::normalize::{EDGES, GRAPH, NODES};
use nodepack_codec::{msgpack, Value};
use tracing::debug;

pub const COMMAND: &str = "run_job";
pub const REQUEST_TYPE: &str = "run_job_request";

/// A workflow job submission.
///
/// Encodes as `{command: "run_job", data: {...}}` where `data` carries the
/// identifiers, the job parameters and an empty `graph`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JobRequest {
    pub api_url: String,
    pub user_id: String,
    pub workflow_id: String,
    pub auth_token: String,
    pub job_type: String,
    pub params: IndexMap<String, Value>,
}

impl JobRequest {
    pub fn new(
        api_url: impl Into<String>,
        user_id: impl Into<String>,
        workflow_id: impl Into<String>,
        auth_token: impl Into<String>,
        job_type: impl Into<String>,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            user_id: user_id.into(),
            workflow_id: workflow_id.into(),
            auth_token: auth_token.into(),
            job_type: job_type.into(),
            params: IndexMap::new(),
        }
    }

    /// Adds or replaces one job parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_params(mut self, params: IndexMap<String, Value>) -> Self {
        self.params = params;
        self
    }

    pub fn to_value(&self) -> Value {
        let graph = entries([
            (NODES, Value::Sequence(Vec::new())),
            (EDGES, Value::Sequence(Vec::new())),
        ]);
        let data = entries([
            ("type", REQUEST_TYPE.into()),
            ("api_url", self.api_url.as_str().into()),
            ("user_id", self.user_id.as_str().into()),
            ("workflow_id", self.workflow_id.as_str().into()),
            ("auth_token", self.auth_token.as_str().into()),
            ("job_type", self.job_type.as_str().into()),
            ("params", Value::from(self.params.clone())),
            (GRAPH, graph),
        ]);
        entries([("command", COMMAND.into()), ("data", data)])
    }

    pub fn encode(&self) -> Vec<u8> {
        let bytes = msgpack::encode(&self.to_value());
        debug!(
            job_type = %self.job_type,
            bytes = bytes.len(),
            "encoded job request"
        );
        bytes
    }
}

fn entries<const N: usize>(pairs: [(&str, Value); N]) -> Value {
    Value::Mapping(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
}
