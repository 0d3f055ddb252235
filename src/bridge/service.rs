//! The remote workflow service contract consumed by the execution bridge.

use crate::error::ServiceError;
use crate::types::{Node, Position};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A remote workflow-execution service.
///
/// Every call is a single request; the bridge awaits them one after another.
pub trait WorkflowService: Send + Sync {
    /// Creates an empty workflow and returns its id.
    fn create_workflow(&self, name: &str, description: &str) -> BoxFuture<'_, Result<String, ServiceError>>;

    /// Adds a node to a workflow.
    ///
    /// Returns the remote id when the service reports one. `Ok(None)` means the node was
    /// created but its id has to be looked up with [`get_workflow`](Self::get_workflow).
    fn add_node(&self, workflow_id: &str, node: &RemoteNodeSpec) -> BoxFuture<'_, Result<Option<String>, ServiceError>>;

    /// Fetches a workflow with its nodes.
    fn get_workflow(&self, workflow_id: &str) -> BoxFuture<'_, Result<RemoteWorkflow, ServiceError>>;

    /// Adds connections between existing remote nodes.
    fn connect_nodes(&self, workflow_id: &str, connections: &[RemoteConnection]) -> BoxFuture<'_, Result<(), ServiceError>>;

    /// Starts a run of the workflow.
    fn execute_workflow(&self, workflow_id: &str, inputs: &Value) -> BoxFuture<'_, Result<ExecutionResponse, ServiceError>>;

    /// Reads the state of a run. The bridge never polls; this is for its callers.
    fn get_execution_status(&self, run_id: &str) -> BoxFuture<'_, Result<ExecutionResponse, ServiceError>>;
}

/// Body of an "add node" request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteNodeSpec {
    /// Remote node type, the lowercase kind name
    #[serde(rename = "type")]
    pub kind: String,
    /// Canvas position
    pub position: Position,
    /// Node configuration, including its `label`
    pub config: Map<String, Value>,
}

impl RemoteNodeSpec {
    /// Describes a local node for the remote service.
    pub fn from_node(node: &Node) -> Self {
        let mut config = node.data.config.clone();
        config.insert("label".to_string(), Value::String(node.data.label.clone()));
        Self {
            kind: node.kind.as_str().to_string(),
            position: node.position,
            config,
        }
    }
}

/// A workflow as returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RemoteWorkflow {
    /// Workflow id
    pub id: String,
    /// Nodes the workflow holds
    #[serde(default)]
    pub nodes: Vec<RemoteNode>,
}

/// A node as returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RemoteNode {
    /// Remote node id
    pub id: String,
    /// Remote node type
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Top-level label, when the service reports one there
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Free-form node payload
    #[serde(default)]
    pub data: Value,
}

impl RemoteNode {
    /// The node label, wherever the service put it.
    pub fn label(&self) -> Option<&str> {
        self.label
            .as_deref()
            .or_else(|| self.data.get("label").and_then(Value::as_str))
            .or_else(|| {
                self.data
                    .get("config")
                    .and_then(|c| c.get("label"))
                    .and_then(Value::as_str)
            })
    }
}

/// A connection between two remote nodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteConnection {
    /// Remote source node id
    pub source: String,
    /// Remote target node id
    pub target: String,
    /// Named output on the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    /// Named input on the target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

/// Response of "execute workflow" and "get execution status".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ExecutionResponse {
    /// Run id, preferred spelling; may be a string or a number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_id: Option<Value>,
    /// Run id, alternative spelling; may be a string or a number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<Value>,
    /// Generic id; may be a string or a number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Run status as reported by the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Per-node results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Value>,
    /// Per-node errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Value>,
}

impl ExecutionResponse {
    /// The run id, read from `execution_id`, `run_id` or `id` in that order.
    pub fn run_id(&self) -> Option<String> {
        [&self.execution_id, &self.run_id, &self.id]
            .into_iter()
            .find_map(|id| id.as_ref().and_then(id_string))
    }
}

/// Reads an identifier that a service may send as a string or a number.
pub(crate) fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeKind;
    use serde_json::json;

    #[test]
    fn test_run_id_preference_order() {
        let response: ExecutionResponse =
            serde_json::from_value(json!({"execution_id": "e1", "run_id": "r1", "id": "i1"})).unwrap();
        assert_eq!(response.run_id().as_deref(), Some("e1"));

        let response: ExecutionResponse =
            serde_json::from_value(json!({"run_id": "r1", "id": "i1"})).unwrap();
        assert_eq!(response.run_id().as_deref(), Some("r1"));

        let response: ExecutionResponse = serde_json::from_value(json!({"id": 42})).unwrap();
        assert_eq!(response.run_id().as_deref(), Some("42"));

        // an empty preferred id falls through to the next spelling
        let response: ExecutionResponse =
            serde_json::from_value(json!({"execution_id": "", "run_id": "r2"})).unwrap();
        assert_eq!(response.run_id().as_deref(), Some("r2"));

        let response: ExecutionResponse = serde_json::from_value(json!({"status": "queued"})).unwrap();
        assert_eq!(response.run_id(), None);
    }

    #[test]
    fn test_numeric_run_ids_decode() {
        let response: ExecutionResponse =
            serde_json::from_value(json!({"execution_id": 42, "status": "queued"})).unwrap();
        assert_eq!(response.run_id().as_deref(), Some("42"));

        let response: ExecutionResponse = serde_json::from_value(json!({"run_id": 7})).unwrap();
        assert_eq!(response.run_id().as_deref(), Some("7"));

        let response: ExecutionResponse = serde_json::from_value(json!({"execution_id": true, "id": "i9"})).unwrap();
        assert_eq!(response.run_id().as_deref(), Some("i9"));
    }

    #[test]
    fn test_node_spec_carries_label_in_config() {
        let mut node = Node::with_id("n", NodeKind::Llm, "Summarise", Position::new(10.0, 20.0));
        node.data.config.insert("model".into(), json!("small"));

        let value = serde_json::to_value(RemoteNodeSpec::from_node(&node)).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "llm",
                "position": {"x": 10.0, "y": 20.0},
                "config": {"model": "small", "label": "Summarise"}
            })
        );
    }

    #[test]
    fn test_remote_label_lookup() {
        let top: RemoteNode = serde_json::from_value(json!({"id": "1", "type": "llm", "label": "A"})).unwrap();
        let nested: RemoteNode =
            serde_json::from_value(json!({"id": "2", "type": "llm", "data": {"config": {"label": "B"}}})).unwrap();
        let none: RemoteNode = serde_json::from_value(json!({"id": "3"})).unwrap();

        assert_eq!(top.label(), Some("A"));
        assert_eq!(nested.label(), Some("B"));
        assert_eq!(none.label(), None);
    }

    #[test]
    fn test_connection_uses_camel_case() {
        let connection = RemoteConnection {
            source: "r1".into(),
            target: "r2".into(),
            source_handle: Some("out".into()),
            target_handle: None,
        };
        assert_eq!(
            serde_json::to_value(connection).unwrap(),
            json!({"source": "r1", "target": "r2", "sourceHandle": "out"})
        );
    }
}
