//! JSON-over-HTTP implementation of [`WorkflowService`].

use super::service::{id_string, ExecutionResponse, RemoteConnection, RemoteNodeSpec, RemoteWorkflow, WorkflowService};
use crate::error::ServiceError;
use futures::future::BoxFuture;
use log::debug;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

/// Workflow service reached over HTTP.
pub struct HttpWorkflowService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpWorkflowService {
    /// Creates a client for the service rooted at `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, ServiceError> {
        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let body = resp.text().await?;
        // some endpoints answer 204 with no body
        let body = if body.trim().is_empty() { "null" } else { body.as_str() };
        Ok(serde_json::from_str(body)?)
    }
}

/// Reads `id` or `node.id` from a creation response.
fn created_id(value: &Value) -> Option<String> {
    value
        .get("id")
        .or_else(|| value.pointer("/node/id"))
        .and_then(id_string)
}

impl WorkflowService for HttpWorkflowService {
    fn create_workflow(&self, name: &str, description: &str) -> BoxFuture<'_, Result<String, ServiceError>> {
        let body = json!({ "name": name, "description": description });
        Box::pin(async move {
            let request = self.client.post(self.url("/workflows")).json(&body);
            let value: Value = self.send(request).await?;
            created_id(&value).ok_or(ServiceError::MissingField("id"))
        })
    }

    fn add_node(&self, workflow_id: &str, node: &RemoteNodeSpec) -> BoxFuture<'_, Result<Option<String>, ServiceError>> {
        let url = self.url(&format!("/workflows/{}/nodes", workflow_id));
        let node = node.clone();
        Box::pin(async move {
            let value: Value = self.send(self.client.post(url).json(&node)).await?;
            let id = created_id(&value);
            if id.is_none() {
                debug!("add node response carried no id: {}", value);
            }
            Ok(id)
        })
    }

    fn get_workflow(&self, workflow_id: &str) -> BoxFuture<'_, Result<RemoteWorkflow, ServiceError>> {
        let url = self.url(&format!("/workflows/{}", workflow_id));
        Box::pin(async move { self.send(self.client.get(url)).await })
    }

    fn connect_nodes(&self, workflow_id: &str, connections: &[RemoteConnection]) -> BoxFuture<'_, Result<(), ServiceError>> {
        let url = self.url(&format!("/workflows/{}/connections", workflow_id));
        let body = json!({ "connections": connections });
        Box::pin(async move {
            let _: Value = self.send(self.client.post(url).json(&body)).await?;
            Ok(())
        })
    }

    fn execute_workflow(&self, workflow_id: &str, inputs: &Value) -> BoxFuture<'_, Result<ExecutionResponse, ServiceError>> {
        let url = self.url(&format!("/workflows/{}/execute", workflow_id));
        let body = json!({ "inputs": inputs });
        Box::pin(async move { self.send(self.client.post(url).json(&body)).await })
    }

    fn get_execution_status(&self, run_id: &str) -> BoxFuture<'_, Result<ExecutionResponse, ServiceError>> {
        let url = self.url(&format!("/executions/{}", run_id));
        Box::pin(async move { self.send(self.client.get(url)).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let service = HttpWorkflowService::new("http://localhost:8080/api/");
        assert_eq!(service.url("/workflows"), "http://localhost:8080/api/workflows");
    }

    #[test]
    fn test_created_id_shapes() {
        assert_eq!(created_id(&json!({"id": "wf-1"})).as_deref(), Some("wf-1"));
        assert_eq!(created_id(&json!({"node": {"id": 7}})).as_deref(), Some("7"));
        assert_eq!(created_id(&json!({"ok": true})), None);
        assert_eq!(created_id(&Value::Null), None);
    }
}
