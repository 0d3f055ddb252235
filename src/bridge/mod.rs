//! Turns the live canvas into calls against a remote workflow-execution service.
//!
//! The bridge works on a [`CanvasRun`], an owned capture of the graph taken before the first
//! await, so the editor stays free to change while a run is being built. Failures while
//! building the remote graph are logged and skipped; the caller always receives an
//! [`ExecutionOutcome`] with a usable run id.
//!
//! # Module Organization
//!
//! - `service` - The [`WorkflowService`] contract and its request/response types
//! - `http` - [`HttpWorkflowService`], the reqwest-backed implementation

mod http;
mod service;

pub use http::HttpWorkflowService;
pub use service::{
    ExecutionResponse, RemoteConnection, RemoteNode, RemoteNodeSpec, RemoteWorkflow, WorkflowService,
};

use crate::config::BridgeConfig;
use crate::error::ServiceError;
use crate::graph::GraphModel;
use crate::ids::new_local_run_id;
use crate::types::*;
use log::{debug, info, warn};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};

/// Node kinds the remote service knows how to run.
pub const SUPPORTED_KINDS: [NodeKind; 4] = [NodeKind::Input, NodeKind::Llm, NodeKind::Code, NodeKind::Output];

/// Config key holding an input node's value.
const INPUT_VALUE_KEY: &str = "value";

/// What the bridge needs from the canvas, captured by value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanvasRun {
    /// Nodes in graph order
    pub nodes: Vec<Node>,
    /// Edges in graph order
    pub edges: Vec<Edge>,
    /// Selected node ids at capture time
    pub selected: Vec<NodeId>,
}

impl CanvasRun {
    /// Copies the graph and the selection.
    pub fn capture(graph: &GraphModel, selected: &[NodeId]) -> Self {
        Self {
            nodes: graph.nodes().to_vec(),
            edges: graph.edges().to_vec(),
            selected: selected.to_vec(),
        }
    }

    /// The scalar input for a run.
    ///
    /// A selected input node's configured value wins, then the first input node with a value,
    /// then `fallback`.
    pub fn input_value(&self, fallback: &str) -> Value {
        let configured = |node: &&Node| node.kind == NodeKind::Input && input_of(node).is_some();
        let selected = self
            .nodes
            .iter()
            .filter(|n| self.selected.contains(&n.id))
            .find(configured);
        selected
            .or_else(|| self.nodes.iter().find(configured))
            .and_then(input_of)
            .unwrap_or_else(|| Value::String(fallback.to_string()))
    }
}

fn input_of(node: &Node) -> Option<Value> {
    match node.data.config.get(INPUT_VALUE_KEY)? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        value => Some(value.clone()),
    }
}

/// Options for [`ExecutionBridge::execute_from_canvas`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecuteOptions {
    /// Run this existing remote workflow instead of building one from the canvas
    pub workflow_id: Option<String>,
}

/// How a run ended from the bridge's point of view.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionResult {
    /// The service accepted the run
    Completed(ExecutionResponse),
    /// The run could not be started
    Failed {
        /// Why
        error: String,
    },
}

/// Result of [`ExecutionBridge::execute_from_canvas`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionOutcome {
    /// Remote run id, or a locally generated `local-run-` token when none is available
    pub run_id: String,
    /// Service response or failure
    pub result: ExecutionResult,
    /// Workflow that was (or would have been) executed
    pub workflow_id: Option<String>,
    /// Local nodes that did not make it into the remote workflow
    pub skipped_nodes: Vec<NodeId>,
    /// Local edges dropped because an endpoint has no remote counterpart
    pub dropped_edges: Vec<EdgeId>,
}

impl ExecutionOutcome {
    fn failed(error: ServiceError, workflow_id: Option<String>) -> Self {
        Self {
            run_id: new_local_run_id(),
            result: ExecutionResult::Failed {
                error: error.to_string(),
            },
            workflow_id,
            skipped_nodes: Vec::new(),
            dropped_edges: Vec::new(),
        }
    }

    /// Returns true if the service accepted the run.
    pub fn is_completed(&self) -> bool {
        matches!(self.result, ExecutionResult::Completed(_))
    }
}

/// Executes canvases through a [`WorkflowService`].
pub struct ExecutionBridge<S> {
    service: S,
    config: BridgeConfig,
}

impl<S: WorkflowService> ExecutionBridge<S> {
    /// Creates a bridge over `service`.
    pub fn new(service: S, config: BridgeConfig) -> Self {
        Self { service, config }
    }

    /// The underlying service.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Runs the canvas remotely.
    ///
    /// With a workflow id the existing workflow is executed with the canvas input. Without
    /// one a temporary workflow is built from the supported nodes and the edges between them,
    /// then executed. Calls are made one at a time.
    ///
    /// Never fails: service errors end up in the returned outcome.
    pub async fn execute_from_canvas(&self, run: &CanvasRun, options: ExecuteOptions) -> ExecutionOutcome {
        let inputs = json!({ "input": run.input_value(&self.config.fallback_input) });

        if let Some(workflow_id) = options.workflow_id {
            return self.execute(workflow_id, &inputs, Vec::new(), Vec::new()).await;
        }

        let workflow_id = match self
            .service
            .create_workflow(&self.config.workflow_name, &self.config.workflow_description)
            .await
        {
            Ok(id) => id,
            Err(e) => {
                warn!("Failed to create temporary workflow: {}", e);
                return ExecutionOutcome::failed(e, None);
            }
        };
        info!("Created temporary workflow {}", workflow_id);

        let (remote_ids, skipped_nodes) = self.create_nodes(&workflow_id, &run.nodes).await;

        let mut connections = Vec::new();
        let mut dropped_edges = Vec::new();
        for edge in &run.edges {
            match (remote_ids.get(&edge.source), remote_ids.get(&edge.target)) {
                (Some(source), Some(target)) => connections.push(RemoteConnection {
                    source: source.clone(),
                    target: target.clone(),
                    source_handle: edge.source_handle.clone(),
                    target_handle: edge.target_handle.clone(),
                }),
                _ => {
                    warn!("Dropping edge {}: endpoint has no remote node", edge.id);
                    dropped_edges.push(edge.id.clone());
                }
            }
        }

        if !connections.is_empty() {
            if let Err(e) = self.service.connect_nodes(&workflow_id, &connections).await {
                warn!("Failed to connect nodes in {}: {}", workflow_id, e);
            }
        }

        self.execute(workflow_id, &inputs, skipped_nodes, dropped_edges).await
    }

    /// Reads the state of a run.
    pub async fn execution_status(&self, run_id: &str) -> Result<ExecutionResponse, ServiceError> {
        self.service.get_execution_status(run_id).await
    }

    /// Adds every supported node and resolves its remote id.
    ///
    /// # Returns
    ///
    /// The local to remote id table and the ids of nodes left out.
    async fn create_nodes(&self, workflow_id: &str, nodes: &[Node]) -> (HashMap<NodeId, String>, Vec<NodeId>) {
        let mut remote_ids: HashMap<NodeId, String> = HashMap::new();
        let mut unresolved: Vec<&Node> = Vec::new();
        let mut skipped = Vec::new();

        for node in nodes {
            if !SUPPORTED_KINDS.contains(&node.kind) {
                debug!("Skipping node {}: {} is not executable remotely", node.id, node.kind);
                skipped.push(node.id.clone());
                continue;
            }
            let spec = RemoteNodeSpec::from_node(node);
            match self.service.add_node(workflow_id, &spec).await {
                Ok(Some(remote_id)) => {
                    remote_ids.insert(node.id.clone(), remote_id);
                }
                Ok(None) => unresolved.push(node),
                Err(e) => {
                    warn!("Failed to add node {} to {}: {}", node.id, workflow_id, e);
                    skipped.push(node.id.clone());
                }
            }
        }

        if unresolved.is_empty() {
            return (remote_ids, skipped);
        }

        match self.service.get_workflow(workflow_id).await {
            Ok(workflow) => {
                let mut claimed: HashSet<String> = remote_ids.values().cloned().collect();
                for node in unresolved {
                    let found = workflow.nodes.iter().find(|remote| {
                        !claimed.contains(&remote.id)
                            && remote.kind == node.kind.as_str()
                            && remote.label() == Some(node.data.label.as_str())
                    });
                    match found {
                        Some(remote) => {
                            claimed.insert(remote.id.clone());
                            remote_ids.insert(node.id.clone(), remote.id.clone());
                        }
                        None => {
                            warn!("No remote node matches {} ({})", node.data.label, node.kind);
                            skipped.push(node.id.clone());
                        }
                    }
                }
            }
            Err(e) => {
                warn!("Failed to fetch workflow {} to resolve node ids: {}", workflow_id, e);
                skipped.extend(unresolved.into_iter().map(|n| n.id.clone()));
            }
        }
        (remote_ids, skipped)
    }

    async fn execute(
        &self,
        workflow_id: String,
        inputs: &Value,
        skipped_nodes: Vec<NodeId>,
        dropped_edges: Vec<EdgeId>,
    ) -> ExecutionOutcome {
        match self.service.execute_workflow(&workflow_id, inputs).await {
            Ok(response) => {
                let run_id = response.run_id().unwrap_or_else(new_local_run_id);
                info!("Workflow {} started as run {}", workflow_id, run_id);
                ExecutionOutcome {
                    run_id,
                    result: ExecutionResult::Completed(response),
                    workflow_id: Some(workflow_id),
                    skipped_nodes,
                    dropped_edges,
                }
            }
            Err(e) => {
                warn!("Failed to execute workflow {}: {}", workflow_id, e);
                ExecutionOutcome {
                    skipped_nodes,
                    dropped_edges,
                    ..ExecutionOutcome::failed(e, Some(workflow_id))
                }
            }
        }
    }
}
