//! # Workflow Canvas
//!
//! The editing core of a visual workflow builder: a directed graph of typed nodes (LLM calls,
//! code blocks, conditions, inputs and outputs) connected by edges, plus the algorithms that
//! operate on it.
//!
//! ## Features
//! - Node/edge model with locked nodes and dangling-edge pruning
//! - Multi-selection alignment and even distribution
//! - Bounded, labelled undo/redo over value snapshots
//! - Copy/cut/paste with fresh ids and group remapping
//! - Grouping and locking
//! - Rate-limited alignment guides while dragging
//! - Portable JSON layout documents
//! - An execution bridge that builds and runs the canvas on a remote workflow service
//!
//! Rendering is left to the host: it reports selection, viewport, drags and measured node
//! sizes to an [`Editor`] and draws what the editor holds.
//!
//! # Example
//!
//! ```
//! use workflow_canvas::{AlignMode, Editor, NodeKind, Position};
//!
//! let mut editor = Editor::default();
//! let a = editor.create_node_at(NodeKind::Input, Position::new(0.0, 0.0));
//! let b = editor.create_node_at(NodeKind::Llm, Position::new(300.0, 40.0));
//! editor.connect(&a, &b, None, None);
//!
//! editor.set_selection([a, b.clone()]);
//! editor.align_selected(AlignMode::Top);
//! assert_eq!(editor.graph().node(&b).map(|n| n.position.y), Some(0.0));
//!
//! editor.undo();
//! assert_eq!(editor.graph().node(&b).map(|n| n.position.y), Some(40.0));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod alignment;
pub mod bridge;
pub mod clipboard;
pub mod config;
pub mod constants;
pub mod editor;
pub mod error;
pub mod graph;
pub mod grouping;
pub mod guides;
pub mod history;
pub mod ids;
pub mod layout;
pub mod selection;
mod types;

// Re-export public types and functions
pub use alignment::{AlignMode, DistributeMode};
pub use bridge::{CanvasRun, ExecuteOptions, ExecutionBridge, ExecutionOutcome, ExecutionResult, HttpWorkflowService, WorkflowService};
pub use config::{BridgeConfig, EditorConfig};
pub use editor::{Editor, NodeResized, Viewport};
pub use error::{ConfigError, LayoutError, ServiceError};
pub use graph::GraphModel;
pub use layout::LayoutDocument;
pub use types::*;
