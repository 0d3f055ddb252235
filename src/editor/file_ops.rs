//! Layout export/import for the editing session, on strings and on files.
//!
//! Import is all-or-nothing: a document that fails validation leaves the graph, the selection
//! and the history untouched.

use super::Editor;
use crate::error::LayoutError;
use crate::graph::GraphModel;
use crate::layout::LayoutDocument;
use log::info;
use std::path::Path;

impl Editor {
    /// Captures the structural layout of the current graph.
    pub fn export_layout(&self) -> LayoutDocument {
        LayoutDocument::from_graph(&self.graph)
    }

    /// Serializes the current layout as pretty-printed JSON.
    pub fn export_json(&self) -> Result<String, LayoutError> {
        self.export_layout()
            .to_json()
            .map_err(LayoutError::InvalidDocument)
    }

    /// Replaces the whole graph with the contents of a layout document.
    ///
    /// The document is validated into a separate graph first; only once it is accepted is any
    /// drag in progress cancelled and the live graph swapped. On success a single "import"
    /// history entry is recorded, so the import can be undone, and the selection is cleared.
    ///
    /// # Errors
    ///
    /// [`LayoutError::DuplicateIds`] if two nodes or two edges share an id.
    pub fn import_layout(&mut self, doc: LayoutDocument) -> Result<(), LayoutError> {
        let (nodes, edges) = doc.into_parts(&self.graph);
        let (node_count, edge_count) = (nodes.len(), edges.len());
        let mut imported = GraphModel::new();
        if !imported.replace_all(nodes, edges) {
            return Err(LayoutError::DuplicateIds);
        }

        self.cancel_drag();
        let before = std::mem::replace(&mut self.graph, imported).snapshot();
        self.history.commit_snapshot("import", before);
        self.selection.clear();
        info!(
            "Imported layout: {} node(s), {} of {} edge(s) kept",
            node_count,
            self.graph.edges().len(),
            edge_count
        );
        Ok(())
    }

    /// Parses and imports a layout document from JSON text.
    pub fn import_json(&mut self, json: &str) -> Result<(), LayoutError> {
        let doc = LayoutDocument::from_json(json)?;
        self.import_layout(doc)
    }

    /// Writes the current layout to a JSON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Destination file, created or truncated
    pub fn save_layout(&self, path: impl AsRef<Path>) -> Result<(), LayoutError> {
        let path = path.as_ref();
        let json = self.export_json()?;
        std::fs::write(path, json)?;
        info!("Layout saved to {}", path.display());
        Ok(())
    }

    /// Reads a JSON layout file and imports it.
    pub fn load_layout(&mut self, path: impl AsRef<Path>) -> Result<(), LayoutError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        self.import_json(&json)?;
        info!("Layout loaded from {}", path.display());
        Ok(())
    }
}
