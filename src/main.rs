use log::{error, info};
use workflow_canvas::{Editor, EditorConfig, ExecuteOptions, ExecutionBridge, ExecutionResult, HttpWorkflowService};

/// Environment variable naming an optional JSON configuration file.
const CONFIG_ENV: &str = "WORKFLOW_CANVAS_CONFIG";

#[tokio::main]
async fn main() {
    // Set up logging; the level is controlled with RUST_LOG
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(layout_path) = args.next() else {
        eprintln!("usage: workflow-canvas <layout.json> [workflow-id]");
        std::process::exit(2);
    };
    let workflow_id = args.next();

    let config = match std::env::var(CONFIG_ENV) {
        Ok(path) => match EditorConfig::from_json_file(&path) {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load config from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        Err(_) => EditorConfig::default(),
    };

    let mut editor = Editor::new(config.clone());
    if let Err(e) = editor.load_layout(&layout_path) {
        error!("Failed to load {}: {}", layout_path, e);
        std::process::exit(1);
    }
    let graph = editor.graph();
    info!("{} node(s), {} edge(s)", graph.nodes().len(), graph.edges().len());

    let Some(base_url) = config.bridge.base_url.as_deref() else {
        info!("No bridge.base_url configured; not executing");
        return;
    };

    let bridge = ExecutionBridge::new(HttpWorkflowService::new(base_url), config.bridge.clone());
    let outcome = bridge
        .execute_from_canvas(&editor.capture_run(), ExecuteOptions { workflow_id })
        .await;

    match &outcome.result {
        ExecutionResult::Completed(response) => {
            info!(
                "Run started (status: {})",
                response.status.as_deref().unwrap_or("unknown")
            );
        }
        ExecutionResult::Failed { error } => error!("Run failed: {}", error),
    }
    if !outcome.skipped_nodes.is_empty() {
        info!("Skipped nodes: {}", outcome.skipped_nodes.join(", "));
    }
    println!("{}", outcome.run_id);
}
