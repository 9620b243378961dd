use std::{env, fs};

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use treeselect_core::{GestureHub, SelectionConfig, TreeView};
use treeselect_demo::script::{default_script, run_script, TREE_REGION};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match env::args().nth(1) {
        Some(path) => {
            let json = fs::read_to_string(&path).with_context(|| format!("reading config {path}"))?;
            SelectionConfig::from_json_str(&json)?
        }
        None => SelectionConfig::default(),
    };
    tracing::info!(?config, "starting farm tree session");

    let tree = treeselect_demo::load_farm()?;
    let hub = GestureHub::new();
    let mut view = TreeView::from_config(tree, &config);
    let _watch = view.attach_outside_watcher(&hub, TREE_REGION);

    for report in run_script(&mut view, &hub, &default_script()) {
        println!("> {}", report.action);
        if let Err(reason) = &report.outcome {
            println!("  refused: {reason}");
        }
        if report.multi_drag_indicator {
            println!("  multiple nodes are being dragged...");
        }
        println!("  selected: {:?}", report.selection);
        for line in &report.rows {
            println!("  {line}");
        }
    }
    Ok(())
}
