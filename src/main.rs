mod app;
mod graph;
mod layout;
mod records;
mod session;
mod util;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::info;

use crate::layout::LayoutConfig;
use crate::records::{JsonFileSource, RecordSource};
use crate::session::snapshot::SessionSnapshot;
use crate::session::start_session;

/// Explore a weighted relationship graph exported from a graph database.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON export of `source, target, relation, weight` rows; `-` reads stdin.
    #[arg(long)]
    input: PathBuf,

    /// Seed for the spring layout.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Iteration budget for the spring layout.
    #[arg(long, default_value_t = 50)]
    iterations: usize,

    /// Filter text applied before the first frame.
    #[arg(long, default_value = "")]
    filter: String,

    /// Print the laid-out graph and selection state as JSON instead of opening a window.
    #[arg(long)]
    headless: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let source = JsonFileSource::new(&args.input);
    let layout = LayoutConfig {
        seed: args.seed,
        iterations: args.iterations,
        ..LayoutConfig::default()
    };

    let mut session = start_session(&source, &layout)
        .with_context(|| format!("failed to build the graph from {}", source.describe()))?;
    if !args.filter.is_empty() {
        session.search(&args.filter);
    }

    if args.headless {
        let snapshot = serde_json::to_string_pretty(&SessionSnapshot::capture(&session))
            .context("failed to serialize session snapshot")?;
        println!("{snapshot}");
        return Ok(());
    }

    info!(
        "opening explorer with {} nodes and {} edges",
        session.graph().node_count(),
        session.graph().edge_count()
    );

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1220.0, 780.0])
            .with_title("Interactive Graph Explorer"),
        ..Default::default()
    };

    let source_label = source.describe();
    eframe::run_native(
        "Interactive Graph Explorer",
        options,
        Box::new(move |cc| Ok(Box::new(app::ExplorerApp::new(cc, session, source_label)))),
    )
    .map_err(|error| anyhow!("failed to start the viewer: {error}"))
}
