mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use commands::Script;
use mapmark_export::{write_export, ExportSnapshot, DEFAULT_EXPORT_FILE};
use mapmark_session::{EditorConfig, EditorSession, JsonFileStore};

/// Map marker position editor
#[derive(Parser, Debug)]
#[command(name = "mapmark")]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON array of properties ({id, name, x, y})
    #[arg(value_name = "PROPERTIES")]
    properties: PathBuf,

    /// Editor command script to replay
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,

    /// Map settings JSON (read on open, written on save)
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Editor config file (defaults to the user config directory)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Grid spacing in percent
    #[arg(long)]
    grid_size: Option<f64>,

    /// Snap positions to the grid
    #[arg(long)]
    snap: bool,

    /// Maximum undo steps kept (0 = unbounded)
    #[arg(long)]
    history_limit: Option<usize>,

    /// Write positions back to the properties file
    #[arg(long)]
    save: bool,

    /// Export settings and positions to a JSON file
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = DEFAULT_EXPORT_FILE)]
    export: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = match &args.config {
        Some(path) => EditorConfig::load_from(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => EditorConfig::load(),
    };
    if let Some(size) = args.grid_size {
        config.grid_size = size;
    }
    if args.snap {
        config.snap_to_grid = true;
    }
    if let Some(limit) = args.history_limit {
        config.history_limit = limit;
    }

    let mut store = JsonFileStore::new(&args.properties);
    if let Some(ref path) = args.settings {
        store = store.with_settings_path(path);
    }
    let properties = store.load_properties().context("Failed to load properties")?;
    let settings = store.load_map_settings().context("Failed to load map settings")?;
    let mut session =
        EditorSession::open(properties, settings, &config).context("Failed to open editor")?;

    if let Some(ref path) = args.script {
        let script = Script::load(path)?;
        let report = commands::replay(&mut session, &script);
        println!(
            "Replayed {} commands ({} applied, {} ignored)",
            script.commands.len(),
            report.applied,
            report.ignored
        );
    }

    print_positions(&session);

    if args.save {
        if session.is_dirty() {
            let summary = session.save(&mut store).context("Failed to save positions")?;
            println!(
                "Saved {} marker positions to {}",
                summary.markers,
                store.properties_path().display()
            );
        } else {
            println!("No changes to save");
        }
    }

    if let Some(ref path) = args.export {
        write_export(path, &ExportSnapshot::capture(&session))
            .with_context(|| format!("Failed to export: {}", path.display()))?;
        println!("Exported to {}", path.display());
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_positions(session: &EditorSession) {
    for marker in session.registry().iter() {
        let selected = if session.selected() == Some(marker.id) { '*' } else { ' ' };
        println!(
            "{selected} {:>6}  {:>6.1}%  {:>6.1}%  {}",
            marker.id.0, marker.x, marker.y, marker.name
        );
    }
    println!(
        "Grid: {}% (snap {}, {})",
        session.grid_size(),
        if session.snap_enabled() { "on" } else { "off" },
        if session.show_grid() { "shown" } else { "hidden" }
    );
    let history = session.history();
    let limit = match history.limit() {
        0 => "unbounded".to_string(),
        n => format!("limit {n}"),
    };
    println!(
        "History: {} entries ({limit}), {} undo / {} redo",
        history.len(),
        history.undo_count(),
        history.redo_count()
    );
}
