mod app;
mod model;

use anyhow::Context;
use app::App;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use text_buffer::BufferConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Line-oriented text editor. Reads one command per line from stdin; type `h`
/// for the list of commands.
#[derive(Parser, Debug)]
#[command(name = "ropedit", version)]
struct Cli {
    /// File to edit; created on the first write if it does not exist
    file: Option<PathBuf>,

    /// Lines shown by the `v` command
    #[arg(long, default_value_t = 20)]
    viewport_height: usize,

    /// Wrap viewport lines at this many characters
    #[arg(long, env = "ROPEDIT_WRAP_WIDTH")]
    wrap_width: Option<usize>,

    /// Undo steps to keep, 0 for unlimited (overrides ROPEDIT_HISTORY_LIMIT)
    #[arg(long)]
    history_limit: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ropedit=info,text_buffer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = BufferConfig::from_env();
    if let Some(limit) = cli.history_limit {
        config.history_limit = (limit > 0).then_some(limit);
    }
    tracing::debug!(?config, "buffer configuration");

    let mut app = match &cli.file {
        Some(path) => App::open(path, config, cli.viewport_height, cli.wrap_width)
            .with_context(|| format!("failed to open {}", path.display()))?,
        None => App::new(config, cli.viewport_height, cli.wrap_width),
    };
    tracing::info!(lines = app.buffer().total_lines(), "ready");

    app.run(io::stdin().lock(), &mut io::stdout().lock())
        .context("editor session failed")?;

    if app.is_dirty() {
        tracing::warn!("exiting with unsaved changes");
    }
    Ok(())
}
