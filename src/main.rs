use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "travelmarks")]
#[command(about = "Mark countries as visited or wishlist on a world map")]
struct Cli {
    /// Directory for persisted profiles and markings
    /// (default: the platform data directory)
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// World topology file (GeoJSON feature collection keyed by country id)
    #[arg(long, value_name = "FILE", default_value = "assets/world-mini.geo.json")]
    topology: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    launch(args)
}

#[cfg(feature = "gui")]
fn launch(args: Cli) -> anyhow::Result<()> {
    let config = travelmarks::gui::GuiConfig {
        data_dir: args
            .data_dir
            .unwrap_or_else(travelmarks::JsonFileStore::default_data_dir),
        topology_path: args.topology,
    };
    travelmarks::gui::run(config).map_err(|e| anyhow::anyhow!("Failed to run GUI: {e}"))
}

#[cfg(not(feature = "gui"))]
fn launch(_args: Cli) -> anyhow::Result<()> {
    anyhow::bail!("this build has no GUI; rebuild with --features gui")
}
