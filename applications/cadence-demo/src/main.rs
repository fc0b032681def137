/// Cadence Demo - plays a playlist through the widget in the terminal
use cadence_demo::{load_playlist, run_session, DemoConfig};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence-demo")]
#[command(about = "Play a playlist through the Cadence widget against simulated audio", long_about = None)]
struct Cli {
    /// Playlist JSON file
    playlist: PathBuf,

    /// Configuration file path (default: ./cadence.toml if present)
    #[arg(short, long, env = "CADENCE_CONFIG")]
    config: Option<PathBuf>,

    /// Start in shuffle mode
    #[arg(long)]
    shuffle: bool,

    /// Fixed shuffle seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many tracks played through
    #[arg(long)]
    max_tracks: Option<usize>,

    /// Print the session report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadence_demo=info,cadence_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = DemoConfig::load(cli.config.as_deref())?;
    if cli.shuffle {
        config.widget.shuffle = true;
    }
    if cli.max_tracks.is_some() {
        config.simulation.max_tracks = cli.max_tracks;
    }

    let tracks = load_playlist(&cli.playlist)?;
    tracing::info!("Loaded {} tracks from {:?}", tracks.len(), cli.playlist);

    let report = run_session(&config, tracks, cli.seed, std::io::stdout().lock())?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "played {} track(s), {} via preload swap, {} error(s)",
            report.finished,
            report.swaps,
            report.errors.len()
        );
    }

    Ok(())
}
