use anyhow::Context;
use clap::Parser;
use headline_radar::{feed_sources, JsonFileSink, RadarConfig, RadarPipeline};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Collect recent city headlines into a deduplicated JSON digest.
#[derive(Debug, Parser)]
#[command(name = "headline-radar", version, about)]
struct Args {
    /// JSON configuration file (defaults apply to anything it omits)
    #[arg(short, long, env = "RADAR_CONFIG")]
    config: Option<PathBuf>,

    /// Write the digest here instead of the configured output path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the digest to stdout instead of writing it
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = RadarConfig::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(output) = args.output {
        config.output_path = output;
    }

    let now = config.local_now()?;
    info!("Starting headline radar run at {}", now.to_rfc3339());

    if args.dry_run {
        let pipeline = RadarPipeline::new(config.clone(), feed_sources(&config)?);
        let output = pipeline.run(now).await;
        println!("{}", serde_json::to_string_pretty(&output.digest)?);
        return Ok(());
    }

    let sink = JsonFileSink::new(config.output_path.clone());
    let digest = headline_radar::run_once(&config, &sink, now).await?;

    println!("Generated {} with {} items.", sink.path().display(), digest.count);
    Ok(())
}
