pub mod aggregators;
pub mod config;
pub mod digest;
pub mod fetcher;
pub mod normalize;
pub mod parser;
pub mod pipeline;
pub mod rss_utils;
pub mod sink;
pub mod sources;
pub mod types;
pub mod window;

pub use config::RadarConfig;
pub use fetcher::Fetcher;
pub use parser::FeedParser;
pub use pipeline::{CollectionStats, PipelineOutput, RadarPipeline};
pub use sink::JsonFileSink;
pub use sources::RssFeedSource;
pub use types::*;

use anyhow::Context;
use chrono::{DateTime, FixedOffset};

/// Build HTTP sources for every configured feed.
pub fn feed_sources(config: &RadarConfig) -> Result<Vec<Box<dyn FeedSource>>> {
    Ok(RssFeedSource::from_urls(&config.feeds, config.fetch.clone())?
        .into_iter()
        .map(|s| Box::new(s) as Box<dyn FeedSource>)
        .collect())
}

/// One complete run: fetch the configured feeds, build the digest for `now`
/// and hand it to `sink`. Only a sink failure makes the run fail.
pub async fn run_once(
    config: &RadarConfig,
    sink: &dyn DigestSink,
    now: DateTime<FixedOffset>,
) -> anyhow::Result<Digest> {
    let sources = feed_sources(config)?;
    let pipeline = RadarPipeline::new(config.clone(), sources);
    let output = pipeline.run(now).await;

    sink.write(&output.digest)
        .with_context(|| format!("writing digest to {}", sink.destination()))?;

    Ok(output.digest)
}
