use crate::aggregators::TopicGrouper;
use crate::config::RadarConfig;
use crate::digest::{build_digest, rank_topics};
use crate::normalize::normalize_entries;
use crate::types::{Digest, FeedOutcome, FeedSource, RawEntry};
use crate::window::TimeWindow;
use chrono::{DateTime, FixedOffset};
use futures::stream::{self, StreamExt};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Extra time a feed gets beyond the HTTP timeout before it is abandoned.
const FEED_GRACE_SECS: u64 = 5;

/// Counters for one run, logged when the digest is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionStats {
    pub feeds_ok: usize,
    pub feeds_failed: usize,
    pub entries_seen: usize,
    pub dropped_incomplete: usize,
    pub dropped_outside_window: usize,
    pub topics_formed: usize,
    pub topics_emitted: usize,
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub digest: Digest,
    pub stats: CollectionStats,
}

/// Fetch → normalize → window → group → rank → digest, once.
pub struct RadarPipeline {
    config: RadarConfig,
    sources: Vec<Box<dyn FeedSource>>,
}

impl RadarPipeline {
    pub fn new(config: RadarConfig, sources: Vec<Box<dyn FeedSource>>) -> Self {
        Self { config, sources }
    }

    /// Fetch every source, a few at a time. Each feed is isolated: failures
    /// and stalls become `FeedOutcome::Failed`. Outcomes are returned in
    /// source order once every attempt has finished or been abandoned.
    pub async fn fetch_all(&self) -> Vec<FeedOutcome> {
        let limit = Duration::from_secs(self.config.fetch.timeout_seconds + FEED_GRACE_SECS);
        let concurrency = self.config.fetch.max_concurrent_feeds.max(1);

        stream::iter(self.sources.iter())
            .map(|source| async move {
                match tokio::time::timeout(limit, source.fetch()).await {
                    Ok(outcome) => outcome,
                    Err(_) => FeedOutcome::Failed {
                        url: source.url().to_string(),
                        reason: format!("abandoned after {}s", limit.as_secs()),
                    },
                }
            })
            .buffered(concurrency)
            .collect()
            .await
    }

    /// Merge feed outcomes into one entry list, counting failures.
    pub fn merge(outcomes: Vec<FeedOutcome>, stats: &mut CollectionStats) -> Vec<RawEntry> {
        let mut all_entries = Vec::new();
        for outcome in outcomes {
            match outcome {
                FeedOutcome::Fetched { url, entries } => {
                    debug!("Fetched {} entries from {}", entries.len(), url);
                    stats.feeds_ok += 1;
                    all_entries.extend(entries);
                }
                FeedOutcome::Failed { url, reason } => {
                    warn!("Skipping feed {}: {}", url, reason);
                    stats.feeds_failed += 1;
                }
            }
        }
        stats.entries_seen = all_entries.len();
        all_entries
    }

    /// The synchronous core: everything after fetching.
    pub fn build_digest(
        &self,
        raw: Vec<RawEntry>,
        now: DateTime<FixedOffset>,
        stats: &mut CollectionStats,
    ) -> Digest {
        let (mut records, dropped) = normalize_entries(raw, &now);
        stats.dropped_incomplete = dropped;

        let window = TimeWindow::for_run(now, &self.config.window);
        stats.dropped_outside_window = window.retain(&mut records);

        let mut grouper = TopicGrouper::new();
        for record in records {
            grouper.add(record);
        }
        stats.topics_formed = grouper.len();

        let ranked = rank_topics(
            grouper.finish(),
            self.config.max_topics,
            self.config.max_alternates,
        );
        stats.topics_emitted = ranked.len();

        build_digest(now, window.hours, &ranked)
    }

    pub async fn run(&self, now: DateTime<FixedOffset>) -> PipelineOutput {
        info!("Collecting from {} feeds", self.sources.len());

        let mut stats = CollectionStats::default();
        let outcomes = self.fetch_all().await;
        let raw = Self::merge(outcomes, &mut stats);
        let digest = self.build_digest(raw, now, &mut stats);

        info!(
            "Run finished: {} feeds ok, {} failed, {} entries, {} incomplete, {} outside {}h window, {} topics, {} emitted",
            stats.feeds_ok,
            stats.feeds_failed,
            stats.entries_seen,
            stats.dropped_incomplete,
            stats.dropped_outside_window,
            digest.window_hours,
            stats.topics_formed,
            stats.topics_emitted
        );

        PipelineOutput { digest, stats }
    }
}
