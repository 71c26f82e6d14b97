use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::defs::{Digest, DigestSink, FeedOutcome, FeedSource, RawEntry};

/// A feed that always yields the same entries.
pub struct StaticSource {
    url: String,
    entries: Vec<RawEntry>,
}

impl StaticSource {
    pub fn new(url: impl Into<String>, entries: Vec<RawEntry>) -> Self {
        Self {
            url: url.into(),
            entries,
        }
    }
}

#[async_trait]
impl FeedSource for StaticSource {
    fn url(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> FeedOutcome {
        FeedOutcome::Fetched {
            url: self.url.clone(),
            entries: self.entries.clone(),
        }
    }
}

/// A feed that is never reachable.
pub struct FailingSource {
    url: String,
    reason: String,
}

impl FailingSource {
    pub fn new(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl FeedSource for FailingSource {
    fn url(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> FeedOutcome {
        FeedOutcome::Failed {
            url: self.url.clone(),
            reason: self.reason.clone(),
        }
    }
}

/// Keeps every digest it is handed.
#[derive(Default)]
pub struct MemorySink {
    written: Mutex<Vec<Digest>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<Digest> {
        self.written.lock().ok()?.last().cloned()
    }

    pub fn writes(&self) -> usize {
        self.written.lock().map(|w| w.len()).unwrap_or(0)
    }
}

impl DigestSink for MemorySink {
    fn destination(&self) -> String {
        "memory".to_string()
    }

    fn write(&self, digest: &Digest) -> Result<()> {
        self.written
            .lock()
            .map_err(|_| anyhow!("memory sink lock poisoned"))?
            .push(digest.clone());
        Ok(())
    }
}
