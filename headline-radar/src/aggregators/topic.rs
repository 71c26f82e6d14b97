use crate::normalize::normalize_title;
use crate::types::NormalizedRecord;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tracing::debug;

/// Number of leading title words that identify a topic.
pub const FINGERPRINT_TOKENS: usize = 10;

/// Stable hash of a title's normalized prefix. Two titles share a topic only
/// when their first ten words match after lowercasing and whitespace
/// collapsing; anything after the tenth word is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TopicFingerprint(String);

impl TopicFingerprint {
    pub fn of(title: &str) -> Self {
        let key = topic_key(title);
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        Self(hex::encode(&hasher.finalize()[..16]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The normalized title prefix a fingerprint is computed from.
pub fn topic_key(title: &str) -> String {
    normalize_title(title)
        .split(' ')
        .take(FINGERPRINT_TOKENS)
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone)]
pub struct TopicGroup {
    pub fingerprint: TopicFingerprint,
    /// Title of the first record seen for this topic.
    pub topic_title: String,
    /// Records in arrival order.
    pub members: Vec<NormalizedRecord>,
}

impl TopicGroup {
    fn start(fingerprint: TopicFingerprint, first: NormalizedRecord) -> Self {
        Self {
            fingerprint,
            topic_title: first.title.clone(),
            members: vec![first],
        }
    }
}

/// Single-pass bucketing keyed by fingerprint. Groups come out in the order
/// their first record arrived.
#[derive(Debug, Default)]
pub struct TopicGrouper {
    index: HashMap<TopicFingerprint, usize>,
    groups: Vec<TopicGroup>,
}

impl TopicGrouper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: NormalizedRecord) {
        let fingerprint = TopicFingerprint::of(&record.title);
        match self.index.get(&fingerprint) {
            Some(&slot) => {
                debug!(
                    "Joining topic {} ({}): {}",
                    fingerprint.as_str(),
                    self.groups[slot].topic_title,
                    record.source_label
                );
                self.groups[slot].members.push(record);
            }
            None => {
                self.index.insert(fingerprint.clone(), self.groups.len());
                self.groups.push(TopicGroup::start(fingerprint, record));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn finish(self) -> Vec<TopicGroup> {
        self.groups
    }
}

pub fn group_records<I>(records: I) -> Vec<TopicGroup>
where
    I: IntoIterator<Item = NormalizedRecord>,
{
    let mut grouper = TopicGrouper::new();
    for record in records {
        grouper.add(record);
    }
    grouper.finish()
}
