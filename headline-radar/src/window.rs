use crate::config::WindowRule;
use crate::types::NormalizedRecord;
use chrono::{DateTime, Duration, FixedOffset};

/// Trailing interval `[now - hours, ..)`. The lower bound is inclusive and
/// there is no upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<FixedOffset>,
    pub hours: u32,
}

impl TimeWindow {
    pub fn ending_at(now: DateTime<FixedOffset>, hours: u32) -> Self {
        Self {
            start: now - Duration::hours(i64::from(hours)),
            hours,
        }
    }

    /// The window for a run started at `now`, sized by the weekday rule.
    pub fn for_run(now: DateTime<FixedOffset>, rule: &WindowRule) -> Self {
        Self::ending_at(now, rule.hours_for(&now))
    }

    pub fn contains(&self, record: &NormalizedRecord) -> bool {
        record.published_at >= self.start
    }

    /// Keep only records inside the window; returns how many were discarded.
    pub fn retain(&self, records: &mut Vec<NormalizedRecord>) -> usize {
        let before = records.len();
        records.retain(|r| self.contains(r));
        before - records.len()
    }
}
