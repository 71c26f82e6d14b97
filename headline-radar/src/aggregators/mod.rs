pub mod topic;

pub use topic::{group_records, TopicFingerprint, TopicGroup, TopicGrouper};
