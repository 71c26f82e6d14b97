use crate::aggregators::TopicGroup;
use crate::types::{Digest, DigestItem, NormalizedRecord};
use chrono::{DateTime, FixedOffset};
use tracing::debug;

/// A topic that made the cut, with its members already in recency order.
#[derive(Debug, Clone)]
pub struct RankedTopic {
    /// First-seen title of the topic. The digest shows the primary record's
    /// title instead.
    pub topic_title: String,
    pub primary: NormalizedRecord,
    pub others: Vec<NormalizedRecord>,
}

impl RankedTopic {
    pub fn published_at(&self) -> DateTime<FixedOffset> {
        self.primary.published_at
    }

    pub fn to_digest_item(&self) -> DigestItem {
        DigestItem {
            title: self.primary.title.clone(),
            primary: self.primary.source_link(),
            others: self.others.iter().map(NormalizedRecord::source_link).collect(),
        }
    }
}

/// Order topics by their newest record, keep the first `max_topics`, and pick
/// a primary plus up to `max_alternates` corroborating records for each.
///
/// Sorting is stable: records with equal timestamps keep arrival order, and
/// so do topics whose newest records tie.
pub fn rank_topics(groups: Vec<TopicGroup>, max_topics: usize, max_alternates: usize) -> Vec<RankedTopic> {
    let mut ranked: Vec<(String, Vec<NormalizedRecord>)> = groups
        .into_iter()
        .filter(|g| !g.members.is_empty())
        .map(|g| {
            let mut members = g.members;
            members.sort_by(|a, b| b.published_at.cmp(&a.published_at));
            (g.topic_title, members)
        })
        .collect();

    ranked.sort_by(|a, b| b.1[0].published_at.cmp(&a.1[0].published_at));

    if ranked.len() > max_topics {
        debug!("Dropping {} topics over the cap of {}", ranked.len() - max_topics, max_topics);
        ranked.truncate(max_topics);
    }

    ranked
        .into_iter()
        .filter_map(|(topic_title, members)| {
            let mut members = members.into_iter();
            let primary = members.next()?;
            if primary.title != topic_title {
                debug!("Topic '{}' headlined by '{}' ({})", topic_title, primary.title, primary.source_label);
            }
            Some(RankedTopic {
                topic_title,
                primary,
                others: members.take(max_alternates).collect(),
            })
        })
        .collect()
}

pub fn build_digest(generated_at: DateTime<FixedOffset>, window_hours: u32, ranked: &[RankedTopic]) -> Digest {
    let items = ranked.iter().map(RankedTopic::to_digest_item).collect();
    Digest::new(generated_at, window_hours, items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregators::group_records;
    use chrono::{Duration, TimeZone};

    fn base() -> DateTime<FixedOffset> {
        FixedOffset::west_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 3, 11, 12, 0, 0)
            .unwrap()
    }

    fn record(title: &str, source: &str, minutes_ago: i64) -> NormalizedRecord {
        NormalizedRecord {
            title: title.to_string(),
            link: format!("https://{}/{}", source, minutes_ago),
            published_at: base() - Duration::minutes(minutes_ago),
            source_label: source.to_string(),
        }
    }

    #[test]
    fn primary_is_newest_member_and_title_follows_it() {
        let groups = group_records(vec![
            record("Cierran el puente Rosario-Victoria", "a", 90),
            record("CIERRAN el puente Rosario-Victoria", "b", 10),
            record("Cierran el puente Rosario-Victoria", "c", 30),
            record("cierran el puente rosario-victoria", "d", 60),
        ]);
        let ranked = rank_topics(groups, 150, 2);

        assert_eq!(ranked.len(), 1);
        let topic = &ranked[0];
        assert_eq!(topic.topic_title, "Cierran el puente Rosario-Victoria");
        assert_eq!(topic.primary.source_label, "b");

        let item = topic.to_digest_item();
        assert_eq!(item.title, "CIERRAN el puente Rosario-Victoria");
        let others: Vec<&str> = item.others.iter().map(|o| o.source.as_str()).collect();
        assert_eq!(others, vec!["c", "d"]);
    }

    #[test]
    fn topics_are_ordered_by_newest_member() {
        let groups = group_records(vec![
            record("Tema viejo", "a", 300),
            record("Tema medio", "b", 120),
            record("Tema viejo", "c", 5),
            record("Tema nuevo", "d", 60),
        ]);
        let ranked = rank_topics(groups, 150, 2);
        let titles: Vec<&str> = ranked.iter().map(|t| t.primary.title.as_str()).collect();
        assert_eq!(titles, vec!["Tema viejo", "Tema nuevo", "Tema medio"]);
        assert!(ranked.windows(2).all(|w| w[0].published_at() >= w[1].published_at()));
    }

    #[test]
    fn ties_keep_arrival_order() {
        let groups = group_records(vec![
            record("Primero", "a", 10),
            record("Segundo", "b", 10),
            record("Tercero", "c", 10),
        ]);
        let ranked = rank_topics(groups, 150, 2);
        let sources: Vec<&str> = ranked.iter().map(|t| t.primary.source_label.as_str()).collect();
        assert_eq!(sources, vec!["a", "b", "c"]);

        let groups = group_records(vec![
            record("Empate", "x", 10),
            record("Empate", "y", 10),
            record("Empate", "z", 10),
        ]);
        let ranked = rank_topics(groups, 150, 2);
        assert_eq!(ranked[0].primary.source_label, "x");
        assert_eq!(ranked[0].others[0].source_label, "y");
    }

    #[test]
    fn caps_topics_and_alternates() {
        let records: Vec<NormalizedRecord> = (0..200)
            .map(|i| record(&format!("Noticia número {i}"), "feed", i))
            .collect();
        let ranked = rank_topics(group_records(records), 150, 2);
        assert_eq!(ranked.len(), 150);
        // The 50 oldest topics are the ones dropped
        assert_eq!(ranked.last().unwrap().primary.title, "Noticia número 149");

        let many = (0..6).map(|i| record("Mismo hecho", &format!("s{i}"), i)).collect::<Vec<_>>();
        let ranked = rank_topics(group_records(many), 150, 2);
        assert_eq!(ranked[0].others.len(), 2);
        assert!(ranked[0]
            .others
            .iter()
            .all(|o| o.source_link() != ranked[0].primary.source_link()));
    }

    #[test]
    fn empty_input_builds_an_empty_digest() {
        let ranked = rank_topics(Vec::new(), 150, 2);
        assert!(ranked.is_empty());
        let digest = build_digest(base(), 24, &ranked);
        assert_eq!(digest.count, 0);
        assert!(digest.items.is_empty());
    }
}
