use crate::rss_utils;
use crate::types::{FetchConfig, RadarError, Result};
use chrono::{DateTime, Datelike, FixedOffset, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const ENV_CONFIG_PATH: &str = "RADAR_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/radar.json";
pub const DEFAULT_OUTPUT_PATH: &str = "out/rosario_headlines.json";
/// Longest lookback a run accepts: one leap year.
pub const MAX_WINDOW_HOURS: u32 = 24 * 366;

/// Local news outlets for Rosario and the Santa Fe province, plus Google News
/// searches restricted to a few national and government sites.
pub fn default_feeds() -> Vec<String> {
    [
        "https://www.lacapital.com.ar/rss/ultimas-noticias.xml",
        "https://www.rosario3.com/rss/",
        "https://www.elciudadanoweb.com/feed/",
        "https://www.conclusion.com.ar/feed/",
        "https://puntobiz.com.ar/rss",
        "https://www.on24.com.ar/feed/",
        "https://redboing.com/feed/",
        "https://viapais.com.ar/rosario/rss/",
        "https://www.ellitoral.com/rss/ultimas.xml",
        "https://www.unosantafe.com.ar/rss.xml",
        "https://www.airedesantafe.com.ar/rss",
        "https://www.lt9.com.ar/rss",
        "https://www.lt10.com.ar/rss",
        "https://www.sur24.com.ar/feed/",
        "https://venado24.com.ar/feed/",
        "https://casildaplus.com.ar/rss",
        "https://elinformevt.com.ar/feed/",
        "https://www.ambito.com/rss/",
        "https://www.cronista.com/files/rss/economia.xml",
        "https://news.google.com/rss/search?q=site:infobae.com+Rosario+OR+'Santa+Fe'&hl=es-419&gl=AR&ceid=AR:es-419",
        "https://news.google.com/rss/search?q=site:rosario.gob.ar+Rosario&hl=es-419&gl=AR&ceid=AR:es-419",
        "https://news.google.com/rss/search?q=site:santafe.gov.ar+Rosario+OR+'Santa+Fe'&hl=es-419&gl=AR&ceid=AR:es-419",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Length of the lookback window. One weekday gets a wider net so the run
/// after the weekend still picks up Saturday and Sunday stories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowRule {
    pub default_hours: u32,
    pub extended_hours: u32,
    pub extended_weekday: Weekday,
}

impl Default for WindowRule {
    fn default() -> Self {
        Self {
            default_hours: 24,
            extended_hours: 36,
            extended_weekday: Weekday::Mon,
        }
    }
}

impl WindowRule {
    /// Window length for a run started at `now` (local time).
    pub fn hours_for(&self, now: &DateTime<FixedOffset>) -> u32 {
        if now.weekday() == self.extended_weekday {
            self.extended_hours
        } else {
            self.default_hours
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    pub feeds: Vec<String>,
    pub utc_offset_hours: i32,
    pub max_topics: usize,
    pub max_alternates: usize,
    pub window: WindowRule,
    pub output_path: PathBuf,
    pub fetch: FetchConfig,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            feeds: default_feeds(),
            utc_offset_hours: -3,
            max_topics: 150,
            max_alternates: 2,
            window: WindowRule::default(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            fetch: FetchConfig::default(),
        }
    }
}

impl RadarConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = Self::from_json(&contents)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let config: RadarConfig = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the configuration source:
    /// 1) an explicit path
    /// 2) $RADAR_CONFIG
    /// 3) config/radar.json, if it exists
    /// 4) built-in defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let path = PathBuf::from(p);
            if !path.exists() {
                return Err(RadarError::Config(format!(
                    "{} points to non-existent path {}",
                    ENV_CONFIG_PATH,
                    path.display()
                )));
            }
            return Self::from_file(&path);
        }
        let fallback = PathBuf::from(DEFAULT_CONFIG_PATH);
        if fallback.exists() {
            return Self::from_file(&fallback);
        }
        debug!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<()> {
        self.local_offset()?;
        for hours in [self.window.default_hours, self.window.extended_hours] {
            if hours == 0 || hours > MAX_WINDOW_HOURS {
                return Err(RadarError::Config(format!(
                    "window length {}h outside 1..={}h",
                    hours, MAX_WINDOW_HOURS
                )));
            }
        }
        if let Some(bad) = self.feeds.iter().find(|f| !rss_utils::url::is_valid_rss_url(f)) {
            return Err(RadarError::Config(format!("not an http(s) feed URL: {}", bad)));
        }
        Ok(())
    }

    pub fn local_offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_hours * 3600).ok_or_else(|| {
            RadarError::Config(format!("UTC offset out of range: {}h", self.utc_offset_hours))
        })
    }

    /// Current wall-clock time in the configured zone.
    pub fn local_now(&self) -> Result<DateTime<FixedOffset>> {
        Ok(Utc::now().with_timezone(&self.local_offset()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn defaults_match_the_stock_collector() {
        let config = RadarConfig::default();
        assert_eq!(config.feeds.len(), 22);
        assert_eq!(config.max_topics, 150);
        assert_eq!(config.max_alternates, 2);
        assert_eq!(config.local_offset().unwrap(), FixedOffset::west_opt(3 * 3600).unwrap());
        assert_eq!(config.output_path, PathBuf::from("out/rosario_headlines.json"));
        config.validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = RadarConfig::from_json(
            r#"{ "feeds": ["https://www.rosario3.com/rss/"], "max_topics": 20, "fetch": { "timeout_seconds": 5 } }"#,
        )
        .unwrap();
        assert_eq!(config.feeds, vec!["https://www.rosario3.com/rss/".to_string()]);
        assert_eq!(config.max_topics, 20);
        assert_eq!(config.max_alternates, 2);
        assert_eq!(config.fetch.timeout_seconds, 5);
        assert_eq!(config.fetch.user_agent, "HeadlineRadar/1.0");
        assert_eq!(config.window, WindowRule::default());
    }

    #[test]
    fn rejects_bad_offset_and_urls() {
        assert!(matches!(
            RadarConfig::from_json(r#"{ "utc_offset_hours": 30 }"#),
            Err(RadarError::Config(_))
        ));
        assert!(matches!(
            RadarConfig::from_json(r#"{ "feeds": ["ftp://example.com/feed"] }"#),
            Err(RadarError::Config(_))
        ));
        assert!(matches!(
            RadarConfig::from_json(r#"{ "window": { "default_hours": 0 } }"#),
            Err(RadarError::Config(_))
        ));
    }

    #[test]
    fn rejects_windows_that_cannot_be_represented() {
        assert!(matches!(
            RadarConfig::from_json(r#"{ "window": { "default_hours": 4000000000, "extended_hours": 4000000000 } }"#),
            Err(RadarError::Config(_))
        ));
        assert!(matches!(
            RadarConfig::from_json(r#"{ "window": { "extended_hours": 8785 } }"#),
            Err(RadarError::Config(_))
        ));
        let widest = RadarConfig::from_json(r#"{ "window": { "default_hours": 8784, "extended_hours": 8784 } }"#)
            .unwrap();
        assert_eq!(widest.window.default_hours, MAX_WINDOW_HOURS);
    }

    #[test]
    fn monday_gets_the_wide_window() {
        let art = FixedOffset::west_opt(3 * 3600).unwrap();
        let rule = WindowRule::default();
        // 2025-03-10 is a Monday
        let monday = art.with_ymd_and_hms(2025, 3, 10, 0, 30, 0).unwrap();
        let tuesday = art.with_ymd_and_hms(2025, 3, 11, 8, 0, 0).unwrap();
        let sunday = art.with_ymd_and_hms(2025, 3, 9, 23, 59, 59).unwrap();
        assert_eq!(rule.hours_for(&monday), 36);
        assert_eq!(rule.hours_for(&tuesday), 24);
        assert_eq!(rule.hours_for(&sunday), 24);
    }

    #[test]
    fn weekday_is_taken_in_local_time() {
        let art = FixedOffset::west_opt(3 * 3600).unwrap();
        // Monday 01:00 UTC is still Sunday evening in Rosario
        let utc_monday = Utc.with_ymd_and_hms(2025, 3, 10, 1, 0, 0).unwrap();
        assert_eq!(WindowRule::default().hours_for(&utc_monday.with_timezone(&art)), 24);
    }
}
