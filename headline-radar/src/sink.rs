use crate::types::{Digest, DigestSink};
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes the digest as pretty-printed UTF-8 JSON, replacing the file.
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DigestSink for JsonFileSink {
    fn destination(&self) -> String {
        self.path.display().to_string()
    }

    fn write(&self, digest: &Digest) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output directory {}", parent.display()))?;
        }

        let file = File::create(&self.path)
            .with_context(|| format!("writing digest to {}", self.path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, digest).context("serializing digest")?;
        writer
            .flush()
            .with_context(|| format!("writing digest to {}", self.path.display()))?;

        info!("Wrote {} items to {}", digest.count, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DigestItem, SourceLink};
    use chrono::{FixedOffset, TimeZone};

    fn sample() -> Digest {
        let at = FixedOffset::west_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 3, 10, 9, 15, 2)
            .unwrap();
        Digest::new(
            at,
            36,
            vec![DigestItem {
                title: "Se incendió un depósito en zona sur".to_string(),
                primary: SourceLink {
                    source: "Rosario3".to_string(),
                    link: "https://www.rosario3.com/incendio".to_string(),
                },
                others: vec![SourceLink {
                    source: "La Capital".to_string(),
                    link: "https://www.lacapital.com.ar/incendio".to_string(),
                }],
            }],
        )
    }

    #[test]
    fn creates_parent_dirs_and_keeps_unicode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("rosario_headlines.json");
        let sink = JsonFileSink::new(&path);

        sink.write(&sample()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("Se incendió un depósito en zona sur"));
        assert!(!text.contains("\\u00"));
        assert!(text.contains("\n  \"window_hours\": 36"));

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["count"], 1);
        assert_eq!(value["items"][0]["primary"]["source"], "Rosario3");
        assert_eq!(value["items"][0]["others"][0]["link"], "https://www.lacapital.com.ar/incendio");
        assert_eq!(value["generated_at"], "2025-03-10T09:15:02.000000-03:00");
    }

    #[test]
    fn overwrites_previous_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("digest.json");
        fs::write(&path, "x".repeat(10_000)).unwrap();

        let sink = JsonFileSink::new(&path);
        let mut digest = sample();
        digest.items.clear();
        digest.count = 0;
        sink.write(&digest).unwrap();

        let back: Digest = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, digest);
    }

    #[test]
    fn unwritable_destination_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where a directory is needed
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let sink = JsonFileSink::new(blocker.join("digest.json"));
        assert!(sink.write(&sample()).is_err());
    }
}
