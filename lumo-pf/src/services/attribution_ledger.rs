//! Attribution ledger
//!
//! Durable record of every completed download, kept for
//! license-compliance reporting. The backing store is a single JSON
//! document rewritten in full on every mutation; one ledger instance
//! owns the mapping exclusively (single-process assumption, no file
//! locking).
//!
//! Persistence failures never propagate: a corrupt or missing file
//! degrades to an empty in-memory database with a logged warning, and a
//! failed save leaves the in-memory state authoritative.

use crate::models::{Attribution, AttributionDatabase, Photo};
use chrono::Utc;
use lumo_common::{Error, Result};
use std::path::{Path, PathBuf};

/// Fixed database file name inside the configured ledger directory
pub const ATTRIBUTION_DB_FILENAME: &str = "unsplash-attributions.json";

const SOURCE_NAME: &str = "Unsplash";
const SOURCE_URL: &str = "https://unsplash.com";
const LICENSE: &str = "Unsplash License";

/// Persistent mapping from photo id to attribution record
pub struct AttributionLedger {
    ledger_dir: PathBuf,
    database: AttributionDatabase,
}

impl AttributionLedger {
    /// Open the ledger in the given directory, loading any existing
    /// database file. Load failures are not fatal.
    pub fn new(ledger_dir: impl Into<PathBuf>) -> Self {
        let ledger_dir = ledger_dir.into();
        let database = Self::load_database(&ledger_dir);
        Self {
            ledger_dir,
            database,
        }
    }

    /// Path of the backing database file
    pub fn database_file(&self) -> PathBuf {
        self.ledger_dir.join(ATTRIBUTION_DB_FILENAME)
    }

    fn load_database(ledger_dir: &Path) -> AttributionDatabase {
        let path = ledger_dir.join(ATTRIBUTION_DB_FILENAME);
        if !path.exists() {
            tracing::debug!(
                path = %path.display(),
                "No attribution database file, starting empty"
            );
            return AttributionDatabase::default();
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "Cannot read attribution database, starting empty"
                );
                return AttributionDatabase::default();
            }
        };

        match serde_json::from_str::<AttributionDatabase>(&content) {
            Ok(database) => {
                tracing::info!(
                    path = %path.display(),
                    count = database.attributions.len(),
                    "Attribution database loaded"
                );
                database
            }
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "Attribution database is corrupt, starting empty"
                );
                AttributionDatabase::default()
            }
        }
    }

    /// Record one completed download and persist the database.
    ///
    /// The photographer name falls back from `user.name` to
    /// `user.username`; a repeat download of the same photo id
    /// overwrites the prior record (last-write-wins). The save error
    /// channel is discarded deliberately and logged: the in-memory
    /// record is returned regardless.
    pub fn add_attribution(&mut self, photo: &Photo, file_path: &Path) -> Attribution {
        let project_path = file_path
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();
        let project_file = file_path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();

        let attribution = Attribution {
            id: photo.id.clone(),
            photographer: photo.user.display_name().to_string(),
            photographer_url: photo.user.profile_url(),
            source: SOURCE_NAME.to_string(),
            source_url: SOURCE_URL.to_string(),
            license: LICENSE.to_string(),
            download_date: Utc::now().to_rfc3339(),
            project_path,
            project_file,
        };

        self.database
            .attributions
            .insert(photo.id.clone(), attribution.clone());

        if let Err(err) = self.save() {
            tracing::warn!(
                photo_id = %photo.id,
                error = %err,
                "Failed to persist attribution database, in-memory state kept"
            );
        }

        attribution
    }

    /// Rewrite the full database file
    fn save(&self) -> Result<()> {
        std::fs::create_dir_all(&self.ledger_dir)?;
        let json = serde_json::to_string_pretty(&self.database)
            .map_err(|e| Error::Internal(format!("serialize attribution database: {}", e)))?;
        std::fs::write(self.database_file(), json)?;
        Ok(())
    }

    /// Look up the attribution for one photo id
    pub fn get_attribution(&self, id: &str) -> Option<&Attribution> {
        self.database.attributions.get(id)
    }

    /// All stored attributions, in mapping order
    pub fn all_attributions(&self) -> Vec<Attribution> {
        self.database.attributions.values().cloned().collect()
    }

    /// Attributions whose stored directory lies under `project_dir`.
    ///
    /// Path-segment-aware: `/a/proj` matches `/a/proj/img` but not
    /// `/a/project2`.
    pub fn attributions_for_project(&self, project_dir: &Path) -> Vec<Attribution> {
        self.database
            .attributions
            .values()
            .filter(|a| Path::new(&a.project_path).starts_with(project_dir))
            .cloned()
            .collect()
    }

    /// Number of stored attributions
    pub fn len(&self) -> usize {
        self.database.attributions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.database.attributions.is_empty()
    }

    /// Full persisted state, for the exporters
    pub fn database(&self) -> &AttributionDatabase {
        &self.database
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PhotoLinks, PhotoUrls, PhotoUser};
    use tempfile::TempDir;

    fn photo(id: &str, name: Option<&str>) -> Photo {
        Photo {
            id: id.to_string(),
            width: 1200,
            height: 800,
            description: None,
            alt_description: None,
            urls: PhotoUrls {
                raw: format!("https://images.unsplash.com/{}?raw", id),
                full: format!("https://images.unsplash.com/{}?full", id),
                regular: format!("https://images.unsplash.com/{}?regular", id),
                small: format!("https://images.unsplash.com/{}?small", id),
                thumb: format!("https://images.unsplash.com/{}?thumb", id),
            },
            links: PhotoLinks {
                self_link: format!("https://api.unsplash.com/photos/{}", id),
                html: format!("https://unsplash.com/photos/{}", id),
                download: format!("https://unsplash.com/photos/{}/download", id),
                download_location: format!("https://api.unsplash.com/photos/{}/download", id),
            },
            user: PhotoUser {
                id: "u1".to_string(),
                username: "jdoe".to_string(),
                name: name.map(String::from),
                links: None,
            },
        }
    }

    #[test]
    fn add_then_get_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let mut ledger = AttributionLedger::new(temp_dir.path());

        let stored = ledger.add_attribution(
            &photo("abc", Some("Jane Doe")),
            Path::new("/proj/assets/unsplash-abc.jpg"),
        );
        assert_eq!(stored.photographer, "Jane Doe");

        let found = ledger.get_attribution("abc").unwrap();
        assert_eq!(found.id, "abc");
        assert_eq!(found.photographer, "Jane Doe");
        assert_eq!(found.project_path, "/proj/assets");
        assert_eq!(found.project_file, "unsplash-abc.jpg");
        assert_eq!(found.source, "Unsplash");
        assert_eq!(found.license, "Unsplash License");
    }

    #[test]
    fn photographer_falls_back_to_username() {
        let temp_dir = TempDir::new().unwrap();
        let mut ledger = AttributionLedger::new(temp_dir.path());

        ledger.add_attribution(&photo("abc", None), Path::new("/proj/unsplash-abc.jpg"));
        assert_eq!(ledger.get_attribution("abc").unwrap().photographer, "jdoe");
    }

    #[test]
    fn persistence_round_trip_across_instances() {
        let temp_dir = TempDir::new().unwrap();

        {
            let mut ledger = AttributionLedger::new(temp_dir.path());
            ledger.add_attribution(
                &photo("abc", Some("Jane Doe")),
                Path::new("/proj/unsplash-abc.jpg"),
            );
        }

        let reopened = AttributionLedger::new(temp_dir.path());
        let found = reopened.get_attribution("abc").unwrap();
        assert_eq!(found.photographer, "Jane Doe");
        assert_eq!(reopened.len(), 1);
    }

    #[test]
    fn repeat_download_overwrites_prior_record() {
        let temp_dir = TempDir::new().unwrap();
        let mut ledger = AttributionLedger::new(temp_dir.path());

        ledger.add_attribution(&photo("abc", Some("Jane Doe")), Path::new("/one/a.jpg"));
        ledger.add_attribution(&photo("abc", Some("Jane Doe")), Path::new("/two/b.jpg"));

        assert_eq!(ledger.len(), 1);
        let found = ledger.get_attribution("abc").unwrap();
        assert_eq!(found.project_path, "/two");
        assert_eq!(found.project_file, "b.jpg");
    }

    #[test]
    fn empty_ledger_reads_are_empty_not_errors() {
        let temp_dir = TempDir::new().unwrap();
        let ledger = AttributionLedger::new(temp_dir.path());

        assert!(ledger.is_empty());
        assert!(ledger.all_attributions().is_empty());
        assert!(ledger.get_attribution("missing").is_none());
        assert!(ledger
            .attributions_for_project(Path::new("/anywhere"))
            .is_empty());
    }

    #[test]
    fn corrupt_database_file_degrades_to_empty() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(ATTRIBUTION_DB_FILENAME),
            "{not valid json",
        )
        .unwrap();

        let ledger = AttributionLedger::new(temp_dir.path());
        assert!(ledger.is_empty());
    }

    #[test]
    fn project_filter_is_segment_aware() {
        let temp_dir = TempDir::new().unwrap();
        let mut ledger = AttributionLedger::new(temp_dir.path());

        ledger.add_attribution(&photo("p1", None), Path::new("/a/projectA/img1.jpg"));
        ledger.add_attribution(&photo("p2", None), Path::new("/a/projectB/img2.jpg"));
        ledger.add_attribution(&photo("p3", None), Path::new("/a/projectA/nested/img3.jpg"));

        let matches = ledger.attributions_for_project(Path::new("/a/projectA"));
        let ids: Vec<_> = matches.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p3"]);

        // A sibling directory sharing a textual prefix must not match
        let matches = ledger.attributions_for_project(Path::new("/a/proj"));
        assert!(matches.is_empty());
    }

    #[test]
    fn mapping_key_equals_record_id() {
        let temp_dir = TempDir::new().unwrap();
        let mut ledger = AttributionLedger::new(temp_dir.path());
        ledger.add_attribution(&photo("xyz", None), Path::new("/p/f.jpg"));

        for (key, attribution) in &ledger.database().attributions {
            assert_eq!(key, &attribution.id);
        }
    }
}
