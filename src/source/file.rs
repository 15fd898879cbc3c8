//! File-based data source.
//!
//! Polls a directory for the three resource files. A bundle is delivered
//! on the first poll and again whenever any of the files changes on disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::bundle::{ALERTS_RESOURCE, CATALOG_RESOURCE, RELATIONSHIPS_RESOURCE};
use super::error::LoadError;
use super::{DataBundle, DataSource};

/// A data source that reads the dashboard resources from a directory.
///
/// The directory is expected to contain `kpi_data.json`,
/// `kpi_relationships.json` and `alerts.json`. The source tracks the
/// newest modification time across the three files and only returns a
/// bundle when something has been updated.
///
/// Loading is all-or-nothing: if any file is missing or malformed, no
/// bundle is returned and the error is reported via [`DataSource::error`].
#[derive(Debug)]
pub struct FileSource {
    dir: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
}

impl FileSource {
    /// Create a new file source for the given directory.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let description = format!("dir: {}", dir.display());
        Self {
            dir,
            description,
            last_error: None,
            last_modified: None,
        }
    }

    /// Returns the directory being monitored.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Newest modification time across the three resource files.
    ///
    /// `None` when any file is missing, which forces a read attempt (and a
    /// recorded error) on the next poll.
    fn get_modified_time(&self) -> Option<SystemTime> {
        [CATALOG_RESOURCE, RELATIONSHIPS_RESOURCE, ALERTS_RESOURCE]
            .iter()
            .map(|name| fs::metadata(self.dir.join(name)).ok()?.modified().ok())
            .collect::<Option<Vec<_>>>()?
            .into_iter()
            .max()
    }

    fn read_resource(&self, name: &'static str) -> Result<String, LoadError> {
        fs::read_to_string(self.dir.join(name)).map_err(|e| LoadError::Io(name, e.to_string()))
    }

    fn try_read(&self) -> Result<DataBundle, LoadError> {
        let catalog = self.read_resource(CATALOG_RESOURCE)?;
        let relationships = self.read_resource(RELATIONSHIPS_RESOURCE)?;
        let alerts = self.read_resource(ALERTS_RESOURCE)?;

        Ok(DataBundle {
            catalog: serde_json::from_str(&catalog)
                .map_err(|e| LoadError::Parse(CATALOG_RESOURCE, e.to_string()))?,
            relationships: serde_json::from_str(&relationships)
                .map_err(|e| LoadError::Parse(RELATIONSHIPS_RESOURCE, e.to_string()))?,
            alerts: serde_json::from_str(&alerts)
                .map_err(|e| LoadError::Parse(ALERTS_RESOURCE, e.to_string()))?,
        })
    }

    /// Read and parse all three files, recording any failure.
    fn read_bundle(&mut self) -> Option<DataBundle> {
        match self.try_read() {
            Ok(bundle) => {
                self.last_error = None;
                Some(bundle)
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                None
            }
        }
    }
}

impl DataSource for FileSource {
    fn poll(&mut self) -> Option<DataBundle> {
        let current_modified = self.get_modified_time();

        let changed = match (&self.last_modified, &current_modified) {
            (None, _) => true, // First poll, always read
            (Some(_), None) => false, // A file disappeared, keep the last store
            (Some(last), Some(current)) => current > last,
        };

        if changed {
            if let Some(bundle) = self.read_bundle() {
                self.last_modified = current_modified;
                return Some(bundle);
            }
        }

        None
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn catalog_json() -> &'static str {
        r#"{
            "General Medical Center": {
                "Emergency Department": {
                    "Average Wait Time": {
                        "current_value": 27.2,
                        "target": "< 30",
                        "unit": "minutes",
                        "type": "lower_better"
                    }
                }
            }
        }"#
    }

    fn write_all(dir: &Path, catalog: &str, relationships: &str, alerts: &str) {
        fs::write(dir.join(CATALOG_RESOURCE), catalog).unwrap();
        fs::write(dir.join(RELATIONSHIPS_RESOURCE), relationships).unwrap();
        fs::write(dir.join(ALERTS_RESOURCE), alerts).unwrap();
    }

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/data");
        assert_eq!(source.dir(), Path::new("/tmp/data"));
        assert_eq!(source.description(), "dir: /tmp/data");
        assert!(source.error().is_none());
    }

    #[test]
    fn test_file_source_poll_reads_all_three() {
        let dir = TempDir::new().unwrap();
        write_all(dir.path(), catalog_json(), "{}", "[]");

        let mut source = FileSource::new(dir.path());

        let bundle = source.poll();
        assert!(bundle.is_some());
        let bundle = bundle.unwrap();
        assert!(bundle.catalog.contains_key("General Medical Center"));
        assert!(bundle.relationships.is_empty());
        assert!(bundle.alerts.is_empty());

        // Second poll without a file change returns None
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_file_source_detects_changes() {
        let dir = TempDir::new().unwrap();
        write_all(dir.path(), catalog_json(), "{}", "[]");

        let mut source = FileSource::new(dir.path());
        let _ = source.poll();

        // Rewrite one file (wait a bit for mtime resolution)
        std::thread::sleep(std::time::Duration::from_millis(10));
        fs::write(
            dir.path().join(ALERTS_RESOURCE),
            r#"[{"hospital":"H","department":"D","kpi":"K","level":"critical","message":"m"}]"#,
        )
        .unwrap();

        // May be flaky on filesystems with coarse mtime resolution
        if let Some(bundle) = source.poll() {
            assert_eq!(bundle.alerts.len(), 1);
        }
    }

    #[test]
    fn test_file_source_missing_file_is_all_or_nothing() {
        let dir = TempDir::new().unwrap();
        // Only two of the three resources present
        fs::write(dir.path().join(CATALOG_RESOURCE), catalog_json()).unwrap();
        fs::write(dir.path().join(RELATIONSHIPS_RESOURCE), "{}").unwrap();

        let mut source = FileSource::new(dir.path());

        assert!(source.poll().is_none());
        let err = source.error().unwrap();
        assert!(err.contains("alerts.json"));
    }

    #[test]
    fn test_file_source_invalid_json_discards_bundle() {
        let dir = TempDir::new().unwrap();
        write_all(dir.path(), catalog_json(), "not valid json", "[]");

        let mut source = FileSource::new(dir.path());

        assert!(source.poll().is_none());
        let err = source.error().unwrap();
        assert!(err.contains("kpi_relationships.json"));
    }

    #[test]
    fn test_file_source_recovers_after_fix() {
        let dir = TempDir::new().unwrap();
        write_all(dir.path(), catalog_json(), "broken", "[]");

        let mut source = FileSource::new(dir.path());
        assert!(source.poll().is_none());

        std::thread::sleep(std::time::Duration::from_millis(10));
        fs::write(dir.path().join(RELATIONSHIPS_RESOURCE), "{}").unwrap();

        if let Some(bundle) = source.poll() {
            assert!(source.error().is_none());
            assert!(bundle.relationships.is_empty());
        }
    }
}
