use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tidecast_game::{TuningDocuments, TuningSource};

#[derive(Debug, Error)]
pub enum TuningDirError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Tuning documents read from a directory of JSON files.
///
/// Each table lives in its own file (`worlds.json`, `fish.json`,
/// `characters.json`, `rods.json`, `quests.json`); a missing file leaves the
/// table to the engine's built-in records.
#[derive(Debug, Clone)]
pub struct TuningDir {
    root: PathBuf,
}

impl TuningDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_table(&self, file: &str) -> Result<Option<String>, TuningDirError> {
        let path = self.root.join(file);
        match fs::read_to_string(&path) {
            Ok(json) => {
                log::debug!("read tuning table {}", path.display());
                Ok(Some(json))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::info!("{} not found; using built-in records", path.display());
                Ok(None)
            }
            Err(source) => Err(TuningDirError::Read { path, source }),
        }
    }
}

impl TuningSource for TuningDir {
    type Error = TuningDirError;

    fn load_documents(&self) -> Result<TuningDocuments, Self::Error> {
        Ok(TuningDocuments {
            worlds: self.read_table("worlds.json")?,
            fish: self.read_table("fish.json")?,
            characters: self.read_table("characters.json")?,
            rods: self.read_table("rods.json")?,
            quests: self.read_table("quests.json")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidecast_game::FishingEngine;

    fn scratch_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "tidecast-assets-{label}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_files_leave_tables_empty() {
        let dir = scratch_dir("missing");
        let docs = TuningDir::new(&dir).load_documents().unwrap();
        assert_eq!(docs, TuningDocuments::default());
    }

    #[test]
    fn present_files_feed_the_engine() {
        let dir = scratch_dir("present");
        fs::write(
            dir.join("rods.json"),
            r#"{"rods":[{"id":"starter_rod"},{"id":"reed_rod","displayName":"Reed","price":15}]}"#,
        )
        .unwrap();
        let engine = FishingEngine::new(TuningDir::new(&dir)).unwrap();
        assert_eq!(engine.catalog().rods().len(), 2);
        assert!(engine.catalog().rod("reed_rod").is_some());
        assert_eq!(engine.source().root(), dir.as_path());
    }

    #[test]
    fn unreadable_table_reports_its_path() {
        let dir = scratch_dir("unreadable");
        // A directory where a file is expected cannot be read as text.
        fs::create_dir_all(dir.join("fish.json")).unwrap();
        let err = TuningDir::new(&dir).load_documents().unwrap_err();
        assert!(err.to_string().contains("fish.json"));
    }
}
