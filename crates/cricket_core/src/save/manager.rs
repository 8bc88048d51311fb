use super::error::SaveError;
use super::format::{decompress_and_deserialize, serialize_and_compress, MatchSnapshot};
use super::SNAPSHOT_KEY;
use crate::engine::MatchEngine;

use std::fs::{remove_file, rename, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Writes and reads the single match snapshot under a chosen directory.
///
/// One snapshot per directory; saving again overwrites the previous one
/// atomically.
pub struct SaveManager {
    save_dir: PathBuf,
}

impl SaveManager {
    pub fn new(save_dir: impl Into<PathBuf>) -> Self {
        Self { save_dir: save_dir.into() }
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.save_dir.join(format!("{}.dat", SNAPSHOT_KEY))
    }

    /// Snapshot the engine and write it to disk.
    pub fn save(&self, engine: &MatchEngine) -> Result<(), SaveError> {
        let snapshot = MatchSnapshot::from_engine(engine);
        self.save_to_path(&self.snapshot_path(), &snapshot)?;

        log::info!("Match saved to {:?}", self.snapshot_path());
        Ok(())
    }

    /// Load the snapshot and rebuild a running engine from it.
    pub fn load(&self) -> Result<MatchEngine, SaveError> {
        let snapshot = self.load_from_path(&self.snapshot_path())?;
        let engine = snapshot.into_engine()?;

        log::info!("Match loaded from {:?}", self.snapshot_path());
        Ok(engine)
    }

    pub fn exists(&self) -> bool {
        self.snapshot_path().exists()
    }

    /// Delete the snapshot. A missing file is not an error.
    pub fn delete(&self) -> Result<(), SaveError> {
        let path = self.snapshot_path();
        if path.exists() {
            remove_file(&path)?;
            log::info!("Deleted snapshot at {:?}", path);
        }

        Ok(())
    }

    /// Summary of the stored snapshot for a resume prompt, without
    /// rebuilding the engine.
    pub fn info(&self) -> Result<Option<SnapshotInfo>, SaveError> {
        let path = self.snapshot_path();
        if !path.exists() {
            return Ok(None);
        }

        let snapshot = self.load_from_path(&path)?;

        Ok(Some(SnapshotInfo {
            timestamp: snapshot.timestamp,
            version: snapshot.version,
            innings: snapshot.state.innings,
            batting_team: snapshot.teams.side(snapshot.state.batting_side).name.clone(),
            score: snapshot.state.score,
            wickets: snapshot.state.wickets,
            overs: format!("{}.{}", snapshot.state.overs, snapshot.state.balls_in_over),
        }))
    }

    /// Human-readable JSON of the current snapshot, for export or debugging.
    pub fn export_json(&self, engine: &MatchEngine) -> Result<String, SaveError> {
        let snapshot = MatchSnapshot::from_engine(engine);
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    // Private helper methods

    fn save_to_path(&self, path: &Path, snapshot: &MatchSnapshot) -> Result<(), SaveError> {
        // Ensure save directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Serialize and compress
        let data = serialize_and_compress(snapshot)?;

        // Atomic save: write to temp file, then rename
        let temp_path = path.with_extension("tmp");

        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&data)?;
            file.flush()?;

            // sync_all ensures data is written to disk (portable fsync)
            file.sync_all()?;
        }

        // Atomic rename
        rename(&temp_path, path)?;

        log::debug!("Saved {} bytes to {:?}", data.len(), path);
        Ok(())
    }

    fn load_from_path(&self, path: &Path) -> Result<MatchSnapshot, SaveError> {
        if !path.exists() {
            return Err(SaveError::FileNotFound { path: path.display().to_string() });
        }

        let mut file = File::open(path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        let snapshot = decompress_and_deserialize(&data)?;

        log::debug!("Loaded {} bytes from {:?}", data.len(), path);
        Ok(snapshot)
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotInfo {
    pub timestamp: u64,
    pub version: u32,
    pub innings: u32,
    pub batting_team: String,
    pub score: u32,
    pub wickets: u32,
    pub overs: String,
}

impl SnapshotInfo {
    pub fn format_timestamp(&self) -> String {
        use time::{format_description::well_known::Rfc3339, OffsetDateTime};

        let timestamp =
            OffsetDateTime::from_unix_timestamp_nanos((self.timestamp * 1_000_000) as i128)
                .unwrap_or_else(|_| OffsetDateTime::now_utc());

        timestamp.format(&Rfc3339).unwrap_or_else(|_| "Unknown".to_string())
    }

    pub fn get_display_text(&self) -> String {
        format!(
            "Innings {}: {} {}/{} ({} ov)",
            self.innings, self.batting_team, self.score, self.wickets, self.overs
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchConfig, Team, Teams};
    use tempfile::TempDir;

    fn scored_engine() -> MatchEngine {
        let teams = Teams::new(
            Team::new(
                "Ashton CC",
                vec!["Asha".to_string(), "Ben".to_string(), "Caro".to_string()],
            ),
            Team::new(
                "Birch XI",
                vec!["Dev".to_string(), "Esme".to_string(), "Farid".to_string()],
            ),
        );
        let mut engine = MatchEngine::new(teams, MatchConfig::limited(5)).unwrap();
        engine.resolve_selection("Asha").unwrap();
        engine.resolve_selection("Ben").unwrap();
        engine.resolve_selection("Dev").unwrap();
        engine.record_runs(4).unwrap();
        engine.record_runs(3).unwrap();
        engine
    }

    #[test]
    fn test_save_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SaveManager::new(temp_dir.path());

        let engine = scored_engine();
        manager.save(&engine).unwrap();

        let loaded = manager.load().unwrap();
        assert_eq!(loaded.state(), engine.state());
        assert_eq!(loaded.teams().a.name, "Ashton CC");

        // Temp file should not exist after the atomic rename
        let temp_path = manager.snapshot_path().with_extension("tmp");
        assert!(!temp_path.exists());
    }

    #[test]
    fn test_undo_log_is_not_persisted() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SaveManager::new(temp_dir.path());

        let mut engine = scored_engine();
        assert!(engine.undo_depth() > 0);
        manager.save(&engine).unwrap();

        let mut loaded = manager.load().unwrap();
        assert_eq!(loaded.undo_depth(), 0);
        assert!(!loaded.undo(), "nothing to undo after a restore");

        // the original engine still undoes fine
        assert!(engine.undo());
    }

    #[test]
    fn test_missing_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SaveManager::new(temp_dir.path());

        assert!(!manager.exists());
        let err = manager.load().unwrap_err();
        assert!(matches!(err, SaveError::FileNotFound { .. }));
        // a missing file is worth retrying after the path is fixed
        assert!(err.is_recoverable());
        assert!(manager.info().unwrap().is_none());
    }

    #[test]
    fn test_exists_and_delete() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SaveManager::new(temp_dir.path());

        manager.save(&scored_engine()).unwrap();
        assert!(manager.exists());

        manager.delete().unwrap();
        assert!(!manager.exists());

        // Deleting again is a no-op
        manager.delete().unwrap();
    }

    #[test]
    fn test_snapshot_info() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SaveManager::new(temp_dir.path());

        manager.save(&scored_engine()).unwrap();
        let info = manager.info().unwrap().unwrap();

        assert_eq!(info.innings, 1);
        assert_eq!(info.batting_team, "Ashton CC");
        assert_eq!(info.score, 7);
        assert_eq!(info.wickets, 0);
        assert_eq!(info.overs, "0.2");
        assert!(info.timestamp > 0);
        assert_eq!(
            info.get_display_text(),
            "Innings 1: Ashton CC 7/0 (0.2 ov)"
        );
    }

    #[test]
    fn test_export_json() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SaveManager::new(temp_dir.path());

        let json = manager.export_json(&scored_engine()).unwrap();
        assert!(json.contains("\"Ashton CC\""));
        assert!(json.contains("\"score\": 7"));
    }

    #[test]
    fn test_corrupted_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SaveManager::new(temp_dir.path());

        manager.save(&scored_engine()).unwrap();

        // Flip a byte in the middle of the payload
        let path = manager.snapshot_path();
        let mut data = std::fs::read(&path).unwrap();
        let mid = data.len() / 2;
        data[mid] = data[mid].wrapping_add(1);
        std::fs::write(&path, &data).unwrap();

        let err = manager.load().unwrap_err();
        assert!(matches!(err, SaveError::ChecksumMismatch));
        assert!(!err.is_recoverable());
    }
}
