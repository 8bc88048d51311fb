use super::error::SaveError;
use super::SNAPSHOT_VERSION;
use crate::engine::{MatchEngine, MatchState};
use crate::models::{MatchConfig, Teams};
use serde::{Deserialize, Serialize};

use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use rmp_serde::{from_slice, to_vec_named};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

/// Everything needed to resume a match: the setup plus the live state.
///
/// The undo log is not part of the snapshot; a restored match starts with an
/// empty one.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MatchSnapshot {
    /// Snapshot format version for forward-compatibility checks
    pub version: u32,

    /// Save timestamp (unix milliseconds)
    pub timestamp: u64,

    /// Match format and rules
    pub config: MatchConfig,

    /// Both rosters
    pub teams: Teams,

    /// The complete live state, selection gate and result included
    pub state: MatchState,
}

impl MatchSnapshot {
    pub fn from_engine(engine: &MatchEngine) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            timestamp: current_timestamp(),
            config: engine.config().clone(),
            teams: engine.teams().clone(),
            state: engine.state().clone(),
        }
    }

    /// Rebuild a running engine from this snapshot. Setup validation runs
    /// again, so a hand-edited snapshot cannot smuggle in a broken match.
    pub fn into_engine(self) -> Result<MatchEngine, SaveError> {
        MatchEngine::from_parts(self.config, self.teams, Some(self.state))
            .map_err(|e| SaveError::InvalidState(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), SaveError> {
        // Setup must still make sense on its own
        if self.config.validate().is_err() || self.teams.validate().is_err() {
            return Err(SaveError::Corrupted);
        }

        // Innings number must be inside the configured match
        if self.state.innings == 0 || self.state.innings > self.config.total_innings {
            return Err(SaveError::Corrupted);
        }

        Ok(())
    }
}

/// Serialize and compress a snapshot
pub fn serialize_and_compress(snapshot: &MatchSnapshot) -> Result<Vec<u8>, SaveError> {
    // Validate before serialization
    snapshot.validate()?;

    // 1. Serialize to MessagePack with field names
    let msgpack = to_vec_named(snapshot).map_err(SaveError::Serialization)?;

    // 2. Compress with LZ4 (size prepended for easy decompression)
    let compressed = compress_prepend_size(&msgpack);

    // 3. Add SHA256 checksum at the end
    let mut hasher = Sha256::new();
    hasher.update(&compressed);
    let checksum = hasher.finalize();

    let mut result = compressed;
    result.extend_from_slice(&checksum);

    Ok(result)
}

/// Decompress and deserialize a snapshot
pub fn decompress_and_deserialize(bytes: &[u8]) -> Result<MatchSnapshot, SaveError> {
    // Check minimum size (size header + checksum)
    if bytes.len() < 4 + 32 {
        return Err(SaveError::Corrupted);
    }

    // Split payload and checksum
    let (payload, checksum_bytes) = bytes.split_at(bytes.len() - 32);

    // Verify checksum
    let mut hasher = Sha256::new();
    hasher.update(payload);
    let calculated_checksum = hasher.finalize();

    if &calculated_checksum[..] != checksum_bytes {
        return Err(SaveError::ChecksumMismatch);
    }

    // Decompress
    let msgpack = decompress_size_prepended(payload).map_err(|_| SaveError::Decompression)?;

    // Deserialize
    let snapshot: MatchSnapshot = from_slice(&msgpack).map_err(SaveError::Deserialization)?;

    // Validate version
    if snapshot.version > SNAPSHOT_VERSION {
        return Err(SaveError::VersionMismatch {
            found: snapshot.version,
            expected: SNAPSHOT_VERSION,
        });
    }

    Ok(snapshot)
}

pub fn current_timestamp() -> u64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as u64
}
