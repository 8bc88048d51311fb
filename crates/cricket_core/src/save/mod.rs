// Persistence for in-progress and finished matches
// MessagePack + LZ4 compression with versioning and integrity checks

pub mod error;
pub mod format;
pub mod manager;

pub use error::SaveError;
pub use format::{decompress_and_deserialize, serialize_and_compress, MatchSnapshot};
pub use manager::{SaveManager, SnapshotInfo};

pub const SNAPSHOT_VERSION: u32 = 1;

/// Base name of the snapshot file inside the save directory.
pub const SNAPSHOT_KEY: &str = "cricket_match_state";
