use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use super::models::FeedState;
use super::{StateStore, StorageError};

/// One JSON document per feed under a dedicated directory.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn record_path(&self, feed_key: &str) -> PathBuf {
        self.dir.join(format!("{feed_key}.json"))
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn load(&self, feed_key: &str) -> Result<FeedState, StorageError> {
        let path = self.record_path(feed_key);
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!(key = feed_key, "no stored state");
                return Ok(FeedState::default());
            }
            Err(error) => return Err(error.into()),
        };
        serde_json::from_slice(&raw).map_err(|error| StorageError::corrupt(feed_key, error))
    }

    async fn save(&self, feed_key: &str, state: &FeedState) -> Result<(), StorageError> {
        let encoded = serde_json::to_vec(state)?;
        write_atomic(&self.record_path(feed_key), &encoded)?;
        debug!(key = feed_key, "stored state");
        Ok(())
    }
}

/// Writes to a sibling temp file, fsyncs, then renames over `path`.
fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let temp_path = path.with_extension(format!("json.tmp.{}", Uuid::new_v4()));
    let result = write_synced(&temp_path, bytes).and_then(|()| fs::rename(&temp_path, path));
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(bytes)?;
    writer.flush()?;
    writer.get_ref().sync_all()
}
