use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use serde_json::Value;
use shared::domain::{decode_swimmers, DecodedSwimmers, Swimmer};
use tracing::{debug, trace, warn};

use super::{Change, Committed, Persistence};
use crate::error::StoreError;

/// Keeps the collection as a JSON array of swimmer records in one file.
///
/// A missing file means no swimmers yet. A file that is not valid JSON is
/// treated as empty (with a warning) and is overwritten by the next write.
/// Writes go to a sibling temp file that is then renamed over the target.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    path: PathBuf,
}

impl LocalFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl Persistence for LocalFileStore {
    async fn load(&self) -> Result<DecodedSwimmers, StoreError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no swimmer file yet");
                return Ok(DecodedSwimmers::default());
            }
            Err(err) => return Err(err.into()),
        };

        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(DecodedSwimmers::default());
        }

        // Invalid UTF-8 fails here as well.
        match serde_json::from_slice::<Value>(&raw) {
            Ok(value) => Ok(decode_swimmers(&value)),
            Err(error) => {
                warn!(path = %self.path.display(), %error, "swimmer file is not valid JSON; starting empty");
                Ok(DecodedSwimmers {
                    swimmers: Vec::new(),
                    dropped: 1,
                })
            }
        }
    }

    async fn commit(&self, change: &Change, swimmers: &[Swimmer]) -> Result<Committed, StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(swimmers)
            .map_err(|e| StoreError::persistence(format!("failed to serialize swimmers: {e}")))?;

        let tmp_path = self.tmp_path();
        trace!(tmp_path = %tmp_path.display(), "writing swimmer file");
        tokio::fs::write(&tmp_path, json).await?;
        if let Err(err) = tokio::fs::rename(&tmp_path, &self.path).await {
            if let Err(error) = tokio::fs::remove_file(&tmp_path).await {
                warn!(tmp_path = %tmp_path.display(), %error, "failed to remove temp swimmer file");
            }
            return Err(err.into());
        }

        debug!(
            path = %self.path.display(),
            swimmer_id = change.swimmer_id().0,
            count = swimmers.len(),
            "swimmers saved"
        );
        Ok(Committed::Accepted)
    }
}
