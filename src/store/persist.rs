use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{StoreError, ThreadState};

/// Storage name the state document is saved under
pub const STORAGE_NAME: &str = "thread-storage";
const STATE_VERSION: u32 = 0;

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    state: ThreadState,
    version: u32,
}

#[derive(Debug, Serialize)]
struct EnvelopeRef<'a> {
    state: &'a ThreadState,
    version: u32,
}

/// JSON document holding the whole thread state, replaced atomically on save
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(format!("{}.json", STORAGE_NAME)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the state, treating a missing file as an empty store
    pub async fn load(&self) -> Result<ThreadState, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No thread storage found, starting empty");
                return Ok(ThreadState::default());
            }
            Err(e) => return Err(e.into()),
        };

        let envelope: Envelope = serde_json::from_slice(&bytes)?;
        if envelope.version != STATE_VERSION {
            debug!(version = envelope.version, "Loading thread storage written by another version");
        }
        Ok(envelope.state)
    }

    pub async fn save(&self, state: &ThreadState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let body = serde_json::to_vec(&EnvelopeRef {
            state,
            version: STATE_VERSION,
        })?;

        // Write beside the target then rename so readers never see a partial file
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!(path = %self.path.display(), bytes = body.len(), "Thread storage saved");
        Ok(())
    }
}
