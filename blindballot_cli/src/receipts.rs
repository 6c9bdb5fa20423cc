use blindballot::{MemStore, PriorBallot, ReceiptStore};
use std::io;
use std::path::{Path, PathBuf};

/// Receipts kept in a JSON file between runs
pub struct FileStore {
    path: PathBuf,
    inner: MemStore,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn load(path: &Path) -> io::Result<Self> {
        let inner = match std::fs::read_to_string(path) {
            Ok(json) => serde_json::from_str(&json)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => MemStore::default(),
            Err(e) => return Err(e),
        };

        Ok(FileStore {
            path: path.to_path_buf(),
            inner,
        })
    }

    pub fn save(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.inner)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        std::fs::write(&self.path, json)
    }
}

impl ReceiptStore for FileStore {
    fn get_prior(&self, voting_id: &str) -> Option<PriorBallot> {
        self.inner.get_prior(voting_id)
    }

    fn set_prior(&mut self, voting_id: &str, prior: PriorBallot) {
        self.inner.set_prior(voting_id, prior)
    }
}
