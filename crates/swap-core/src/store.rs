//! Storage collaborators.
//!
//! The exchange only ever reads or replaces whole collections. Two
//! implementations are provided: an in-memory store and a JSON-file store
//! that keeps `members.json` and `requests.json` in a data directory.

use crate::types::{Member, SwapRequest};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_MEMBERS_FILE: &str = "members.json";
pub const DEFAULT_REQUESTS_FILE: &str = "requests.json";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed data in {}: {source}", path.display())]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Whole-collection load/replace access to members and swap requests.
pub trait Store {
    fn load_members(&self) -> Result<Vec<Member>>;
    fn save_members(&mut self, members: &[Member]) -> Result<()>;
    fn load_requests(&self) -> Result<Vec<SwapRequest>>;
    fn save_requests(&mut self, requests: &[SwapRequest]) -> Result<()>;
}

/// Store that keeps both collections in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    members: Vec<Member>,
    requests: Vec<SwapRequest>,
}

impl MemoryStore {
    pub fn new(members: Vec<Member>, requests: Vec<SwapRequest>) -> Self {
        Self { members, requests }
    }
}

impl Store for MemoryStore {
    fn load_members(&self) -> Result<Vec<Member>> {
        Ok(self.members.clone())
    }

    fn save_members(&mut self, members: &[Member]) -> Result<()> {
        self.members = members.to_vec();
        Ok(())
    }

    fn load_requests(&self) -> Result<Vec<SwapRequest>> {
        Ok(self.requests.clone())
    }

    fn save_requests(&mut self, requests: &[SwapRequest]) -> Result<()> {
        self.requests = requests.to_vec();
        Ok(())
    }
}

/// Store backed by two pretty-printed JSON array files.
///
/// A missing file reads as an empty collection. Saves write a sibling
/// temporary file and rename it over the target.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    members_path: PathBuf,
    requests_path: PathBuf,
}

impl JsonFileStore {
    /// Store using the default file names inside `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(
            data_dir.join(DEFAULT_MEMBERS_FILE),
            data_dir.join(DEFAULT_REQUESTS_FILE),
        )
    }

    pub fn new(members_path: PathBuf, requests_path: PathBuf) -> Self {
        Self {
            members_path,
            requests_path,
        }
    }

    pub fn members_path(&self) -> &Path {
        &self.members_path
    }

    pub fn requests_path(&self) -> &Path {
        &self.requests_path
    }
}

impl Store for JsonFileStore {
    fn load_members(&self) -> Result<Vec<Member>> {
        read_collection(&self.members_path)
    }

    fn save_members(&mut self, members: &[Member]) -> Result<()> {
        write_collection(&self.members_path, members)
    }

    fn load_requests(&self) -> Result<Vec<SwapRequest>> {
        read_collection(&self.requests_path)
    }

    fn save_requests(&mut self, requests: &[SwapRequest]) -> Result<()> {
        write_collection(&self.requests_path, requests)
    }
}

fn read_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "collection file missing, starting empty");
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(StorageError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&content).map_err(|source| StorageError::Serialization {
        path: path.to_path_buf(),
        source,
    })
}

fn write_collection<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    let io_err = |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let json = serde_json::to_vec_pretty(items).map_err(|source| StorageError::Serialization {
        path: path.to_path_buf(),
        source,
    })?;

    let mut tmp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let mut file = fs::File::create(&tmp_path).map_err(io_err)?;
    file.write_all(&json).map_err(io_err)?;
    file.write_all(b"\n").map_err(io_err)?;
    file.sync_all().map_err(io_err)?;
    drop(file);
    fs::rename(&tmp_path, path).map_err(io_err)?;

    debug!(path = %path.display(), count = items.len(), "collection saved");
    Ok(())
}
