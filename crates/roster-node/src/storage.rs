//! Persistent storage as a single JSON document.
//!
//! The whole roster is held in memory and rewritten to disk after every
//! mutation. Writers hold the lock across apply-and-persist, so concurrent
//! requests cannot lose each other's updates, and a failed write leaves the
//! in-memory roster untouched.

use crate::error::{Error, Result};
use roster_core::Roster;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// Storage backend for the roster document.
pub struct Storage {
    path: PathBuf,
    roster: RwLock<Roster>,
}

impl Storage {
    /// Open the document at `path`, creating an empty roster if it is absent.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let roster = match load(&path).await? {
            Some(roster) => roster,
            None => {
                let roster = Roster::default();
                persist(&path, &roster).await?;
                tracing::info!("Initialized empty roster at {:?}", path);
                roster
            }
        };

        tracing::info!(
            members = roster.members.len(),
            categories = roster.categories.len(),
            "Loaded roster from {:?}",
            path
        );
        let dangling = roster.dangling_assignment_count();
        if dangling > 0 {
            tracing::warn!(dangling, "roster holds assignments to deleted categories or items");
        }

        Ok(Self {
            path,
            roster: RwLock::new(roster),
        })
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of the current roster.
    pub async fn snapshot(&self) -> Roster {
        self.roster.read().await.clone()
    }

    /// Run a read-only closure against the current roster.
    pub async fn read<T>(&self, f: impl FnOnce(&Roster) -> T) -> T {
        f(&*self.roster.read().await)
    }

    /// Apply a mutation and persist the result.
    ///
    /// The closure runs on a working copy; it is only swapped in after the
    /// document has been written.
    pub async fn update<T>(
        &self,
        f: impl FnOnce(&mut Roster) -> roster_core::Result<T>,
    ) -> Result<T> {
        let mut roster = self.roster.write().await;
        let mut working = roster.clone();
        let value = f(&mut working)?;
        persist(&self.path, &working).await?;
        *roster = working;
        Ok(value)
    }

    /// Re-read the document from disk, replacing the in-memory roster.
    pub async fn reload(&self) -> Result<()> {
        let mut roster = self.roster.write().await;
        *roster = load(&self.path)
            .await?
            .ok_or_else(|| Error::Storage(format!("{:?} disappeared", self.path)))?;
        tracing::info!("Reloaded roster from {:?}", self.path);
        Ok(())
    }
}

/// Read the document. `None` when the file is missing, empty or `null`.
async fn load(path: &Path) -> Result<Option<Roster>> {
    let data = match tokio::fs::read(path).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    Ok(serde_json::from_slice::<Option<Roster>>(&data)?)
}

/// Write the document to a sibling temp file, then rename it into place.
async fn persist(path: &Path, roster: &Roster) -> Result<()> {
    let data = serde_json::to_vec_pretty(roster)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, &data).await?;
    tokio::fs::rename(&tmp, path).await?;
    tracing::debug!(bytes = data.len(), "Wrote roster to {:?}", path);
    Ok(())
}
