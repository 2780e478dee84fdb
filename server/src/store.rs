//! Owner-scoped document store for todo lists.
//!
//! # Design
//! Documents live in memory behind a single `RwLock`, in creation order. Every
//! lookup filters on the owner, so a caller can never observe another user's
//! list. Each method takes the lock once, which makes every call a single
//! atomic document operation; concurrent edits of the same list are
//! last-write-wins.
//!
//! When opened with a snapshot path, every write rewrites the whole
//! collection to that file (via a temporary file and a rename) while the
//! write lock is still held. A failed write rolls the in-memory change back.

use std::{
    io,
    path::{Path, PathBuf},
};

use chrono::Utc;
use thiserror::Error;
use tokio::{fs, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::TodoList;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read snapshot {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write snapshot {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("corrupt snapshot {path}: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to encode snapshot: {0}")]
    Encode(serde_json::Error),
}

#[derive(Debug)]
pub struct Store {
    lists: RwLock<Vec<TodoList>>,
    snapshot: Option<PathBuf>,
}

impl Store {
    /// A store that keeps nothing across restarts.
    pub fn in_memory() -> Self {
        Self {
            lists: RwLock::new(Vec::new()),
            snapshot: None,
        }
    }

    /// Opens a store backed by `path`, loading it if the file exists.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let lists = match fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(source) => return Err(StoreError::Read { path, source }),
        };
        info!(path = %path.display(), lists = lists.len(), "opened todo store");
        Ok(Self {
            lists: RwLock::new(lists),
            snapshot: Some(path),
        })
    }

    /// Flushes the collection to its snapshot file, if it has one.
    pub async fn close(&self) -> Result<(), StoreError> {
        let lists = self.lists.write().await;
        if let Some(path) = &self.snapshot {
            write_snapshot(path, &lists).await?;
            info!(path = %path.display(), "closed todo store");
        }
        Ok(())
    }

    /// All lists owned by `owner`, newest first.
    pub async fn find(&self, owner: Uuid) -> Vec<TodoList> {
        let lists = self.lists.read().await;
        lists
            .iter()
            .rev()
            .filter(|list| list.is_owned_by(owner))
            .cloned()
            .collect()
    }

    pub async fn find_one(&self, owner: Uuid, id: Uuid) -> Option<TodoList> {
        let lists = self.lists.read().await;
        lists
            .iter()
            .find(|list| list.id == id && list.is_owned_by(owner))
            .cloned()
    }

    /// Inserts a new document.
    pub async fn save(&self, list: TodoList) -> Result<TodoList, StoreError> {
        let mut lists = self.lists.write().await;
        lists.push(list.clone());
        if let Err(e) = self.persist(&lists).await {
            lists.pop();
            return Err(e);
        }
        debug!(list = %list.id, "saved todo list");
        Ok(list)
    }

    /// Applies `update` to the owned list `id` and stamps `updated_at`.
    ///
    /// Returns `Ok(None)` when no such list is owned by `owner`. If `update`
    /// fails the stored document is left exactly as it was.
    pub async fn find_one_and_update<F, E>(
        &self,
        owner: Uuid,
        id: Uuid,
        update: F,
    ) -> Result<Option<TodoList>, E>
    where
        F: FnOnce(&mut TodoList) -> Result<(), E>,
        E: From<StoreError>,
    {
        let mut lists = self.lists.write().await;
        let Some(index) = position(&lists, owner, id) else {
            return Ok(None);
        };

        let mut updated = lists[index].clone();
        update(&mut updated)?;
        updated.updated_at = Utc::now();

        let previous = std::mem::replace(&mut lists[index], updated.clone());
        if let Err(e) = self.persist(&lists).await {
            lists[index] = previous;
            return Err(e.into());
        }
        debug!(list = %id, "updated todo list");
        Ok(Some(updated))
    }

    /// Removes the owned list `id` together with its items.
    pub async fn find_one_and_delete(
        &self,
        owner: Uuid,
        id: Uuid,
    ) -> Result<Option<TodoList>, StoreError> {
        let mut lists = self.lists.write().await;
        let Some(index) = position(&lists, owner, id) else {
            return Ok(None);
        };

        let removed = lists.remove(index);
        if let Err(e) = self.persist(&lists).await {
            lists.insert(index, removed);
            return Err(e);
        }
        debug!(list = %id, "deleted todo list");
        Ok(Some(removed))
    }

    async fn persist(&self, lists: &[TodoList]) -> Result<(), StoreError> {
        match &self.snapshot {
            Some(path) => write_snapshot(path, lists).await,
            None => Ok(()),
        }
    }
}

fn position(lists: &[TodoList], owner: Uuid, id: Uuid) -> Option<usize> {
    lists
        .iter()
        .position(|list| list.id == id && list.is_owned_by(owner))
}

async fn write_snapshot(path: &Path, lists: &[TodoList]) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(lists).map_err(StoreError::Encode)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)
        .await
        .map_err(|source| StoreError::Write {
            path: tmp.clone(),
            source,
        })?;
    fs::rename(&tmp, path)
        .await
        .map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })
}
