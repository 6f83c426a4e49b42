//! Background model loading
//!
//! Import runs on a tokio blocking thread; the UI thread polls for the result once per frame.

use std::path::{Path, PathBuf};

use tokio::sync::oneshot;

use super::loader;
use crate::model::LoadedModel;

type LoadResult = Result<LoadedModel, String>;

struct PendingLoad {
    path: PathBuf,
    receiver: oneshot::Receiver<LoadResult>,
}

/// Loads one model at a time; a new request supersedes the pending one.
pub struct ModelLoader {
    runtime: tokio::runtime::Runtime,
    pending: Option<PendingLoad>,
}

impl ModelLoader {
    pub fn new() -> Result<Self, String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("model-loader")
            .enable_all()
            .build()
            .map_err(|e| format!("Failed to start loader runtime: {e}"))?;
        Ok(Self {
            runtime,
            pending: None,
        })
    }

    /// Start loading `path` in the background
    pub fn request(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        let (tx, rx) = oneshot::channel();
        let task_path = path.clone();
        self.runtime.spawn_blocking(move || {
            let result = loader::load_path(&task_path);
            // Receiver is gone when the request was superseded
            let _ = tx.send(result);
        });
        if let Some(old) = self.pending.replace(PendingLoad { path, receiver: rx }) {
            tracing::debug!("Superseding pending load of {}", old.path.display());
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Path currently being loaded
    pub fn pending_path(&self) -> Option<&Path> {
        self.pending.as_ref().map(|p| p.path.as_path())
    }

    /// Non-blocking check for a finished load
    pub fn poll(&mut self) -> Option<LoadResult> {
        let pending = self.pending.as_mut()?;
        match pending.receiver.try_recv() {
            Ok(result) => {
                self.pending = None;
                Some(result)
            }
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => {
                self.pending = None;
                Some(Err("Model loading task ended without a result".to_string()))
            }
        }
    }

    /// Block until the pending load finishes. `None` when nothing is pending.
    pub fn wait(&mut self) -> Option<LoadResult> {
        let pending = self.pending.take()?;
        Some(
            self.runtime
                .block_on(pending.receiver)
                .unwrap_or_else(|_| Err("Model loading task ended without a result".to_string())),
        )
    }
}
