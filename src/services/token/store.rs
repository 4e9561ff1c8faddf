//! External token storage observed by [`super::TokenSync`].
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("token store io error: {0}")]
    Io(#[from] io::Error),
}

/// Where the current token lives outside the process (a file, a shared slot, ...).
#[async_trait]
pub trait TokenStore: Send + Sync + 'static {
    fn store_name(&self) -> &'static str;

    // Current token; `None` when nothing is stored.
    async fn load(&self) -> Result<Option<String>, TokenStoreError>;

    // Push notifications, when the store supports them. `None` means poll only.
    fn changes(&self) -> Option<watch::Receiver<Option<String>>> {
        None
    }
}

/// In-process store with change notifications.
#[derive(Debug)]
pub struct MemoryTokenStore {
    tx: watch::Sender<Option<String>>,
}

impl Default for MemoryTokenStore {
    fn default() -> Self {
        Self::new(None)
    }
}

impl MemoryTokenStore {
    pub fn new(initial: Option<String>) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn set(&self, token: Option<String>) {
        self.tx.send_replace(token);
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    fn store_name(&self) -> &'static str {
        "memory"
    }

    async fn load(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.tx.borrow().clone())
    }

    fn changes(&self) -> Option<watch::Receiver<Option<String>>> {
        Some(self.tx.subscribe())
    }
}

/// Token kept in a plain file (trimmed). Missing file means no token.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    fn store_name(&self) -> &'static str {
        "file"
    }

    async fn load(&self) -> Result<Option<String>, TokenStoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => {
                let token = raw.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
