use anyhow::Result;
use async_trait::async_trait;

pub type StorageBox = Box<dyn Storage + Send + Sync>;

/// Durable key/value records surviving process restarts.
#[async_trait]
pub trait Storage {
    /// Returns `None` when no record has been written under `name` yet.
    async fn read(&self, name: &str) -> Result<Option<String>>;

    async fn write(&self, name: &str, payload: &str) -> Result<()>;
}
