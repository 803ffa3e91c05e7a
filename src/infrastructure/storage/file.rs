#[cfg(test)]
#[path = "file_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Storage;

/// Stores each record as `<name>.json` inside the state directory.
pub struct FileStorage {
    pub state_dir: path::PathBuf,
}

impl Default for FileStorage {
    fn default() -> FileStorage {
        return FileStorage::new(path::PathBuf::from(Config::get(ConfigKey::StateDir)));
    }
}

impl FileStorage {
    pub fn new(state_dir: path::PathBuf) -> FileStorage {
        return FileStorage { state_dir };
    }

    fn get_file_path(&self, name: &str) -> path::PathBuf {
        return self.state_dir.join(format!("{name}.json"));
    }

    fn get_tmp_file_path(&self, name: &str) -> path::PathBuf {
        return self.state_dir.join(format!("{name}.json.tmp"));
    }
}

#[async_trait]
impl Storage for FileStorage {
    #[allow(clippy::implicit_return)]
    async fn read(&self, name: &str) -> Result<Option<String>> {
        let file_path = self.get_file_path(name);
        if !file_path.exists() {
            return Ok(None);
        }

        let payload = fs::read_to_string(file_path).await?;
        return Ok(Some(payload));
    }

    #[allow(clippy::implicit_return)]
    async fn write(&self, name: &str, payload: &str) -> Result<()> {
        if !self.state_dir.exists() {
            fs::create_dir_all(&self.state_dir).await?;
        }

        // A record is replaced whole, a crash mid-write leaves the old one.
        let tmp_path = self.get_tmp_file_path(name);
        let mut file = fs::File::create(&tmp_path).await?;
        file.write_all(payload.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&tmp_path, self.get_file_path(name)).await?;

        return Ok(());
    }
}
