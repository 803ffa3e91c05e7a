#[cfg(test)]
#[path = "prompt_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use async_trait::async_trait;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;
use serde::Deserialize;
use serde::Serialize;
use tokio::fs;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::MicrophonePermissions;
use crate::domain::models::PermissionOutcome;
use crate::domain::models::PermissionsName;

const DECISION_FILE: &str = "microphone-permission.json";

#[derive(Debug, Serialize, Deserialize)]
struct Decision {
    outcome: PermissionOutcome,
}

/// Asks on the terminal and remembers the answer in the state directory,
/// the way a mobile OS remembers a permission dialog.
pub struct PromptPermissions {
    state_dir: path::PathBuf,
}

impl Default for PromptPermissions {
    fn default() -> PromptPermissions {
        return PromptPermissions::new(path::PathBuf::from(Config::get(ConfigKey::StateDir)));
    }
}

impl PromptPermissions {
    pub fn new(state_dir: path::PathBuf) -> PromptPermissions {
        return PromptPermissions { state_dir };
    }

    fn decision_path(&self) -> path::PathBuf {
        return self.state_dir.join(DECISION_FILE);
    }

    async fn recorded(&self) -> Result<Option<PermissionOutcome>> {
        let file_path = self.decision_path();
        if !file_path.exists() {
            return Ok(None);
        }

        let payload = fs::read_to_string(file_path).await?;
        let decision = serde_json::from_str::<Decision>(&payload)?;
        return Ok(Some(decision.outcome));
    }

    async fn record(&self, outcome: PermissionOutcome) -> Result<()> {
        if !self.state_dir.exists() {
            fs::create_dir_all(&self.state_dir).await?;
        }

        let payload = serde_json::to_string(&Decision { outcome })?;
        fs::write(self.decision_path(), payload).await?;
        return Ok(());
    }

    fn ask() -> Result<PermissionOutcome> {
        let choices = ["Allow", "Deny", "Deny and don't ask again"];
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Allow Savi to use the microphone?")
            .items(&choices)
            .default(0)
            .interact_opt()?;

        match selection {
            Some(0) => return Ok(PermissionOutcome::Granted),
            Some(2) => return Ok(PermissionOutcome::DeniedPermanently),
            _ => return Ok(PermissionOutcome::Denied),
        }
    }
}

#[async_trait]
impl MicrophonePermissions for PromptPermissions {
    fn name(&self) -> PermissionsName {
        return PermissionsName::Prompt;
    }

    #[allow(clippy::implicit_return)]
    async fn check(&self) -> Result<bool> {
        return Ok(self.recorded().await? == Some(PermissionOutcome::Granted));
    }

    #[allow(clippy::implicit_return)]
    async fn request(&self) -> Result<PermissionOutcome> {
        match self.recorded().await? {
            Some(PermissionOutcome::Granted) => return Ok(PermissionOutcome::Granted),
            // Only the system settings lift a permanent denial.
            Some(PermissionOutcome::DeniedPermanently) => {
                return Ok(PermissionOutcome::DeniedPermanently);
            }
            _ => {}
        }

        let outcome = tokio::task::spawn_blocking(PromptPermissions::ask).await??;
        tracing::debug!(outcome = ?outcome, "Microphone prompt answered");
        self.record(outcome).await?;

        return Ok(outcome);
    }
}
