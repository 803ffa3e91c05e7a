pub mod always;
pub mod prompt;

use anyhow::bail;
use anyhow::Result;

use crate::domain::models::PermissionsBox;
use crate::domain::models::PermissionsName;

pub struct PermissionsManager {}

impl PermissionsManager {
    pub fn get(name: PermissionsName) -> Result<PermissionsBox> {
        if name == PermissionsName::Always {
            return Ok(Box::<always::AlwaysGranted>::default());
        }

        if name == PermissionsName::Prompt {
            return Ok(Box::<prompt::PromptPermissions>::default());
        }

        bail!(format!("No permissions handler implemented for {name}"))
    }
}
