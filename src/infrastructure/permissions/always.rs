use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::MicrophonePermissions;
use crate::domain::models::PermissionOutcome;
use crate::domain::models::PermissionsName;

/// For platforms without a microphone permission concept.
#[derive(Default)]
pub struct AlwaysGranted {}

#[async_trait]
impl MicrophonePermissions for AlwaysGranted {
    fn name(&self) -> PermissionsName {
        return PermissionsName::Always;
    }

    #[allow(clippy::implicit_return)]
    async fn check(&self) -> Result<bool> {
        return Ok(true);
    }

    #[allow(clippy::implicit_return)]
    async fn request(&self) -> Result<PermissionOutcome> {
        return Ok(PermissionOutcome::Granted);
    }
}
