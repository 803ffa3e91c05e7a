use anyhow::Result;
use async_trait::async_trait;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

use super::PermissionOutcome;

pub type PermissionsBox = Box<dyn MicrophonePermissions + Send + Sync>;

#[derive(Clone, Debug, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum PermissionsName {
    Always,
    Prompt,
}

impl PermissionsName {
    pub fn parse(text: &str) -> Option<PermissionsName> {
        return PermissionsName::iter().find(|e| return e.to_string() == text);
    }
}

#[async_trait]
pub trait MicrophonePermissions {
    fn name(&self) -> PermissionsName;

    /// Reports whether access is already granted, without prompting.
    async fn check(&self) -> Result<bool>;

    /// Shows the platform prompt.
    async fn request(&self) -> Result<PermissionOutcome>;
}
