#[cfg(test)]
#[path = "voice_test.rs"]
mod tests;

use serde::Deserialize;
use serde::Serialize;

use super::RequestError;

/// Named states of the quick add voice capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Phase {
    Idle,
    CheckingPermission,
    PermissionDenied,
    Listening,
    Stopped,
    Submitting,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Permission {
    Unknown,
    Granted,
    Denied,
    DeniedPermanently,
}

/// Answer from the platform microphone prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermissionOutcome {
    Granted,
    Denied,
    /// The user asked never to be prompted again. Only the system settings can
    /// lift this.
    DeniedPermanently,
}

impl From<PermissionOutcome> for Permission {
    fn from(outcome: PermissionOutcome) -> Permission {
        match outcome {
            PermissionOutcome::Granted => return Permission::Granted,
            PermissionOutcome::Denied => return Permission::Denied,
            PermissionOutcome::DeniedPermanently => return Permission::DeniedPermanently,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecognitionOptions {
    pub lang: String,
    pub interim_results: bool,
    pub requires_on_device_recognition: bool,
    pub max_alternatives: u8,
}

impl RecognitionOptions {
    pub fn new(lang: &str) -> RecognitionOptions {
        return RecognitionOptions {
            lang: lang.to_string(),
            interim_results: true,
            requires_on_device_recognition: false,
            max_alternatives: 1,
        };
    }
}

/// Callbacks from a speech recognition engine, in emission order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecognitionEvent {
    Start,
    /// The engine's current best guess for everything heard so far.
    Result(String),
    End,
    Error(String),
}

/// Everything the voice capture reacts to besides direct user actions.
#[derive(Clone, Debug, PartialEq)]
pub enum VoiceEvent {
    Recognition(RecognitionEvent),
    /// Carries the generation of the timer that fired so stale timers can be
    /// told apart from the live one.
    ListenTimeout(u64),
    SubmissionFinished(Result<(), RequestError>),
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum VoiceError {
    #[error("Mic permission denied")]
    PermissionDenied,
    #[error("Microphone permission denied permanently")]
    PermissionDeniedPermanently,
    #[error("{0}")]
    Recognition(String),
    #[error("No speech detected")]
    NoSpeechTimeout,
}

impl VoiceError {
    pub fn from_permission(permission: Permission) -> Option<VoiceError> {
        match permission {
            Permission::Denied | Permission::Unknown => return Some(VoiceError::PermissionDenied),
            Permission::DeniedPermanently => return Some(VoiceError::PermissionDeniedPermanently),
            Permission::Granted => return None,
        }
    }
}
