use super::RequestError;
use super::VoiceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

/// A short lived message for the user, the terminal version of a toast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub body: Option<String>,
}

impl Notification {
    pub fn new(kind: NotificationKind, title: &str, body: Option<&str>) -> Notification {
        return Notification {
            kind,
            title: title.to_string(),
            body: body
                .filter(|e| return !e.is_empty())
                .map(|e| return e.to_string()),
        };
    }

    pub fn info(title: &str, body: Option<&str>) -> Notification {
        return Notification::new(NotificationKind::Info, title, body);
    }

    pub fn success(title: &str) -> Notification {
        return Notification::new(NotificationKind::Success, title, None);
    }

    pub fn error(title: &str, body: Option<&str>) -> Notification {
        return Notification::new(NotificationKind::Error, title, body);
    }

    pub fn request_failed(title: &str, err: &RequestError) -> Notification {
        return Notification::error(title, Some(&err.message));
    }
}

impl From<&VoiceError> for Notification {
    fn from(err: &VoiceError) -> Notification {
        match err {
            VoiceError::PermissionDenied => {
                return Notification::error("Mic permission denied", None);
            }
            VoiceError::PermissionDeniedPermanently => {
                return Notification::error(
                    "Microphone permission denied permanently",
                    Some("Open the system settings and allow microphone access for Savi"),
                );
            }
            VoiceError::Recognition(message) => {
                let mut body = message.as_str();
                if body.is_empty() {
                    body = "Speech recognition failed";
                }
                return Notification::error("Mic error", Some(body));
            }
            VoiceError::NoSpeechTimeout => {
                return Notification::info(
                    "No speech detected",
                    Some("Please try speaking louder or closer to the microphone"),
                );
            }
        }
    }
}
