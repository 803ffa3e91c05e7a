use super::Notification;
use super::Phase;

/// Updates pushed from the voice capture to whatever renders it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Notification(Notification),
    PhaseChanged(Phase),
    TranscriptChanged(String),
}
