use anyhow::Result;
use async_trait::async_trait;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use tokio::sync::mpsc;

use super::RecognitionOptions;
use super::VoiceEvent;

pub type RecognizerBox = Box<dyn Recognizer + Send + Sync>;

#[derive(Clone, Debug, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum RecognizerName {
    Command,
    None,
}

impl RecognizerName {
    pub fn parse(text: &str) -> Option<RecognizerName> {
        return RecognizerName::iter().find(|e| return e.to_string() == text);
    }
}

/// A speech recognition engine.
#[async_trait]
pub trait Recognizer {
    fn name(&self) -> RecognizerName;

    /// Opens the microphone. Engine callbacks are delivered in order through
    /// `tx` as `VoiceEvent::Recognition`, ending with either an `End` or an
    /// `Error`.
    async fn start(
        &self,
        options: RecognitionOptions,
        tx: mpsc::UnboundedSender<VoiceEvent>,
    ) -> Result<()>;

    /// Closes the microphone. Safe to call when nothing is running.
    async fn stop(&self) -> Result<()>;

    /// Whether the engine is currently capturing.
    fn is_active(&self) -> bool;
}
