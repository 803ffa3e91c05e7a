#[cfg(test)]
#[path = "none_test.rs"]
mod tests;

use anyhow::anyhow;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::models::RecognitionOptions;
use crate::domain::models::Recognizer;
use crate::domain::models::RecognizerName;
use crate::domain::models::VoiceEvent;

#[derive(Default)]
pub struct NoRecognizer {}

#[async_trait]
impl Recognizer for NoRecognizer {
    fn name(&self) -> RecognizerName {
        return RecognizerName::None;
    }

    #[allow(clippy::implicit_return)]
    async fn start(
        &self,
        _options: RecognitionOptions,
        _tx: mpsc::UnboundedSender<VoiceEvent>,
    ) -> Result<()> {
        return Err(anyhow!(
            "Speech recognition is not available. Set the 'command' recognizer with a recognizer-command, or type the transaction instead"
        ));
    }

    #[allow(clippy::implicit_return)]
    async fn stop(&self) -> Result<()> {
        return Ok(());
    }

    fn is_active(&self) -> bool {
        return false;
    }
}
