use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::models::VoiceEvent;

pub const LISTEN_TIMEOUT: Duration = Duration::from_secs(10);

/// Owned handle to the pending no-speech timeout, armed once when listening
/// begins. Dropping it cancels the timer, so it only lives as long as the
/// Listening phase holding it.
pub struct ListenTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

impl ListenTimer {
    pub fn arm(
        generation: u64,
        after: Duration,
        tx: mpsc::UnboundedSender<VoiceEvent>,
    ) -> ListenTimer {
        let deadline = tokio::time::Instant::now() + after;
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let _ = tx.send(VoiceEvent::ListenTimeout(generation));
        });

        return ListenTimer { generation, handle };
    }

    pub fn generation(&self) -> u64 {
        return self.generation;
    }
}

impl Drop for ListenTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
