#[cfg(test)]
#[path = "voice_capture_test.rs"]
mod tests;

use std::time::Duration;

use tokio::sync::mpsc;

use super::ListenTimer;
use super::LISTEN_TIMEOUT;
use crate::domain::models::Event;
use crate::domain::models::Notification;
use crate::domain::models::Permission;
use crate::domain::models::PermissionsBox;
use crate::domain::models::Phase;
use crate::domain::models::RecognitionEvent;
use crate::domain::models::RecognitionOptions;
use crate::domain::models::RecognizerBox;
use crate::domain::models::RequestError;
use crate::domain::models::SubmitterArc;
use crate::domain::models::VoiceError;
use crate::domain::models::VoiceEvent;

enum State {
    Idle,
    CheckingPermission,
    PermissionDenied,
    Listening(ListenTimer),
    Stopped,
    /// Holds the transcript as it was when the submission went out.
    Submitting(String),
}

impl State {
    fn phase(&self) -> Phase {
        match self {
            State::Idle => return Phase::Idle,
            State::CheckingPermission => return Phase::CheckingPermission,
            State::PermissionDenied => return Phase::PermissionDenied,
            State::Listening(_) => return Phase::Listening,
            State::Stopped => return Phase::Stopped,
            State::Submitting(_) => return Phase::Submitting,
        }
    }
}

/// Drives the quick add screen: microphone permission, the recognition
/// session, the no-speech timeout and handing the transcript to the
/// submitter. The owner feeds every `VoiceEvent` back through `handle`, in
/// the order they arrive.
pub struct VoiceCapture {
    state: State,
    transcript: String,
    permission: Permission,
    options: RecognitionOptions,
    timeout: Duration,
    generation: u64,
    torn_down: bool,
    recognizer: RecognizerBox,
    permissions: PermissionsBox,
    submitter: SubmitterArc,
    voice_tx: mpsc::UnboundedSender<VoiceEvent>,
    events_tx: mpsc::UnboundedSender<Event>,
}

impl VoiceCapture {
    pub fn new(
        recognizer: RecognizerBox,
        permissions: PermissionsBox,
        submitter: SubmitterArc,
        options: RecognitionOptions,
        voice_tx: mpsc::UnboundedSender<VoiceEvent>,
        events_tx: mpsc::UnboundedSender<Event>,
    ) -> VoiceCapture {
        return VoiceCapture {
            state: State::Idle,
            transcript: "".to_string(),
            permission: Permission::Unknown,
            options,
            timeout: LISTEN_TIMEOUT,
            generation: 0,
            torn_down: false,
            recognizer,
            permissions,
            submitter,
            voice_tx,
            events_tx,
        };
    }

    pub fn phase(&self) -> Phase {
        return self.state.phase();
    }

    pub fn transcript(&self) -> &str {
        return &self.transcript;
    }

    pub fn permission(&self) -> Permission {
        return self.permission;
    }

    pub fn is_timer_armed(&self) -> bool {
        return matches!(self.state, State::Listening(_));
    }

    /// First look at the microphone when the screen opens. Never prompts.
    pub async fn mount(&mut self) {
        if self.torn_down {
            return;
        }

        self.set_state(State::CheckingPermission);
        let granted = match self.permissions.check().await {
            Ok(granted) => granted,
            Err(err) => {
                tracing::error!(error = ?err, "Failed to check microphone permission");
                false
            }
        };

        if granted {
            self.permission = Permission::Granted;
            self.set_state(State::Idle);
        } else {
            self.permission = Permission::Denied;
            self.set_state(State::PermissionDenied);
        }
    }

    pub async fn start(&mut self) {
        if self.torn_down {
            return;
        }

        let listening = match self.state {
            State::Submitting(_) | State::CheckingPermission => return,
            State::Listening(_) => true,
            _ => false,
        };

        // While listening the phase stays put so the live timer is kept.
        if !listening {
            self.set_state(State::CheckingPermission);
        }

        self.permission = self.ensure_permission().await;
        if let Some(err) = VoiceError::from_permission(self.permission) {
            if listening {
                self.stop_engine().await;
            }
            self.set_state(State::PermissionDenied);
            self.notify(Notification::from(&err));
            return;
        }

        if listening {
            tracing::debug!("Already listening, engine left running");
            return;
        }

        if !self.recognizer.is_active() {
            let options = self.options.clone();
            if let Err(err) = self
                .recognizer
                .start(options, self.voice_tx.clone())
                .await
            {
                tracing::error!(error = ?err, "Failed to start speech recognition");
                self.set_state(State::Stopped);
                self.notify(Notification::from(&VoiceError::Recognition(
                    err.to_string(),
                )));
                return;
            }
        }

        let timer = self.arm_timer();
        self.set_state(State::Listening(timer));
    }

    /// The user pressed stop.
    pub async fn stop(&mut self) {
        if self.torn_down || !self.is_timer_armed() {
            return;
        }

        self.stop_listening().await;
    }

    /// Re-prompts for the microphone after a denial.
    pub async fn grant(&mut self) {
        if self.torn_down || self.phase() != Phase::PermissionDenied {
            return;
        }

        self.permission = self.ensure_permission().await;
        match self.permission {
            Permission::Granted => {
                self.set_state(State::Idle);
                self.notify(Notification::success("Microphone permission granted!"));
            }
            Permission::DeniedPermanently => {
                self.notify(Notification::from(&VoiceError::PermissionDeniedPermanently));
            }
            _ => {
                self.notify(Notification::error("Microphone permission denied", None));
            }
        }
    }

    /// Replaces the transcript with typed text. Refused while the microphone
    /// owns the field or a submission is out.
    pub fn edit_transcript(&mut self, text: &str) -> bool {
        if self.torn_down {
            return false;
        }

        if matches!(self.state, State::Listening(_) | State::Submitting(_)) {
            return false;
        }

        self.set_transcript(text);
        return true;
    }

    /// Hands the transcript to the submitter. Returns false when the request
    /// was rejected (nothing to send, or a submission already in flight).
    pub async fn submit(&mut self) -> bool {
        if self.torn_down {
            return false;
        }

        if matches!(self.state, State::Submitting(_)) {
            tracing::debug!("Submission already in flight");
            return false;
        }

        if self.transcript.trim().is_empty() {
            return false;
        }

        if self.is_timer_armed() {
            self.stop_listening().await;
        }

        let snapshot = self.transcript.clone();
        self.set_state(State::Submitting(snapshot.clone()));

        let submitter = self.submitter.clone();
        let tx = self.voice_tx.clone();
        tokio::spawn(async move {
            let res = submitter.submit(&snapshot).await;
            let _ = tx.send(VoiceEvent::SubmissionFinished(res));
        });

        return true;
    }

    pub async fn handle(&mut self, event: VoiceEvent) {
        if self.torn_down {
            tracing::debug!(event = ?event, "Event after teardown ignored");
            return;
        }

        match event {
            VoiceEvent::Recognition(RecognitionEvent::Start) => {
                tracing::debug!("Recognition started");
            }
            VoiceEvent::Recognition(RecognitionEvent::Result(text)) => {
                self.on_result(&text);
            }
            VoiceEvent::Recognition(RecognitionEvent::End) => {
                if self.is_timer_armed() {
                    self.stop_listening().await;
                }
            }
            VoiceEvent::Recognition(RecognitionEvent::Error(message)) => {
                self.on_engine_error(&message).await;
            }
            VoiceEvent::ListenTimeout(generation) => {
                self.on_timeout(generation).await;
            }
            VoiceEvent::SubmissionFinished(res) => {
                self.on_submission_finished(res);
            }
        }
    }

    /// Leaves the screen. Always commands the engine to stop.
    pub async fn teardown(&mut self) {
        if self.torn_down {
            return;
        }

        self.torn_down = true;
        // Replacing the state drops any live timer.
        self.state = State::Stopped;
        self.stop_engine().await;
        tracing::debug!("Voice capture torn down");
    }

    fn on_result(&mut self, text: &str) {
        if !self.is_timer_armed() {
            tracing::debug!(phase = %self.state.phase(), "Result outside listening ignored");
            return;
        }

        self.set_transcript(text);
    }

    async fn on_engine_error(&mut self, message: &str) {
        match self.state {
            State::Listening(_) => self.stop_listening().await,
            State::Stopped => {}
            _ => {
                tracing::warn!(phase = %self.state.phase(), reason = %message, "Engine error");
            }
        }

        self.notify(Notification::from(&VoiceError::Recognition(
            message.to_string(),
        )));
    }

    async fn on_timeout(&mut self, generation: u64) {
        let live = match &self.state {
            State::Listening(timer) => timer.generation() == generation,
            _ => false,
        };
        if !live {
            tracing::debug!(generation = generation, "Stale listen timeout ignored");
            return;
        }

        self.stop_listening().await;
        self.notify(Notification::from(&VoiceError::NoSpeechTimeout));
    }

    fn on_submission_finished(&mut self, res: Result<(), RequestError>) {
        let snapshot = match &self.state {
            State::Submitting(snapshot) => snapshot.clone(),
            _ => {
                tracing::warn!("Submission result without a submission in flight");
                return;
            }
        };

        match res {
            Ok(()) => {
                tracing::debug!(transcript = %snapshot, "Submission succeeded");
                self.set_transcript("");
                self.notify(Notification::success("Created from voice"));
            }
            Err(err) => {
                self.notify(Notification::request_failed("Create failed", &err));
            }
        }

        self.set_state(State::Stopped);
    }

    async fn ensure_permission(&self) -> Permission {
        match self.permissions.check().await {
            Ok(true) => return Permission::Granted,
            Ok(false) => {}
            Err(err) => {
                tracing::error!(error = ?err, "Failed to check microphone permission");
            }
        }

        match self.permissions.request().await {
            Ok(outcome) => return Permission::from(outcome),
            Err(err) => {
                tracing::error!(error = ?err, "Failed to request microphone permission");
                return Permission::Denied;
            }
        }
    }

    fn arm_timer(&mut self) -> ListenTimer {
        self.generation += 1;
        return ListenTimer::arm(self.generation, self.timeout, self.voice_tx.clone());
    }

    async fn stop_listening(&mut self) {
        self.set_state(State::Stopped);
        self.stop_engine().await;
    }

    async fn stop_engine(&self) {
        if let Err(err) = self.recognizer.stop().await {
            tracing::error!(error = ?err, "Failed to stop speech recognition");
        }
    }

    fn set_state(&mut self, state: State) {
        let previous = self.state.phase();
        self.state = state;

        let phase = self.state.phase();
        if previous != phase {
            tracing::debug!(from = %previous, to = %phase, "Voice capture transition");
            let _ = self.events_tx.send(Event::PhaseChanged(phase));
        }
    }

    fn set_transcript(&mut self, text: &str) {
        if self.transcript == text {
            return;
        }

        self.transcript = text.to_string();
        let _ = self
            .events_tx
            .send(Event::TranscriptChanged(self.transcript.clone()));
    }

    fn notify(&self, notification: Notification) {
        tracing::debug!(title = %notification.title, "Notify");
        let _ = self.events_tx.send(Event::Notification(notification));
    }
}
