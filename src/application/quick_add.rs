#[cfg(test)]
#[path = "quick_add_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::anyhow;
use anyhow::Result;
use tokio::io::AsyncBufRead;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::io::Lines;
use tokio::sync::mpsc;
use tokio::sync::watch;
use yansi::Paint;

use super::toast;
use super::App;
use super::Screen;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Area;
use crate::domain::models::Event;
use crate::domain::models::PermissionsName;
use crate::domain::models::Phase;
use crate::domain::models::RecognitionOptions;
use crate::domain::models::RecognizerName;
use crate::domain::models::Session;
use crate::domain::models::SubmitterArc;
use crate::domain::models::VoiceEvent;
use crate::domain::services::HydrationGate;
use crate::domain::services::Submissions;
use crate::domain::services::VoiceCapture;
use crate::infrastructure::permissions::PermissionsManager;
use crate::infrastructure::recognizers::RecognizerManager;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuickAddCommand {
    Start,
    Stop,
    Send,
    Grant,
    Help,
    Quit,
    /// Anything that is not a command replaces the transcript.
    Text(String),
}

impl QuickAddCommand {
    pub fn parse(line: &str) -> QuickAddCommand {
        let line = line.trim();
        match line {
            "/start" | "/s" => return QuickAddCommand::Start,
            "/stop" | "/x" => return QuickAddCommand::Stop,
            "/send" | "" => return QuickAddCommand::Send,
            "/grant" => return QuickAddCommand::Grant,
            "/help" | "/h" => return QuickAddCommand::Help,
            "/quit" | "/q" | "exit" => return QuickAddCommand::Quit,
            _ => return QuickAddCommand::Text(line.to_string()),
        }
    }
}

pub fn help_text() -> String {
    return r#"
COMMANDS:
- /start (/s) - Start listening. Say something like "mua cà phê 20000".
- /stop (/x) - Stop listening.
- /send - Create the transaction from the transcript. An empty line does the same.
- /grant - Ask for microphone access again.
- /help (/h) - Show this message.
- /quit (/q) - Leave quick add.

Any other text replaces the transcript.
"#
    .trim()
    .to_string();
}

pub fn describe_phase(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => return "Ready. /start to speak, or type the transaction.",
        Phase::CheckingPermission => return "Checking microphone access...",
        Phase::PermissionDenied => {
            return "Microphone access is off. /grant to ask again, or type the transaction."
        }
        Phase::Listening => return "Listening... /stop when you are done.",
        Phase::Stopped => return "Stopped. /send to create, /start to speak again.",
        Phase::Submitting => return "Creating transaction...",
    }
}

fn render_event(event: Event) {
    match event {
        Event::Notification(notification) => toast::show(&notification),
        Event::PhaseChanged(phase) => {
            println!("{}", Paint::new(describe_phase(phase)).dimmed());
        }
        Event::TranscriptChanged(transcript) => {
            if transcript.is_empty() {
                return;
            }
            println!("{} {}", Paint::cyan("›"), transcript);
        }
    }
}

fn drain_events<F: FnMut(Event)>(events_rx: &mut mpsc::UnboundedReceiver<Event>, render: &mut F) {
    while let Ok(event) = events_rx.try_recv() {
        render(event);
    }
}

async fn run_command(capture: &mut VoiceCapture, command: QuickAddCommand) -> bool {
    match command {
        QuickAddCommand::Start => capture.start().await,
        QuickAddCommand::Stop => capture.stop().await,
        QuickAddCommand::Send => {
            let in_flight = capture.phase() == Phase::Submitting;
            if !capture.submit().await {
                println!("{}", Paint::yellow(send_rejection(in_flight)));
            }
        }
        QuickAddCommand::Grant => capture.grant().await,
        QuickAddCommand::Help => println!("{}", help_text()),
        QuickAddCommand::Quit => return false,
        QuickAddCommand::Text(text) => {
            if !capture.edit_transcript(&text) {
                println!("{}", Paint::yellow("The transcript can't be edited right now"));
            }
        }
    }

    return true;
}

pub fn send_rejection(in_flight: bool) -> &'static str {
    if in_flight {
        return "A transaction is already being created";
    }

    return "Nothing to send yet";
}

/// Feeds terminal lines, engine events and session changes into the capture
/// until the user quits, input ends or the session is lost. A submission
/// still out when the session is lost is waited for, so its outcome is
/// always reported before teardown.
pub async fn drive<R, F>(
    capture: &mut VoiceCapture,
    lines: &mut Lines<R>,
    voice_rx: &mut mpsc::UnboundedReceiver<VoiceEvent>,
    events_rx: &mut mpsc::UnboundedReceiver<Event>,
    session_rx: &mut watch::Receiver<Session>,
    mut render: F,
) -> Result<Option<Screen>>
where
    R: AsyncBufRead + Unpin,
    F: FnMut(Event),
{
    let mut next = None;
    loop {
        drain_events(events_rx, &mut render);

        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        if !run_command(capture, QuickAddCommand::parse(&line)).await {
                            break;
                        }
                    }
                    None => break,
                }
            }
            Some(event) = voice_rx.recv() => {
                capture.handle(event).await;
            }
            res = HydrationGate::watch(session_rx, Area::Authenticated) => {
                // The only way out of the authenticated area from here is a
                // forced logout.
                if let Ok(route) = res {
                    next = Some(Screen::from(route));
                }
                break;
            }
        }
    }

    while let Ok(event) = voice_rx.try_recv() {
        capture.handle(event).await;
    }
    while capture.phase() == Phase::Submitting {
        match voice_rx.recv().await {
            Some(event) => capture.handle(event).await,
            None => break,
        }
    }

    capture.teardown().await;
    drain_events(events_rx, &mut render);

    return Ok(next);
}

/// The interactive quick add screen. Owns the voice capture and feeds it
/// terminal input, engine events and session changes from one loop.
pub async fn run(app: &App) -> Result<Option<Screen>> {
    let recognizer_name = RecognizerName::parse(&Config::get(ConfigKey::Recognizer))
        .ok_or_else(|| return anyhow!("Unknown recognizer"))?;
    let permissions_name = PermissionsName::parse(&Config::get(ConfigKey::Permissions))
        .ok_or_else(|| return anyhow!("Unknown permissions handler"))?;

    let (voice_tx, mut voice_rx) = mpsc::unbounded_channel::<VoiceEvent>();
    let (events_tx, mut events_rx) = mpsc::unbounded_channel::<Event>();
    let submitter: SubmitterArc = Arc::new(Submissions::new(app.api.clone(), app.cache.clone()));

    let mut capture = VoiceCapture::new(
        RecognizerManager::get(recognizer_name)?,
        PermissionsManager::get(permissions_name)?,
        submitter,
        RecognitionOptions::new(&Config::get(ConfigKey::Language)),
        voice_tx,
        events_tx,
    );

    let mut session_rx = app.session.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", help_text());
    capture.mount().await;

    return drive(
        &mut capture,
        &mut lines,
        &mut voice_rx,
        &mut events_rx,
        &mut session_rx,
        render_event,
    )
    .await;
}
