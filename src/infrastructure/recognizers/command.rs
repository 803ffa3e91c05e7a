#[cfg(test)]
#[path = "command_test.rs"]
mod tests;

use std::process::Stdio;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::process::Child;
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::RecognitionEvent;
use crate::domain::models::RecognitionOptions;
use crate::domain::models::Recognizer;
use crate::domain::models::RecognizerName;
use crate::domain::models::VoiceEvent;

/// Runs an external speech to text program. Every line it prints is taken as
/// the full hypothesis so far. Exiting cleanly means the speaker finished.
pub struct CommandRecognizer {
    command: String,
    active: Arc<AtomicBool>,
    reader: Mutex<Option<JoinHandle<()>>>,
}

impl Default for CommandRecognizer {
    fn default() -> CommandRecognizer {
        return CommandRecognizer::new(&Config::get(ConfigKey::RecognizerCommand));
    }
}

impl CommandRecognizer {
    pub fn new(command: &str) -> CommandRecognizer {
        return CommandRecognizer {
            command: command.to_string(),
            active: Arc::new(AtomicBool::new(false)),
            reader: Mutex::new(None),
        };
    }

    fn spawn(&self, options: &RecognitionOptions) -> Result<Child> {
        let mut cmd = if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C");
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.arg("-c");
            cmd
        };

        let child = cmd
            .arg(&self.command)
            .env("SAVI_LANG", &options.lang)
            .env("SAVI_INTERIM_RESULTS", options.interim_results.to_string())
            .env("SAVI_MAX_ALTERNATIVES", options.max_alternatives.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        return Ok(child);
    }

    async fn read_hypotheses(
        mut child: Child,
        active: Arc<AtomicBool>,
        tx: mpsc::UnboundedSender<VoiceEvent>,
    ) {
        if let Some(stdout) = child.stdout.take() {
            let mut lines = BufReader::new(stdout).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let hypothesis = line.trim();
                        if hypothesis.is_empty() {
                            continue;
                        }
                        let event = RecognitionEvent::Result(hypothesis.to_string());
                        if tx.send(VoiceEvent::Recognition(event)).is_err() {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(err) => {
                        tracing::error!(error = ?err, "Failed to read recognizer output");
                        break;
                    }
                }
            }
        }

        let event = match child.wait().await {
            Ok(status) if status.success() => RecognitionEvent::End,
            Ok(status) => RecognitionEvent::Error(format!("Recognizer exited with {status}")),
            Err(err) => RecognitionEvent::Error(err.to_string()),
        };

        active.store(false, Ordering::SeqCst);
        let _ = tx.send(VoiceEvent::Recognition(event));
    }
}

#[async_trait]
impl Recognizer for CommandRecognizer {
    fn name(&self) -> RecognizerName {
        return RecognizerName::Command;
    }

    #[allow(clippy::implicit_return)]
    async fn start(
        &self,
        options: RecognitionOptions,
        tx: mpsc::UnboundedSender<VoiceEvent>,
    ) -> Result<()> {
        if self.command.trim().is_empty() {
            bail!("No recognizer-command is configured");
        }

        let mut reader = self.reader.lock().await;
        if self.is_active() {
            return Ok(());
        }

        let child = self.spawn(&options)?;
        tracing::debug!(command = %self.command, lang = %options.lang, "Recognizer started");

        self.active.store(true, Ordering::SeqCst);
        let _ = tx.send(VoiceEvent::Recognition(RecognitionEvent::Start));
        *reader = Some(tokio::spawn(CommandRecognizer::read_hypotheses(
            child,
            self.active.clone(),
            tx,
        )));

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn stop(&self) -> Result<()> {
        // Aborting the reader drops the child, which kills the process.
        if let Some(handle) = self.reader.lock().await.take() {
            handle.abort();
        }

        if self.active.swap(false, Ordering::SeqCst) {
            tracing::debug!("Recognizer stopped");
        }

        return Ok(());
    }

    fn is_active(&self) -> bool {
        return self.active.load(Ordering::SeqCst);
    }
}
