#[cfg(test)]
#[path = "session_store_test.rs"]
mod tests;

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::oneshot;
use tokio::sync::watch;

use crate::domain::models::Credentials;
use crate::domain::models::PersistedSession;
use crate::domain::models::Session;
use crate::domain::models::StorageBox;
use crate::domain::models::User;
use crate::domain::models::SESSION_RECORD;

enum PersistCommand {
    Write(PersistedSession),
    Flush(oneshot::Sender<()>),
}

/// Single owner of who is signed in. Readers either take a copy of the
/// current session or subscribe to changes; all writes go through here.
pub struct SessionStore {
    state: watch::Sender<Session>,
    storage: Arc<StorageBox>,
    persist_tx: mpsc::UnboundedSender<PersistCommand>,
    hydration_started: AtomicBool,
}

impl SessionStore {
    /// Must be called from within a tokio runtime, the durable writer runs as
    /// a background task.
    pub fn new(storage: StorageBox) -> Arc<SessionStore> {
        let storage = Arc::new(storage);
        let (persist_tx, persist_rx) = mpsc::unbounded_channel::<PersistCommand>();
        tokio::spawn(SessionStore::persist_loop(storage.clone(), persist_rx));

        let (state, _) = watch::channel(Session::default());

        return Arc::new(SessionStore {
            state,
            storage,
            persist_tx,
            hydration_started: AtomicBool::new(false),
        });
    }

    async fn persist_loop(
        storage: Arc<StorageBox>,
        mut rx: mpsc::UnboundedReceiver<PersistCommand>,
    ) {
        while let Some(command) = rx.recv().await {
            match command {
                PersistCommand::Write(snapshot) => {
                    let payload = match serde_json::to_string(&snapshot) {
                        Ok(payload) => payload,
                        Err(err) => {
                            tracing::error!(error = ?err, "Failed to serialize session");
                            continue;
                        }
                    };

                    if let Err(err) = storage.write(SESSION_RECORD, &payload).await {
                        tracing::error!(error = ?err, "Failed to persist session");
                    }
                }
                PersistCommand::Flush(ack) => {
                    let _ = ack.send(());
                }
            }
        }
    }

    pub fn current(&self) -> Session {
        return self.state.borrow().clone();
    }

    /// Read at call time, never cached by callers.
    pub fn credential(&self) -> Option<String> {
        return self
            .state
            .borrow()
            .credential()
            .map(|e| return e.to_string());
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        return self.state.subscribe();
    }

    pub fn set_credentials(&self, user: User, credential: &str) {
        self.state.send_modify(|session| {
            session.set_credentials(Some(Credentials {
                user,
                token: credential.to_string(),
            }));
        });

        tracing::debug!("Session credentials set");
        self.persist();
    }

    pub fn logout(&self) {
        let changed = self.state.send_if_modified(|session| {
            if !session.is_authenticated() {
                return false;
            }
            session.set_credentials(None);
            return true;
        });

        if changed {
            tracing::debug!("Session cleared");
            self.persist();
        }
    }

    /// Loads the durable record once per process. Always ends with the
    /// session marked hydrated, whatever happened while reading.
    pub async fn hydrate(&self) {
        if self.hydration_started.swap(true, Ordering::SeqCst) {
            tracing::warn!("Session hydration requested twice");
            return;
        }

        let restored = match self.storage.read(SESSION_RECORD).await {
            Ok(Some(payload)) => match serde_json::from_str::<PersistedSession>(&payload) {
                Ok(snapshot) => snapshot.into_credentials(),
                Err(err) => {
                    tracing::error!(error = ?err, "Stored session is unreadable");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                tracing::error!(error = ?err, "Failed to read stored session");
                None
            }
        };

        self.state.send_modify(|session| {
            if !session.is_authenticated() {
                session.set_credentials(restored);
            }
            session.mark_hydrated();
        });
    }

    /// Resolves once every write queued before this call has been attempted.
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel::<()>();
        if self.persist_tx.send(PersistCommand::Flush(tx)).is_ok() {
            let _ = rx.await;
        }
    }

    fn persist(&self) {
        let snapshot = self.state.borrow().snapshot();
        if self.persist_tx.send(PersistCommand::Write(snapshot)).is_err() {
            tracing::error!("Session writer has stopped, change kept in memory only");
        }
    }
}
