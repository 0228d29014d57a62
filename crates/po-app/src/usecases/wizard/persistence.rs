//! Fire-and-forget draft persistence.
//!
//! Writes are queued to a single background task so they reach the store in
//! the order the wizard produced them. Failures are logged and dropped; the
//! in-memory state stays authoritative.

use std::sync::Arc;

use po_core::ports::DraftStorePort;
use po_core::wizard::PersistedDraft;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info_span, warn, Instrument};

enum PersistCommand {
    Save(PersistedDraft),
    Clear,
    Flush(oneshot::Sender<()>),
}

#[derive(Clone)]
pub struct DraftPersistence {
    tx: mpsc::UnboundedSender<PersistCommand>,
}

impl DraftPersistence {
    /// Starts the writer task. Must be called inside a tokio runtime.
    pub fn spawn(store: Arc<dyn DraftStorePort>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<PersistCommand>();

        tokio::spawn(
            async move {
                while let Some(command) = rx.recv().await {
                    match command {
                        PersistCommand::Save(draft) => {
                            let step = draft.current_step.number();
                            if let Err(err) = store.save(&draft).await {
                                warn!(error = %err, current_step = step, "failed to persist onboarding draft");
                            } else {
                                debug!(current_step = step, "onboarding draft persisted");
                            }
                        }
                        PersistCommand::Clear => {
                            if let Err(err) = store.clear().await {
                                warn!(error = %err, "failed to clear persisted onboarding draft");
                            } else {
                                debug!("persisted onboarding draft cleared");
                            }
                        }
                        PersistCommand::Flush(done) => {
                            let _ = done.send(());
                        }
                    }
                }
                debug!("draft persistence writer stopped");
            }
            .instrument(info_span!("usecase.onboarding.persistence")),
        );

        Self { tx }
    }

    pub fn save(&self, draft: PersistedDraft) {
        self.send(PersistCommand::Save(draft));
    }

    pub fn clear(&self) {
        self.send(PersistCommand::Clear);
    }

    /// Resolves once every write queued before this call has been attempted.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        self.send(PersistCommand::Flush(done_tx));
        let _ = done_rx.await;
    }

    fn send(&self, command: PersistCommand) {
        if self.tx.send(command).is_err() {
            warn!("draft persistence writer is gone, dropping write");
        }
    }
}
