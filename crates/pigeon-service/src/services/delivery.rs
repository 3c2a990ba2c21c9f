//! Delivery scheduler
//!
//! After a message is sent, its advance to `Received` happens in the
//! background: the caller of send never waits on it and never sees its
//! failure. The scheduler owns every spawned advance as a task in a
//! `JoinSet`, so the process can cancel or drain them deterministically at
//! shutdown instead of leaking detached work.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinSet;
use tracing::warn;

use pigeon_core::entities::DeliveryStatus;
use pigeon_core::traits::MessageRepository;
use pigeon_core::value_objects::MessageId;

/// Owner of the background status-advance tasks
///
/// Dropping the scheduler aborts everything still pending.
pub struct DeliveryScheduler {
    delay: Duration,
    tasks: Mutex<JoinSet<()>>,
}

impl DeliveryScheduler {
    /// Create a scheduler that advances messages after `delay`
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    /// Schedule the advance of a message from `Sent` to `Received`
    ///
    /// The task re-reads the message after the delay and only advances it
    /// if it is still `Sent`; errors are logged and discarded. Must be
    /// called from within a Tokio runtime.
    pub fn schedule_received(&self, repo: Arc<dyn MessageRepository>, message_id: MessageId) {
        let delay = self.delay;

        let mut tasks = self.tasks.lock();
        // Reap finished tasks so the set does not grow without bound
        while tasks.try_join_next().is_some() {}

        tasks.spawn(async move {
            tokio::time::sleep(delay).await;

            match repo.find_by_id(message_id).await {
                Ok(Some(message)) if message.status == DeliveryStatus::Sent => {
                    if let Err(err) = repo.update_status(message_id, DeliveryStatus::Received).await
                    {
                        warn!(
                            message_id = %message_id,
                            error = %err,
                            "failed to advance message to received"
                        );
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    warn!(
                        message_id = %message_id,
                        error = %err,
                        "could not load message for delivery advance"
                    );
                }
            }
        });
    }

    /// Number of advances still pending
    pub fn pending(&self) -> usize {
        self.tasks.lock().len()
    }

    /// Abort every pending advance
    pub fn shutdown(&self) {
        self.tasks.lock().abort_all();
    }

    /// Wait for every pending advance to finish
    pub async fn drain(&self) {
        let mut tasks = std::mem::take(&mut *self.tasks.lock());
        while tasks.join_next().await.is_some() {}
    }
}

impl std::fmt::Debug for DeliveryScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryScheduler")
            .field("delay", &self.delay)
            .field("pending", &self.pending())
            .finish()
    }
}
