//! The original deployment pushed confirmation mails onto a task queue
//! consumed by a separate handler. Here the queue is an in-process channel
//! drained by a worker task; actual mail transport is left to operations
//! (the worker records the send).

use tokio::sync::mpsc;
use tracing::info;

#[derive(Debug, Clone)]
pub struct ConfirmationEmail {
    pub recipient: Option<String>,
    pub conference_name: String,
}

#[derive(Clone)]
pub struct EmailQueue {
    sender: mpsc::UnboundedSender<ConfirmationEmail>,
}

impl EmailQueue {
    pub fn spawn() -> EmailQueue {
        let (sender, mut receiver) = mpsc::unbounded_channel::<ConfirmationEmail>();
        tokio::spawn(async move {
            while let Some(task) = receiver.recv().await {
                match &task.recipient {
                    Some(recipient) => info!(
                        "Confirmation email for new conference {:?} sent to {}",
                        task.conference_name, recipient
                    ),
                    None => info!(
                        "No address on file for the organizer of {:?}, skipping confirmation email",
                        task.conference_name
                    ),
                }
            }
        });
        EmailQueue { sender }
    }

    pub fn enqueue(&self, task: ConfirmationEmail) {
        // The worker only terminates with the runtime; a failed send just
        // means shutdown is in progress.
        let _ = self.sender.send(task);
    }
}
