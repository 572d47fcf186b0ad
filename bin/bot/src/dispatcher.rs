//! Per-user event dispatch.
//!
//! Each user gets a worker task fed by an unbounded queue, so one user's
//! events are handled strictly in arrival order while different users are
//! handled concurrently. Retraction requests touch no session and run on
//! their own task.

use crate::service::ListingService;
use market_relay_conversation::InboundEvent;
use market_relay_core::UserId;
use std::collections::HashMap;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Routes events to per-user workers.
pub struct Dispatcher {
    service: ListingService,
    workers: Mutex<HashMap<UserId, mpsc::UnboundedSender<InboundEvent>>>,
    tasks: Mutex<JoinSet<()>>,
}

impl Dispatcher {
    /// Creates a dispatcher with no workers.
    #[must_use]
    pub fn new(service: ListingService) -> Self {
        Self {
            service,
            workers: Mutex::new(HashMap::new()),
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    /// Queues an event for handling.
    pub async fn dispatch(&self, event: InboundEvent) {
        if matches!(event, InboundEvent::Callback { .. }) {
            let service = self.service.clone();
            let mut tasks = self.tasks.lock().await;
            reap(&mut tasks);
            tasks.spawn(async move {
                service.handle(event).await;
            });
            return;
        }

        let user_id = event.user_id();
        let mut workers = self.workers.lock().await;

        let event = match workers.get(&user_id) {
            Some(queue) => match queue.send(event) {
                Ok(()) => return,
                Err(mpsc::error::SendError(event)) => {
                    warn!(%user_id, "user worker stopped, restarting it");
                    event
                }
            },
            None => event,
        };

        let (queue, receiver) = mpsc::unbounded_channel();
        // A fresh receiver is alive, so this send cannot fail.
        let _ = queue.send(event);
        workers.insert(user_id, queue);
        let mut tasks = self.tasks.lock().await;
        reap(&mut tasks);
        tasks.spawn(run_worker(user_id, receiver, self.service.clone()));
        debug!(%user_id, workers = workers.len(), "started user worker");
    }

    /// Number of per-user workers started so far.
    pub async fn worker_count(&self) -> usize {
        self.workers.lock().await.len()
    }

    /// Stops accepting events and waits for everything already queued to be
    /// handled.
    pub async fn drain(&self) {
        self.workers.lock().await.clear();
        let mut tasks = std::mem::take(&mut *self.tasks.lock().await);
        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                warn!(error = %e, "event task failed");
            }
        }
    }
}

/// Collects tasks that have already finished.
fn reap(tasks: &mut JoinSet<()>) {
    while let Some(result) = tasks.try_join_next() {
        if let Err(e) = result {
            warn!(error = %e, "event task failed");
        }
    }
}

async fn run_worker(
    user_id: UserId,
    mut receiver: mpsc::UnboundedReceiver<InboundEvent>,
    service: ListingService,
) {
    while let Some(event) = receiver.recv().await {
        service.handle(event).await;
    }
    debug!(%user_id, "user worker finished");
}
