use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use ordermanager_events::{EventBus, OrderEnvelope, OrderEventListener, Subscription, dispatch};

/// Handle to control and join a background worker.
///
/// Dropping the handle stops the worker as well; keep it for as long as the
/// listener should run.
#[derive(Debug)]
pub struct WorkerHandle {
    name: &'static str,
    shutdown: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl WorkerHandle {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Request shutdown and wait for the loop to stop.
    ///
    /// Handlers already started keep running to completion on their own tasks.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(err) = self.join.await {
            error!(worker = self.name, error = %err, "listener worker ended abnormally");
        }
    }
}

/// Drives one [`OrderEventListener`] from a bus subscription.
///
/// - Subscribes on `spawn`, so no event published afterwards is missed
/// - Each event is handled on its own task: a slow handler does not hold up the
///   loop, a panicking one takes down only that task
/// - Handler errors and panics are logged and dropped; nothing reaches the publisher
#[derive(Debug)]
pub struct ListenerWorker;

impl ListenerWorker {
    /// Must be called from within a tokio runtime.
    pub fn spawn<L, B>(listener: Arc<L>, bus: &B) -> WorkerHandle
    where
        L: OrderEventListener + ?Sized,
        B: EventBus<OrderEnvelope> + ?Sized,
    {
        let name = listener.name();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let sub = bus.subscribe();

        let join = tokio::spawn(worker_loop(listener, sub, shutdown_rx));

        WorkerHandle {
            name,
            shutdown: shutdown_tx,
            join,
        }
    }
}

async fn worker_loop<L>(
    listener: Arc<L>,
    mut sub: Subscription<OrderEnvelope>,
    mut shutdown_rx: watch::Receiver<bool>,
) where
    L: OrderEventListener + ?Sized,
{
    let name = listener.name();

    loop {
        tokio::select! {
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
            next = sub.recv() => {
                let Some(envelope) = next else {
                    // bus dropped
                    break;
                };
                spawn_handler(listener.clone(), envelope);
            }
        }
    }

    debug!(worker = name, "listener worker stopped");
}

fn spawn_handler<L>(listener: Arc<L>, envelope: OrderEnvelope)
where
    L: OrderEventListener + ?Sized,
{
    let name = listener.name();
    let event_id = envelope.event_id();
    let event_type = envelope.event_type().to_string();

    let task = tokio::spawn(async move {
        if let Err(err) = dispatch(&*listener, envelope.payload()).await {
            error!(
                listener = name,
                %event_id,
                event_type = envelope.event_type(),
                order_id = %envelope.payload().order_id(),
                error = ?err,
                "order event listener failed"
            );
        }
    });

    // Watch the handler task so a panic is reported instead of silently lost.
    tokio::spawn(async move {
        if let Err(join_err) = task.await {
            if join_err.is_panic() {
                error!(listener = name, %event_id, event_type, "order event listener panicked");
            }
        }
    });
}
