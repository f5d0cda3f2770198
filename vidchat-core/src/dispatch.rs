//! Runs controller requests on the tokio runtime.
//!
//! Each dispatched request is executed on its own task; its completion is sent back
//! over an unbounded channel to whichever loop owns the [`Controller`](crate::Controller).
//! The owner applies completions one at a time in arrival order, so state is only
//! ever touched from a single place. Nothing is cancelled: a task outlives any
//! selection change and its result is filtered when applied.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::effect::{execute, Completion, Request};
use crate::gateway::Gateway;

/// Spawns gateway calls and forwards their completions as `E`.
///
/// `E` is the owner's event type; anything convertible from [`Completion`] works,
/// including `Completion` itself.
pub struct Dispatcher<E> {
    gateway: Arc<dyn Gateway>,
    tx: UnboundedSender<E>,
}

impl<E> Clone for Dispatcher<E> {
    fn clone(&self) -> Self {
        Self { gateway: Arc::clone(&self.gateway), tx: self.tx.clone() }
    }
}

impl<E> Dispatcher<E>
where
    E: From<Completion> + Send + 'static,
{
    pub fn new(gateway: Arc<dyn Gateway>, tx: UnboundedSender<E>) -> Self {
        Self { gateway, tx }
    }

    pub fn dispatch(&self, request: Request) {
        debug!(kind = request.kind(), "dispatching request");
        let gateway = Arc::clone(&self.gateway);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let completion = execute(gateway.as_ref(), request).await;
            // The owner may already be shutting down; a closed channel is fine.
            let _ = tx.send(E::from(completion));
        });
    }

    pub fn dispatch_all(&self, requests: impl IntoIterator<Item = Request>) {
        for request in requests {
            self.dispatch(request);
        }
    }
}
