//! Background request thread.
//!
//! Runs backend calls off the event loop. Every request carries the
//! [`Ticket`] the session issued for it, and the reply echoes that ticket
//! back so the session can tell current results from superseded ones.

use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::Duration;

use super::{Backend, BackendError};
use crate::model::{ClusterCount, Sample, Snapshot};
use crate::session::Ticket;

/// Request sent from the event loop to the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendRequest {
    /// Generate a new dataset.
    Generate(Ticket),
    /// Run k-means with the given cluster count.
    Run(Ticket, ClusterCount),
    /// Stop the worker thread.
    Shutdown,
}

/// Completed backend call, tagged with the ticket of its request.
#[derive(Debug)]
pub enum BackendReply {
    /// Result of a [`BackendRequest::Generate`].
    Generated(Ticket, Result<Vec<Sample>, BackendError>),
    /// Result of a [`BackendRequest::Run`].
    Ran(Ticket, Result<Vec<Snapshot>, BackendError>),
}

impl BackendReply {
    /// Ticket of the request this reply answers.
    #[must_use]
    pub fn ticket(&self) -> Ticket {
        match self {
            Self::Generated(ticket, _) | Self::Ran(ticket, _) => *ticket,
        }
    }
}

/// Owns the worker thread and both ends of its channels.
pub struct RequestWorker {
    request_tx: mpsc::Sender<BackendRequest>,
    reply_rx: mpsc::Receiver<BackendReply>,
    thread: Option<JoinHandle<()>>,
}

impl RequestWorker {
    /// Spawn the worker thread around `backend`.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn spawn<B>(backend: B) -> std::io::Result<Self>
    where
        B: Backend + Send + 'static,
    {
        let (request_tx, request_rx) = mpsc::channel::<BackendRequest>();
        let (reply_tx, reply_rx) = mpsc::channel::<BackendReply>();

        let thread = std::thread::Builder::new()
            .name("backend-requests".into())
            .spawn(move || Self::thread_loop(&backend, &request_rx, &reply_tx))?;

        Ok(Self {
            request_tx,
            reply_rx,
            thread: Some(thread),
        })
    }

    /// Queue a request. Returns `false` if the worker has stopped.
    pub fn submit(&self, request: BackendRequest) -> bool {
        self.request_tx.send(request).is_ok()
    }

    /// Next finished reply, if any, without blocking.
    #[must_use]
    pub fn try_recv(&self) -> Option<BackendReply> {
        self.reply_rx.try_recv().ok()
    }

    /// Next finished reply, waiting at most `timeout`.
    #[must_use]
    pub fn recv_timeout(&self, timeout: Duration) -> Option<BackendReply> {
        self.reply_rx.recv_timeout(timeout).ok()
    }

    /// Stop the worker and wait for its current call to finish.
    pub fn shutdown(&mut self) {
        let _ = self.request_tx.send(BackendRequest::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }

    fn thread_loop<B: Backend>(
        backend: &B,
        request_rx: &mpsc::Receiver<BackendRequest>,
        reply_tx: &mpsc::Sender<BackendReply>,
    ) {
        // Requests are served in order; the session decides which replies
        // still matter, so nothing is coalesced here.
        while let Ok(request) = request_rx.recv() {
            let reply = match request {
                BackendRequest::Shutdown => break,
                BackendRequest::Generate(ticket) => {
                    BackendReply::Generated(ticket, backend.generate_data())
                }
                BackendRequest::Run(ticket, k) => BackendReply::Ran(ticket, backend.run_kmeans(k)),
            };
            if reply_tx.send(reply).is_err() {
                break;
            }
        }
        log::debug!("backend request worker stopped");
    }
}

impl Drop for RequestWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
