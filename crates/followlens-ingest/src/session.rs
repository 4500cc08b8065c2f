//! Ingestion sessions.
//!
//! A session owns a background worker that runs ingestion calls one at a time.
//! Calls go in over a channel and their results come back on a oneshot reply.
//! Terminating a session is a hard cancellation: the in-flight call (if any)
//! fails with [`IngestError::SessionTerminated`], no partial result is
//! delivered, and every later call fails the same way.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use followlens_core::{IngestConfig, IngestError, IngestWarning};

use crate::pipeline::{IngestRequest, IngestResponse, run};

type Reply = oneshot::Sender<Result<IngestResponse, IngestError>>;

struct Job {
    request: IngestRequest,
    reply: Reply,
}

/// Handle that terminates a session from another task.
#[derive(Debug, Clone)]
pub struct SessionTerminator {
    cancel: CancellationToken,
}

impl SessionTerminator {
    /// Terminate the session.
    pub fn terminate(&self) {
        self.cancel.cancel();
    }
}

/// An explicitly owned ingestion session.
pub struct IngestSession {
    jobs: mpsc::Sender<Job>,
    cancel: CancellationToken,
    worker: JoinHandle<()>,
}

impl IngestSession {
    /// Start a session. Must be called from within a Tokio runtime.
    pub fn new(config: IngestConfig) -> Self {
        let (jobs, rx) = mpsc::channel(config.channel_size.max(1));
        let cancel = CancellationToken::new();
        let worker = tokio::spawn(run_worker(config, rx, cancel.clone()));

        Self {
            jobs,
            cancel,
            worker,
        }
    }

    /// Run one ingestion call.
    ///
    /// Taking `&mut self` keeps calls on one session strictly sequential.
    pub async fn ingest(&mut self, request: IngestRequest) -> Result<IngestResponse, IngestError> {
        if self.cancel.is_cancelled() {
            return Err(IngestError::SessionTerminated);
        }

        let (reply, response) = oneshot::channel();
        self.jobs
            .send(Job { request, reply })
            .await
            .map_err(|_| self.gone())?;

        response.await.map_err(|_| self.gone())?
    }

    /// A handle that can terminate this session while a call is in flight.
    pub fn terminator(&self) -> SessionTerminator {
        SessionTerminator {
            cancel: self.cancel.clone(),
        }
    }

    /// Check if the session was terminated.
    pub fn is_terminated(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Terminate the session and wait for its worker to stop.
    pub async fn terminate(self) {
        self.cancel.cancel();
        let _ = self.worker.await;
    }

    fn gone(&self) -> IngestError {
        if self.cancel.is_cancelled() {
            IngestError::SessionTerminated
        } else {
            IngestError::SessionClosed
        }
    }
}

async fn run_worker(config: IngestConfig, mut jobs: mpsc::Receiver<Job>, cancel: CancellationToken) {
    tracing::info!("ingestion session started");

    loop {
        let job = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            job = jobs.recv() => match job {
                Some(job) => job,
                None => break,
            },
        };

        let Job { request, reply } = job;
        let task_config = config.clone();
        let task_cancel = cancel.clone();
        let task = tokio::task::spawn_blocking(move || {
            guarded(|gathered| run(request, &task_config, &task_cancel, gathered))
        });

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(IngestError::SessionTerminated),
            joined = task => match joined {
                Ok(Ok(Some(response))) => Ok(response),
                Ok(Ok(None)) => Err(IngestError::SessionTerminated),
                Ok(Err(err)) => Err(err),
                Err(err) => Err(IngestError::Failed {
                    message: format!("ingestion worker failed: {err}"),
                    warnings: Vec::new(),
                }),
            },
        };

        let terminated = matches!(result, Err(IngestError::SessionTerminated));
        let _ = reply.send(result);
        if terminated {
            break;
        }
    }

    tracing::info!("ingestion session stopped");
}

/// Run one pipeline call, turning a panic into [`IngestError::Failed`]
/// that carries the warnings gathered before it.
///
/// Builds with `panic = "abort"` never get here; the process is gone.
fn guarded<F>(call: F) -> Result<Option<IngestResponse>, IngestError>
where
    F: FnOnce(&mut Vec<IngestWarning>) -> Option<IngestResponse>,
{
    let mut gathered = Vec::new();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| call(&mut gathered)));
    outcome.map_err(|payload| IngestError::Failed {
        message: format!("ingestion worker failed: {}", panic_message(payload.as_ref())),
        warnings: gathered,
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "panic"
    }
}
