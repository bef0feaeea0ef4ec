/*
[INPUT]:  Renewal kind, interval, renewal operation, optional failure observer
[OUTPUT]: Periodic background relogin/refresh that a handle can stop
[POS]:    Auth layer - token upkeep for long-lived clients
[UPDATE]: When changing renewal scheduling, cancellation or failure reporting
*/

use std::fmt;
use std::future::Future;
use std::time::Duration;

use crossbeam_channel::{RecvTimeoutError, Sender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::RenewalObserver;
use crate::http::{BitpinError, Result};

/// Which token upkeep a background task performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenewalKind {
    /// Full login with key and secret
    Relogin,
    /// Exchange the refresh token for a new access token
    RefreshToken,
}

impl fmt::Display for RenewalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenewalKind::Relogin => write!(f, "relogin"),
            RenewalKind::RefreshToken => write!(f, "refresh_token"),
        }
    }
}

#[derive(Debug)]
enum Worker {
    Task {
        shutdown: CancellationToken,
        handle: tokio::task::JoinHandle<()>,
    },
    Thread {
        stop: Sender<()>,
        handle: std::thread::JoinHandle<()>,
    },
}

/// Handle to one periodic renewal; stops the worker when dropped
#[derive(Debug)]
pub struct RenewalTask {
    kind: RenewalKind,
    interval: Duration,
    worker: Worker,
}

impl RenewalTask {
    /// Run `op` on the current tokio runtime every `interval`.
    ///
    /// The first run happens one interval after spawning.
    pub(crate) fn spawn_async<F, Fut>(
        kind: RenewalKind,
        interval: Duration,
        observer: Option<RenewalObserver>,
        op: F,
    ) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();

        let handle = tokio::spawn(async move {
            info!(%kind, ?interval, "background renewal started");
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {}
                }

                let outcome = tokio::select! {
                    _ = token.cancelled() => break,
                    outcome = op() => outcome,
                };
                report(kind, outcome, observer.as_ref());
            }
            info!(%kind, "background renewal stopped");
        });

        Self {
            kind,
            interval,
            worker: Worker::Task { shutdown, handle },
        }
    }

    /// Run `op` on a dedicated OS thread every `interval`.
    ///
    /// A renewal already in flight finishes before the thread observes `stop`.
    pub(crate) fn spawn_thread<F>(
        kind: RenewalKind,
        interval: Duration,
        observer: Option<RenewalObserver>,
        op: F,
    ) -> Result<Self>
    where
        F: Fn() -> Result<()> + Send + 'static,
    {
        let (stop, stopped) = crossbeam_channel::bounded::<()>(1);

        let handle = std::thread::Builder::new()
            .name(format!("bitpin-{kind}"))
            .spawn(move || {
                info!(%kind, ?interval, "background renewal started");
                loop {
                    match stopped.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                    report(kind, op(), observer.as_ref());
                }
                info!(%kind, "background renewal stopped");
            })
            .map_err(|err| {
                BitpinError::Config(format!("failed to spawn {kind} thread: {err}"))
            })?;

        Ok(Self {
            kind,
            interval,
            worker: Worker::Thread { stop, handle },
        })
    }

    pub fn kind(&self) -> RenewalKind {
        self.kind
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Signal the worker to exit; it skips every run not yet started
    pub fn stop(&self) {
        match &self.worker {
            Worker::Task { shutdown, .. } => shutdown.cancel(),
            Worker::Thread { stop, .. } => {
                let _ = stop.try_send(());
            }
        }
    }

    /// True once the worker has exited
    pub fn is_finished(&self) -> bool {
        match &self.worker {
            Worker::Task { handle, .. } => handle.is_finished(),
            Worker::Thread { handle, .. } => handle.is_finished(),
        }
    }
}

impl Drop for RenewalTask {
    fn drop(&mut self) {
        self.stop();
    }
}

fn report(kind: RenewalKind, outcome: Result<()>, observer: Option<&RenewalObserver>) {
    match outcome {
        Ok(()) => debug!(%kind, "background renewal succeeded"),
        Err(err) => {
            warn!(%kind, error = %err, "background renewal failed, retrying next interval");
            if let Some(observer) = observer {
                observer.notify(kind, &err);
            }
        }
    }
}
