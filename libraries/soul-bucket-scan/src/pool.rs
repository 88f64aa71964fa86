/// Fetch worker pool
use crate::config::ScanConfig;
use crate::error::Result;
use crate::progress::{ScanProgress, ScanStats};
use crate::queue::{Pop, WorkQueue};
use crate::sink::TrackSink;
use soul_flac_meta::{read_track, Track};
use soul_remote::{Locator, ObjectReader, ObjectStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Failure message recorded for an item whose decode was cut short.
pub const CANCELLED: &str = "cancelled before decoding finished";

/// What one worker did before exiting.
#[derive(Debug, Default)]
struct WorkerReport {
    decoded: usize,
    failures: Vec<(Locator, String)>,
    cancelled: bool,
}

struct WorkerContext {
    store: Arc<dyn ObjectStore>,
    sink: Arc<dyn TrackSink>,
    min_chunk_size: usize,
    poll_interval: Duration,
    progress: Option<mpsc::Sender<ScanProgress>>,
    cancel: CancellationToken,
}

/// A fixed number of workers draining a [`WorkQueue`].
///
/// Each worker pops one locator at a time, decodes the object's metadata
/// through the store and publishes the track. Failures are logged and
/// counted; the worker moves on to the next item. Idle workers poll the
/// queue until it is closed and empty.
pub struct FetchWorkerPool {
    context: WorkerContext,
    workers: usize,
}

impl FetchWorkerPool {
    pub fn new(store: Arc<dyn ObjectStore>, sink: Arc<dyn TrackSink>, config: &ScanConfig) -> Self {
        Self {
            context: WorkerContext {
                store,
                sink,
                min_chunk_size: config.min_chunk_size,
                poll_interval: config.poll_interval(),
                progress: None,
                cancel: CancellationToken::new(),
            },
            workers: config.workers.max(1),
        }
    }

    /// Report per-track events on `progress`.
    pub fn with_progress(mut self, progress: mpsc::Sender<ScanProgress>) -> Self {
        self.context.progress = Some(progress);
        self
    }

    /// Stop when `cancel` fires instead of a private token.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.context.cancel = cancel;
        self
    }

    /// Start the workers on the current runtime.
    pub fn spawn(self, queue: WorkQueue) -> PoolHandle {
        let cancel = self.context.cancel.clone();
        let context = Arc::new(self.context);

        let workers = (0..self.workers)
            .map(|worker_id| {
                let context = Arc::clone(&context);
                let queue = queue.clone();
                tokio::spawn(async move {
                    info!("Fetch worker {} started", worker_id);
                    let report = context.worker_loop(worker_id, queue).await;
                    info!(
                        "Fetch worker {} stopped after {} tracks ({} failed)",
                        worker_id,
                        report.decoded,
                        report.failures.len()
                    );
                    report
                })
            })
            .collect();

        PoolHandle { workers, cancel }
    }
}

impl WorkerContext {
    async fn worker_loop(&self, worker_id: usize, queue: WorkQueue) -> WorkerReport {
        let mut report = WorkerReport::default();

        loop {
            if self.cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            match queue.pop().await {
                Pop::Item(locator) => {
                    let result = tokio::select! {
                        biased;
                        () = self.cancel.cancelled() => None,
                        result = self.fetch(&locator) => Some(result),
                    };

                    let Some(result) = result else {
                        // Popped but never finished, account for it as a failure
                        warn!(%locator, "Worker {} cancelled mid-decode", worker_id);
                        report.cancelled = true;
                        report
                            .failures
                            .push((locator.clone(), CANCELLED.to_string()));
                        self.try_send(ScanProgress::TrackFailed {
                            locator,
                            worker: worker_id,
                            error: CANCELLED.to_string(),
                        });
                        break;
                    };

                    match result {
                        Ok(track) => {
                            self.sink.publish(track);
                            report.decoded += 1;
                            self.send(ScanProgress::TrackDecoded {
                                locator,
                                worker: worker_id,
                            })
                            .await;
                        }
                        Err(e) => {
                            warn!(%locator, error = %e, "Worker {} failed to decode", worker_id);
                            let error = e.to_string();
                            report.failures.push((locator.clone(), error.clone()));
                            self.send(ScanProgress::TrackFailed {
                                locator,
                                worker: worker_id,
                                error,
                            })
                            .await;
                        }
                    }
                }
                Pop::Empty => {
                    // Producer still running, sleep briefly
                    tokio::select! {
                        biased;
                        () = self.cancel.cancelled() => {
                            report.cancelled = true;
                            break;
                        }
                        () = tokio::time::sleep(self.poll_interval) => {}
                    }
                }
                Pop::Closed => break,
            }
        }

        report
    }

    async fn fetch(&self, locator: &Locator) -> soul_flac_meta::Result<Track> {
        let reader = ObjectReader::new(Arc::clone(&self.store), locator.clone());
        read_track(locator.clone(), reader, self.min_chunk_size).await
    }

    async fn send(&self, event: ScanProgress) {
        if let Some(ref tx) = self.progress {
            let _ = tx.send(event).await;
        }
    }

    /// Non-blocking send; the receiver may have stopped draining after a cancel.
    fn try_send(&self, event: ScanProgress) {
        if let Some(ref tx) = self.progress {
            let _ = tx.try_send(event);
        }
    }
}

/// Running workers.
pub struct PoolHandle {
    workers: Vec<JoinHandle<WorkerReport>>,
    cancel: CancellationToken,
}

impl PoolHandle {
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Ask every worker to stop at its next suspension point.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Wait for all workers to exit and merge their reports.
    ///
    /// `discovered` is left at zero; the caller knows it from the producer.
    /// Every worker is awaited even when one of them panicked; the first
    /// join error is returned after the rest have exited.
    pub async fn join(self) -> Result<ScanStats> {
        let mut stats = ScanStats {
            per_worker: Vec::with_capacity(self.workers.len()),
            ..ScanStats::default()
        };
        let mut first_error = None;

        for (worker_id, worker) in self.workers.into_iter().enumerate() {
            match worker.await {
                Ok(report) => {
                    stats.decoded += report.decoded;
                    stats.per_worker.push(report.decoded);
                    stats.failures.extend(report.failures);
                    stats.cancelled |= report.cancelled;
                }
                Err(e) => {
                    error!("Fetch worker {} did not finish: {}", worker_id, e);
                    stats.per_worker.push(0);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(stats),
        }
    }
}
