use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::error::ScanError;
use crate::probe;
use crate::sink::ResultSink;
use crate::types::{PortOutcome, ScanRequest};

pub const DEFAULT_WORKER_COUNT: usize = 50;
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(250);

/// Bounded-concurrency TCP connect-scan scheduler.
///
/// - Fills a shared work queue with every port in the request's range, then
///   launches a fixed pool of workers that drain it.
/// - Every probe attempt, whatever its outcome, bumps a shared atomic
///   progress counter published through the sink.
/// - Per-port failures are routed to the sink, never to the caller; the scan
///   completes only when the queue is drained and every in-flight probe has
///   finished, after which `on_finished` fires exactly once.
#[derive(Debug, Clone)]
pub struct Scanner {
    worker_count: usize,
    timeout: Duration,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(DEFAULT_WORKER_COUNT, DEFAULT_PROBE_TIMEOUT)
    }
}

impl Scanner {
    pub fn new(worker_count: usize, timeout: Duration) -> Self {
        Self {
            worker_count,
            timeout,
        }
    }

    /// Run a full scan to completion.
    pub async fn run(
        &self,
        request: &ScanRequest,
        sink: Arc<dyn ResultSink>,
    ) -> Result<(), ScanError> {
        self.run_with_cancel(request, sink, CancellationToken::new())
            .await
    }

    /// Variant that accepts a `CancellationToken`. Workers observe the token
    /// between probes; a cancelled scan still joins its workers and fires
    /// `on_finished`, it just stops dequeuing new ports.
    pub async fn run_with_cancel(
        &self,
        request: &ScanRequest,
        sink: Arc<dyn ResultSink>,
        cancel: CancellationToken,
    ) -> Result<(), ScanError> {
        if self.worker_count == 0 {
            return Err(ScanError::Startup("worker count must be at least 1".into()));
        }
        // Defensive: `ScanRequest::new` already enforces this.
        if request.start_port() == 0 || request.start_port() > request.end_port() {
            return Err(ScanError::invalid_range(
                &format!("{}-{}", request.start_port(), request.end_port()),
                "request violates range invariant",
            ));
        }

        let total = request.total_ports();
        log::debug!(
            "scanning {} ports on `{}` with {} workers, {:?} timeout",
            total,
            request.target(),
            self.worker_count,
            self.timeout
        );

        // Populated in full before any worker consumes; drained-empty is the
        // termination signal for the worker loops.
        let queue: Arc<Mutex<VecDeque<u16>>> = Arc::new(Mutex::new(
            (request.start_port()..=request.end_port()).collect(),
        ));
        let done = Arc::new(AtomicU64::new(0));

        let mut set = JoinSet::new();
        for _ in 0..self.worker_count {
            let queue = queue.clone();
            let done = done.clone();
            let sink = sink.clone();
            let cancel = cancel.clone();
            let target = request.target().to_string();
            let timeout = self.timeout;

            set.spawn(async move {
                loop {
                    if cancel.is_cancelled() {
                        break;
                    }
                    let port = queue.lock().expect("port queue poisoned").pop_front();
                    let Some(port) = port else {
                        break;
                    };

                    match probe::probe_port(&target, port, timeout).await {
                        Some(PortOutcome::Open(p)) => sink.on_open_port(p),
                        Some(PortOutcome::NetworkError(msg)) => sink.on_error(&msg),
                        Some(PortOutcome::UnexpectedError(p, msg)) => {
                            sink.on_error(&format!("Unexpected error on port {p}: {msg}"))
                        }
                        // No answer within the timeout: closed or filtered,
                        // counted below but not reported.
                        None => {}
                    }

                    let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
                    sink.on_progress(finished, total);
                }
            });
        }

        // Completion barrier: queue drained and every dequeued port fully
        // processed. A worker may still be mid-probe when the queue empties.
        while let Some(res) = set.join_next().await {
            if let Err(e) = res {
                log::debug!("scan worker ended abnormally: {e}");
            }
        }

        log::debug!(
            "scan of `{}` finished, {} of {} probes completed",
            request.target(),
            done.load(Ordering::Relaxed),
            total
        );
        sink.on_finished();
        Ok(())
    }
}
