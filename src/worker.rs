//! Background request worker.
//!
//! Runs "network" calls off the UI thread over mpsc channels with a
//! non-blocking poll, the same shape as any other long-running job the UI
//! must not wait on. Each request carries a tracker guard from the moment it
//! is submitted until it settles, so the mini loader covers queue time too.

use std::collections::HashSet;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::tracker::{RequestGuard, RequestTracker};

pub type RequestId = u64;

/// A simulated network call: a label for reporting, a latency, and whether
/// the endpoint fails.
pub struct FetchRequest {
    pub id: RequestId,
    pub label: String,
    pub latency: Duration,
    pub fail: bool,
}

struct TrackedRequest {
    request: FetchRequest,
    guard: RequestGuard,
}

pub struct FetchResult {
    pub id: RequestId,
    pub label: String,
    pub outcome: Result<String, String>,
}

pub struct RequestWorker {
    tx: mpsc::Sender<TrackedRequest>,
    rx: mpsc::Receiver<FetchResult>,
    tracker: RequestTracker,
    in_flight: HashSet<RequestId>,
    next_id: RequestId,
}

impl RequestWorker {
    pub fn new(tracker: RequestTracker) -> Self {
        let (req_tx, req_rx) = mpsc::channel::<TrackedRequest>();
        let (res_tx, res_rx) = mpsc::channel::<FetchResult>();

        thread::Builder::new()
            .name("request-worker".into())
            .spawn(move || {
                while let Ok(tracked) = req_rx.recv() {
                    let TrackedRequest { request, guard } = tracked;
                    thread::sleep(request.latency);

                    let outcome = if request.fail {
                        log::warn!("Request '{}' failed", request.label);
                        Err(format!("{} unavailable", request.label))
                    } else {
                        Ok(format!("{} ready", request.label))
                    };
                    // Settle before reporting: the count must drop whether or
                    // not the main thread still listens.
                    drop(guard);

                    let result = FetchResult {
                        id: request.id,
                        label: request.label,
                        outcome,
                    };
                    if res_tx.send(result).is_err() {
                        break; // main thread dropped its receiver
                    }
                }
                log::info!("Request worker thread exiting");
            })
            .expect("Failed to spawn request worker thread");

        Self {
            tx: req_tx,
            rx: res_rx,
            tracker,
            in_flight: HashSet::new(),
            next_id: 1,
        }
    }

    /// Non-blocking submit. Tracking starts here, not when the worker picks
    /// the request up. Returns the id to correlate with [`poll`](Self::poll).
    pub fn submit(&mut self, label: &str, latency: Duration, fail: bool) -> RequestId {
        let id = self.next_id;
        self.next_id += 1;
        self.in_flight.insert(id);

        let guard = self.tracker.begin();
        let tracked = TrackedRequest {
            request: FetchRequest {
                id,
                label: label.to_string(),
                latency,
                fail,
            },
            guard,
        };
        if self.tx.send(tracked).is_err() {
            log::warn!("Request worker is gone; dropping '{}'", label);
            self.in_flight.remove(&id);
        }
        id
    }

    /// Non-blocking poll for settled requests.
    pub fn poll(&mut self) -> Option<FetchResult> {
        match self.rx.try_recv() {
            Ok(result) => {
                self.in_flight.remove(&result.id);
                Some(result)
            }
            Err(_) => None,
        }
    }

    /// True if there are no pending requests.
    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty()
    }
}
