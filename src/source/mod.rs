//! Remote user source: the HTTP adapter and the background fetch worker.
//!
//! The UI thread never blocks on the network. It hands a [`PageRequest`] to
//! the [`FetchWorker`], which runs the request on its own thread and sends a
//! [`FetchOutcome`] back; the event loop drains outcomes once per tick.

pub mod http;

use std::time::Duration;

use async_trait::async_trait;
use crossbeam_channel::{Receiver, Sender, unbounded};
use tracing::{debug, error};

use crate::error::FetchError;
use crate::model::UserRecord;

pub use http::{HttpUserSource, SourceConfig};

/// Default number of records per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// One page to load; `page` is 1-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

/// Completion of a [`PageRequest`].
#[derive(Debug)]
pub struct FetchOutcome {
    pub page: u32,
    pub result: Result<Vec<UserRecord>, FetchError>,
}

/// Anything that can deliver pages of users.
#[async_trait]
pub trait UserSource: Send + Sync {
    async fn fetch_page(&self, request: PageRequest) -> Result<Vec<UserRecord>, FetchError>;
}

/// Handle to the thread that performs page requests.
///
/// Dropping the handle closes the request channel; the thread finishes the
/// request it is serving, if any, and exits on its own.
pub struct FetchWorker {
    requests: Sender<PageRequest>,
    outcomes: Receiver<FetchOutcome>,
}

impl FetchWorker {
    /// Start a worker thread serving requests against `source`.
    pub fn spawn<S>(source: S) -> std::io::Result<Self>
    where
        S: UserSource + 'static,
    {
        let (req_tx, req_rx) = unbounded::<PageRequest>();
        let (out_tx, out_rx) = unbounded::<FetchOutcome>();
        std::thread::Builder::new()
            .name("user-fetch".to_string())
            .spawn(move || serve(source, req_rx, out_tx))?;
        Ok(Self {
            requests: req_tx,
            outcomes: out_rx,
        })
    }

    /// Queue a request. Fails only when the worker thread has exited.
    pub fn submit(&self, request: PageRequest) -> Result<(), FetchError> {
        self.requests.send(request).map_err(|_| FetchError::WorkerGone)
    }

    /// Next finished request, if any, without blocking.
    pub fn try_next(&self) -> Option<FetchOutcome> {
        self.outcomes.try_recv().ok()
    }

    /// Wait up to `timeout` for the next finished request.
    pub fn next_timeout(&self, timeout: Duration) -> Option<FetchOutcome> {
        self.outcomes.recv_timeout(timeout).ok()
    }
}

fn serve<S: UserSource>(source: S, requests: Receiver<PageRequest>, outcomes: Sender<FetchOutcome>) {
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "failed to start fetch runtime");
            return;
        }
    };
    while let Ok(request) = requests.recv() {
        debug!(page = request.page, limit = request.limit, "fetching page");
        let result = rt.block_on(source.fetch_page(request));
        if outcomes
            .send(FetchOutcome {
                page: request.page,
                result,
            })
            .is_err()
        {
            break;
        }
    }
    debug!("fetch worker stopped");
}
