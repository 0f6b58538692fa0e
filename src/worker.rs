// Kanji-Parts Search Worker
// Runs the engine on its own thread behind request/reply channels

use crate::query::parse_query;
use crate::search::{EngineConfig, KanjiSearch};
use crate::store::DecompositionStore;
use crate::types::{Region, SearchMode, WorkerError};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Messages into the worker
#[derive(Debug, Clone)]
pub enum Request {
    /// Install tables, replacing any previous ones wholesale
    Init(Arc<DecompositionStore>),

    /// Run one query
    Query {
        seq: u64,
        parts: Vec<String>,
        mode: SearchMode,
        region: Region,
    },

    /// Stop the worker loop
    Shutdown,
}

/// Result of one query, tagged with the sequence number it answers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub seq: u64,
    pub items: Vec<String>,
}

/// Worker lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// No tables yet; queries answer empty
    Uninitialized,
    /// Tables installed, waiting for a query
    Ready,
    /// Computing a query
    Processing,
}

/// The worker's state machine, independent of any thread
///
/// Queries that arrive before the first `Init` are answered with an empty
/// reply rather than queued.
pub struct WorkerCore {
    state: WorkerState,
    engine: Option<KanjiSearch>,
    config: EngineConfig,
}

impl WorkerCore {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            state: WorkerState::Uninitialized,
            engine: None,
            config,
        }
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Handle one request; queries produce a reply
    pub fn handle(&mut self, request: Request) -> Option<Reply> {
        match request {
            Request::Init(store) => {
                let info = store.info();
                tracing::info!(
                    direct = info.direct_entries,
                    patterns = info.pattern_entries,
                    variants = info.variant_entries,
                    "worker init received"
                );
                self.engine = Some(KanjiSearch::with_config(store, self.config));
                self.state = WorkerState::Ready;
                None
            }
            Request::Query {
                seq,
                parts,
                mode,
                region,
            } => {
                let Some(engine) = &self.engine else {
                    tracing::debug!(seq, "query before init, answering empty");
                    return Some(Reply {
                        seq,
                        items: Vec::new(),
                    });
                };
                self.state = WorkerState::Processing;
                let items = engine.search_parts(&parts, mode, region);
                self.state = WorkerState::Ready;
                Some(Reply { seq, items })
            }
            Request::Shutdown => None,
        }
    }
}

impl Default for WorkerCore {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

fn run(requests: Receiver<Request>, replies: Sender<Reply>, config: EngineConfig) {
    let mut core = WorkerCore::new(config);
    while let Ok(request) = requests.recv() {
        if matches!(request, Request::Shutdown) {
            break;
        }
        if let Some(reply) = core.handle(request) {
            if replies.send(reply).is_err() {
                break; // Caller dropped its receiver
            }
        }
    }
    tracing::debug!("search worker stopped");
}

/// Handle to a search worker thread
///
/// Every query gets the next sequence number. Replies for anything but the
/// most recently submitted query are discarded on receipt, so a slow older
/// query can never overwrite a newer result.
pub struct SearchWorker {
    requests: Sender<Request>,
    replies: Receiver<Reply>,
    next_seq: u64,
    latest: Option<u64>,
    handle: Option<JoinHandle<()>>,
}

impl SearchWorker {
    /// Spawn a worker with default tuning
    pub fn spawn() -> Result<Self, WorkerError> {
        Self::spawn_with(EngineConfig::default())
    }

    /// Spawn a worker with custom tuning
    pub fn spawn_with(config: EngineConfig) -> Result<Self, WorkerError> {
        let (request_tx, request_rx) = crossbeam_channel::unbounded();
        let (reply_tx, reply_rx) = crossbeam_channel::unbounded();

        let handle = std::thread::Builder::new()
            .name("kanji-search-worker".into())
            .spawn(move || run(request_rx, reply_tx, config))?;

        Ok(Self {
            requests: request_tx,
            replies: reply_rx,
            next_seq: 0,
            latest: None,
            handle: Some(handle),
        })
    }

    /// Install (or replace) the tables
    pub fn init(&self, store: Arc<DecompositionStore>) -> Result<(), WorkerError> {
        self.requests
            .send(Request::Init(store))
            .map_err(|_| WorkerError::Disconnected)
    }

    /// Submit a query over raw text; returns its sequence number
    ///
    /// Non-Han characters are dropped before sending. A query with no Han
    /// characters is still sent so its (empty) reply supersedes older ones.
    pub fn submit(
        &mut self,
        text: &str,
        mode: SearchMode,
        region: Region,
    ) -> Result<u64, WorkerError> {
        let parsed = parse_query(text, mode, region);
        self.submit_parts(parsed.parts, mode, region)
    }

    /// Submit a query over already extracted parts
    pub fn submit_parts(
        &mut self,
        parts: Vec<String>,
        mode: SearchMode,
        region: Region,
    ) -> Result<u64, WorkerError> {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.requests
            .send(Request::Query {
                seq,
                parts,
                mode,
                region,
            })
            .map_err(|_| WorkerError::Disconnected)?;
        self.latest = Some(seq);
        Ok(seq)
    }

    /// Sequence number of the most recent submission
    pub fn latest_seq(&self) -> Option<u64> {
        self.latest
    }

    /// Block until the reply to the latest query arrives
    ///
    /// Without a submitted query there is nothing to wait for, and the
    /// result is empty.
    pub fn recv_latest(&self) -> Result<Vec<String>, WorkerError> {
        if self.latest.is_none() {
            return Ok(Vec::new());
        }
        loop {
            let reply = self.replies.recv().map_err(|_| WorkerError::Disconnected)?;
            if let Some(items) = self.accept(reply) {
                return Ok(items);
            }
        }
    }

    /// Wait up to `timeout` for the reply to the latest query
    pub fn recv_latest_timeout(
        &self,
        timeout: Duration,
    ) -> Result<Option<Vec<String>>, WorkerError> {
        if self.latest.is_none() {
            return Ok(None);
        }
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.replies.recv_timeout(remaining) {
                Ok(reply) => {
                    if let Some(items) = self.accept(reply) {
                        return Ok(Some(items));
                    }
                }
                Err(RecvTimeoutError::Timeout) => return Ok(None),
                Err(RecvTimeoutError::Disconnected) => return Err(WorkerError::Disconnected),
            }
        }
    }

    /// Drain pending replies without blocking, keeping only the latest
    pub fn try_latest(&self) -> Option<Vec<String>> {
        let mut newest = None;
        while let Ok(reply) = self.replies.try_recv() {
            if let Some(items) = self.accept(reply) {
                newest = Some(items);
            }
        }
        newest
    }

    /// Submit and wait for the answer
    pub fn query(
        &mut self,
        text: &str,
        mode: SearchMode,
        region: Region,
    ) -> Result<Vec<String>, WorkerError> {
        self.submit(text, mode, region)?;
        self.recv_latest()
    }

    fn accept(&self, reply: Reply) -> Option<Vec<String>> {
        if Some(reply.seq) == self.latest {
            Some(reply.items)
        } else {
            tracing::trace!(seq = reply.seq, latest = ?self.latest, "discarding stale reply");
            None
        }
    }
}

impl Drop for SearchWorker {
    fn drop(&mut self) {
        let _ = self.requests.send(Request::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixture;

    fn store() -> Arc<DecompositionStore> {
        Arc::new(DecompositionStore::new(fixture()))
    }

    fn query(seq: u64, text: &str) -> Request {
        Request::Query {
            seq,
            parts: crate::query::extract_han(text),
            mode: SearchMode::PartsToChar,
            region: Region::Unrestricted,
        }
    }

    // ============ State Machine ============

    #[test]
    fn test_query_before_init_is_empty() {
        let mut core = WorkerCore::default();
        assert_eq!(core.state(), WorkerState::Uninitialized);

        let reply = core.handle(query(1, "水也")).unwrap();
        assert_eq!(reply, Reply { seq: 1, items: vec![] });
        assert_eq!(core.state(), WorkerState::Uninitialized);
    }

    #[test]
    fn test_init_then_query() {
        let mut core = WorkerCore::default();
        assert!(core.handle(Request::Init(store())).is_none());
        assert_eq!(core.state(), WorkerState::Ready);

        let reply = core.handle(query(7, "水也")).unwrap();
        assert_eq!(reply.seq, 7);
        assert_eq!(reply.items, vec!["池"]);
        assert_eq!(core.state(), WorkerState::Ready);
    }

    #[test]
    fn test_reinit_replaces_tables() {
        let mut core = WorkerCore::default();
        core.handle(Request::Init(store()));
        core.handle(Request::Init(Arc::new(DecompositionStore::empty())));

        let reply = core.handle(query(2, "水也")).unwrap();
        assert!(reply.items.is_empty());
    }

    // ============ Thread Handle ============

    #[test]
    fn test_worker_round_trip() {
        let mut worker = SearchWorker::spawn().unwrap();
        worker.init(store()).unwrap();

        let items = worker
            .query("口口口", SearchMode::PartsToChar, Region::Standard)
            .unwrap();
        assert_eq!(items, vec!["品", "器"]);
    }

    #[test]
    fn test_only_latest_reply_is_returned() {
        let mut worker = SearchWorker::spawn().unwrap();
        worker.init(store()).unwrap();

        worker
            .submit("口口口", SearchMode::PartsToChar, Region::Unrestricted)
            .unwrap();
        let latest = worker
            .submit("日月", SearchMode::PartsToChar, Region::Unrestricted)
            .unwrap();
        assert_eq!(worker.latest_seq(), Some(latest));

        let items = worker.recv_latest().unwrap();
        assert_eq!(items, vec!["明"]);
        // The stale reply was consumed and dropped
        assert!(worker.try_latest().is_none());
    }

    #[test]
    fn test_recv_latest_without_submission_is_empty() {
        let worker = SearchWorker::spawn().unwrap();
        worker.init(store()).unwrap();
        assert_eq!(worker.latest_seq(), None);
        assert!(worker.recv_latest().unwrap().is_empty());
    }

    #[test]
    fn test_recv_timeout_without_submission() {
        let worker = SearchWorker::spawn().unwrap();
        let result = worker
            .recv_latest_timeout(Duration::from_millis(20))
            .unwrap();
        assert!(result.is_none());
    }
}
