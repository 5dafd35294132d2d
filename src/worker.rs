//! Off-thread parsing and filtered re-aggregation on tokio.
//!
//! CPU-bound work runs on tokio's blocking pool and reports back over
//! unbounded `mpsc` channels using the closed protocols in
//! [`channel`](crate::channel).
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use chatlens::config::{AnalyticsConfig, ParserConfig};
//! use chatlens::core::filter::FilterPredicate;
//! use chatlens::worker::{FilterWorker, parse_async};
//!
//! # #[tokio::main]
//! # async fn main() -> chatlens::Result<()> {
//! let text = "[01/01/2024, 09:00:00] Alice: hi\n[01/01/2024, 09:05:00] Bob: hey".to_string();
//! let chat = Arc::new(parse_async(text, ParserConfig::default(), None).await?);
//!
//! let mut worker = FilterWorker::open(chat, AnalyticsConfig::default());
//! worker.submit(FilterPredicate::new().with_sender("Alice"))?;
//! worker.submit(FilterPredicate::new().with_sender("Bob"))?;
//!
//! // Only the newest request's answer is surfaced
//! let analytics = worker.next_result().await?;
//! assert_eq!(analytics.message_stats.messages_per_sender["Bob"], 1);
//! worker.close().await?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::{self, JoinHandle};
use tracing::{debug, warn};

use crate::analytics::ProcessedAnalytics;
use crate::channel::{FilterRequest, FilterResponse, LatestWins, ParseCollector, ParseEvent, RequestId};
use crate::config::{AnalyticsConfig, ParserConfig};
use crate::core::filter::{FilterPredicate, analyze_filtered};
use crate::core::models::ParsedChat;
use crate::error::{ChatlensError, Result};
use crate::parser::LogParser;
use crate::progress::ProgressCallback;

/// Starts parsing on the blocking pool and returns the event stream.
///
/// Must be called from within a tokio runtime. Dropping the receiver does
/// not stop the parse; remaining events are discarded.
pub fn stream_parse(text: String, config: ParserConfig) -> mpsc::UnboundedReceiver<ParseEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    task::spawn_blocking(move || {
        LogParser::with_config(config).parse_events(&text, |event| {
            // A closed receiver means the caller lost interest
            let _ = tx.send(event);
        });
    });
    rx
}

/// Parses a transcript off the caller's task.
///
/// `on_progress` is invoked on the caller's task for every progress event.
pub async fn parse_async(
    text: String,
    config: ParserConfig,
    on_progress: Option<ProgressCallback>,
) -> Result<ParsedChat> {
    let mut events = stream_parse(text, config);
    let mut collector = ParseCollector::new();

    while let Some(event) = events.recv().await {
        if let (ParseEvent::Progress(progress), Some(callback)) = (&event, &on_progress) {
            callback(*progress);
        }
        if let Some(result) = collector.push(event) {
            return result;
        }
    }

    Err(ChatlensError::channel(
        "parser task ended without a terminal event",
    ))
}

/// Reads a transcript with tokio's async I/O and parses it.
pub async fn parse_file_async(
    path: impl AsRef<Path>,
    config: ParserConfig,
    on_progress: Option<ProgressCallback>,
) -> Result<ParsedChat> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path).await?;
    parse_async(text, config, on_progress)
        .await
        .map_err(|e| e.with_path(path))
}

/// Filters and re-aggregates on the blocking pool.
pub async fn filter_and_analyze(
    chat: Arc<ParsedChat>,
    predicate: FilterPredicate,
    config: AnalyticsConfig,
) -> Result<ProcessedAnalytics> {
    task::spawn_blocking(move || analyze_filtered(&chat, &predicate, &config))
        .await
        .map_err(|e| ChatlensError::channel(format!("filter task failed: {e}")))?
}

/// Serves repeated filter requests against one chat, surfacing only the
/// newest answer.
///
/// Opened and closed explicitly by its owner. Every submitted request gets
/// exactly one response. Requests already superseded when the worker picks
/// them up are answered with a channel error instead of being computed, and
/// responses to superseded requests are dropped.
pub struct FilterWorker {
    requests: mpsc::UnboundedSender<FilterRequest>,
    responses: mpsc::UnboundedReceiver<FilterResponse>,
    tracker: LatestWins,
    delivered: Option<RequestId>,
    task: JoinHandle<()>,
}

impl FilterWorker {
    /// Starts the worker loop. Must be called from within a tokio runtime.
    pub fn open(chat: Arc<ParsedChat>, config: AnalyticsConfig) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<FilterRequest>();
        let (response_tx, response_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            while let Some(mut request) = request_rx.recv().await {
                // Only the newest queued request is computed; the rest are
                // answered as superseded so each id still gets one response
                while let Ok(newer) = request_rx.try_recv() {
                    let stale = std::mem::replace(&mut request, newer);
                    let _ = response_tx.send(FilterResponse::Error {
                        id: stale.id,
                        error: ChatlensError::channel(format!(
                            "filter request {} superseded by {}",
                            stale.id, request.id
                        )),
                    });
                }

                let FilterRequest { id, predicate } = request;
                let chat = Arc::clone(&chat);
                let config = config.clone();
                let outcome =
                    task::spawn_blocking(move || analyze_filtered(&chat, &predicate, &config))
                        .await;

                let response = match outcome {
                    Ok(Ok(analytics)) => FilterResponse::Result {
                        id,
                        analytics: Box::new(analytics),
                    },
                    Ok(Err(error)) => FilterResponse::Error { id, error },
                    Err(e) => FilterResponse::Error {
                        id,
                        error: ChatlensError::channel(format!("filter request {id} failed: {e}")),
                    },
                };

                if response_tx.send(response).is_err() {
                    debug!("filter response receiver dropped, stopping worker");
                    break;
                }
            }
        });

        debug!("filter worker opened");
        Self {
            requests: request_tx,
            responses: response_rx,
            tracker: LatestWins::new(),
            delivered: None,
            task,
        }
    }

    /// Queues a request, superseding all earlier ones.
    pub fn submit(&mut self, predicate: FilterPredicate) -> Result<RequestId> {
        let id = self.tracker.issue();
        self.requests
            .send(FilterRequest { id, predicate })
            .map_err(|_| ChatlensError::channel("filter worker closed"))?;
        debug!(%id, "filter request submitted");
        Ok(id)
    }

    /// Id of the newest submitted request.
    pub fn latest(&self) -> Option<RequestId> {
        self.tracker.latest()
    }

    /// Waits for the answer to the newest request, dropping stale ones.
    ///
    /// # Errors
    ///
    /// Fails with a channel error when nothing is outstanding or the worker
    /// stopped, and otherwise passes the request's own error through.
    pub async fn next_result(&mut self) -> Result<ProcessedAnalytics> {
        if self.tracker.latest().is_none() || self.tracker.latest() == self.delivered {
            return Err(ChatlensError::channel("no filter request outstanding"));
        }

        while let Some(response) = self.responses.recv().await {
            if let Some(result) = self.settle(response) {
                return result;
            }
        }

        Err(ChatlensError::channel("filter worker stopped"))
    }

    /// Non-blocking variant of [`next_result`](Self::next_result): returns
    /// `None` until the newest answer has arrived.
    pub fn try_next_result(&mut self) -> Option<Result<ProcessedAnalytics>> {
        while let Ok(response) = self.responses.try_recv() {
            if let Some(result) = self.settle(response) {
                return Some(result);
            }
        }
        None
    }

    fn settle(&mut self, response: FilterResponse) -> Option<Result<ProcessedAnalytics>> {
        let id = response.id();
        if !self.tracker.accept(id) {
            debug!(%id, "dropping stale filter response");
            return None;
        }
        self.delivered = Some(id);
        Some(response.into_result())
    }

    /// Stops accepting requests and waits for the loop to finish.
    pub async fn close(self) -> Result<()> {
        let Self {
            requests,
            responses,
            task,
            ..
        } = self;
        drop(requests);
        drop(responses);

        task.await.map_err(|e| {
            warn!(error = %e, "filter worker task failed");
            ChatlensError::channel(format!("filter worker failed: {e}"))
        })?;
        debug!("filter worker closed");
        Ok(())
    }
}
