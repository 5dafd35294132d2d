//! Progress reporting for long-running parses.
//!
//! The parser pushes a [`Progress`] snapshot after every batch, both as a
//! [`ParseEvent::Progress`](crate::channel::ParseEvent::Progress) on the
//! event stream and through an optional [`ProgressCallback`].
//!
//! # Example
//!
//! ```rust
//! use chatlens::progress::{Progress, ProgressCallback};
//! use std::sync::Arc;
//!
//! let callback: ProgressCallback = Arc::new(|progress| {
//!     println!("Progress: {:.1}%", progress.percentage());
//! });
//!
//! let total_bytes = 1000u64;
//! for i in 0..10usize {
//!     let bytes_processed = ((i + 1) * 100) as u64;
//!     callback(Progress::new(bytes_processed, total_bytes, i + 1));
//! }
//! ```

use std::sync::Arc;

/// Snapshot of how far a parse has advanced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    /// Bytes of transcript consumed so far.
    pub bytes_processed: u64,

    /// Transcript size in bytes.
    pub total_bytes: u64,

    /// Entities (messages and calls) produced so far.
    pub entities: usize,
}

impl Progress {
    /// Creates a new progress snapshot.
    pub fn new(bytes_processed: u64, total_bytes: u64, entities: usize) -> Self {
        Self {
            bytes_processed,
            total_bytes,
            entities,
        }
    }

    /// Returns the consumed share of the input in `[0.0, 1.0]`.
    ///
    /// An empty input counts as fully consumed.
    ///
    /// ```rust
    /// use chatlens::progress::Progress;
    ///
    /// assert_eq!(Progress::new(250, 1000, 3).fraction(), 0.25);
    /// assert_eq!(Progress::new(0, 0, 0).fraction(), 1.0);
    /// ```
    pub fn fraction(&self) -> f64 {
        if self.total_bytes == 0 {
            1.0
        } else {
            (self.bytes_processed as f64 / self.total_bytes as f64).clamp(0.0, 1.0)
        }
    }

    /// Returns the progress as a percentage (0.0 - 100.0).
    pub fn percentage(&self) -> f64 {
        self.fraction() * 100.0
    }

    /// Returns whether the whole input has been consumed.
    pub fn is_complete(&self) -> bool {
        self.bytes_processed >= self.total_bytes
    }
}

/// Callback type for receiving progress updates.
///
/// Invoked from the parsing thread, so it must be `Send + Sync`.
pub type ProgressCallback = Arc<dyn Fn(Progress) + Send + Sync>;

/// Creates a progress callback that prints to stderr.
///
/// ```rust
/// use chatlens::progress::{Progress, stderr_progress};
///
/// let callback = stderr_progress();
/// // Prints "Parsing: 50.0% (0 entries)" to stderr
/// callback(Progress::new(500, 1000, 0));
/// ```
pub fn stderr_progress() -> ProgressCallback {
    Arc::new(|progress| {
        eprint!(
            "\rParsing: {:.1}% ({} entries)",
            progress.percentage(),
            progress.entities
        );
        if progress.is_complete() {
            eprintln!();
        }
    })
}
