//! Entity model, filtering and output.
//!
//! - [`models`] - Messages, calls, participants and chat metadata
//! - [`filter`] - Entity selection and filtered re-aggregation
//! - [`output`] - Format writers (JSON, CSV)

pub mod filter;
pub mod models;
pub mod output;

pub use filter::{EntryType, FilterPredicate, FilteredView, analyze_filtered, apply_filter};
pub use models::{
    Call, CallKind, CallStatus, ChatMetadata, ChatType, DateRange, MediaKind, Message,
    MessageKind, MessageMetadata, ParsedChat, Participant,
};
pub use output::Report;

#[cfg(feature = "csv-output")]
pub use output::{calls_to_csv, to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use output::{to_json, write_json};
