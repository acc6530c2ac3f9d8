//! Domain core for the vodify conversion pipeline.
//!
//! This crate holds the pieces with real state and failure-handling
//! requirements:
//!
//! - [`status::ConversionStatus`] — the per-event status lifecycle.
//! - [`service::ConversionService`] — the state machine driven by webhook
//!   callbacks from the external converter.
//! - [`materializer::ContentMaterializer`] — turns completion details into
//!   a persisted media asset and an unpublished video record.
//! - [`traits`] — collaborator interfaces (status store, content store,
//!   event directory, thumbnail provider, notification dispatcher). All
//!   I/O lives behind these seams; the core itself performs none.

pub mod completion;
pub mod error;
pub mod materializer;
pub mod service;
pub mod status;
pub mod timecode;
pub mod traits;
pub mod types;

pub use completion::CompletionDetails;
pub use error::CoreError;
pub use materializer::{ContentMaterializer, MaterializationError};
pub use service::{ConversionError, ConversionService};
pub use status::ConversionStatus;
