//! Spatial conflict detection for land claim boundaries.
//!
//! The [`ConflictDetector`] compares a candidate boundary against every
//! boundary already on file, classifies each overlapping pair by IoU
//! and overlap percentage, and persists a conflict record per pair that
//! crosses a threshold. Detected conflicts fan out through the
//! [`NotificationDispatcher`] to the buyer and, as severity warrants,
//! the registered legal contact and a seller audit flag.
//!
//! Availability is preferred over strict safety on the read side: a
//! storage fault or timeout during the boundary scan produces a
//! clear-with-caveat [`ConflictReport`] instead of blocking intake.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

mod detector;
mod error;
mod notify;
mod report;

pub use detector::ConflictDetector;
pub use error::{ConflictError, ConflictResult};
pub use notify::{
    AlertChannel, AlertReceipt, AlertSink, ChannelOutcome, ConflictAlert, DispatchSummary,
    FailingAlertSink, NotificationDispatcher, RecordingAlertSink,
};
pub use report::ConflictReport;
