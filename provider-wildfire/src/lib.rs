//! # WildFire Provider
//!
//! Submits Box download URLs to Palo Alto Networks WildFire and looks up
//! the resulting verdicts.

pub mod client;
pub mod error;
pub mod panrc;
pub mod submitter;
pub mod types;

pub use client::WildFireClient;
pub use error::{Result, WildFireError};
pub use panrc::{PanRc, DEFAULT_HOSTNAME};
pub use submitter::{ScanSubmitter, SubmissionResult, VerdictOutcome};
pub use types::{status_reason, UploadFileInfo, Verdict, VerdictInfo};
