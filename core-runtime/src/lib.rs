//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for firebreak:
//! - Logging and tracing infrastructure
//! - Configuration management
//!
//! ## Overview
//!
//! Every other crate reads endpoints and file locations from
//! [`config::CoreConfig`], and every binary calls [`logging::init_logging`]
//! before doing any work.

pub mod config;
pub mod error;
pub mod logging;

pub use config::CoreConfig;
pub use error::{Error, Result};
