//! # Box Provider
//!
//! Read-only access to a Box account for firebreak.
//!
//! ## Overview
//!
//! This module provides:
//! - A connector for folder listings, file metadata and content redirects
//! - `WWW-Authenticate` challenge inspection for rejected tokens
//! - A depth-first folder walker that hands download URLs to a [`FileHandler`]

pub mod connector;
pub mod error;
pub mod types;
pub mod walker;
pub mod www_authenticate;

pub use connector::{BoxConnector, BOX_API_BASE, ROOT_FOLDER_ID};
pub use error::{BoxError, Result};
pub use types::{EntryKind, FileDescriptor, FileInfo, FolderEntry, FolderListing};
pub use walker::{FileHandler, FolderWalker, WalkReport};
pub use www_authenticate::{parse_www_authenticate, AuthChallenge};
