//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest`, with a second client that never follows
//!   redirects for requests that opt out
//! - `SecureStore` backed by a single JSON document on disk, created with
//!   owner-only permissions
//! - Search-path helpers shared by the secrets file and `.panrc` lookups
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{JsonFileSecureStore, ReqwestHttpClient};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let http_client = ReqwestHttpClient::new()?;
//!     let store = JsonFileSecureStore::open(&[".".into(), "~".into()], ".firebreak-box.json").await?;
//!     Ok(())
//! }
//! ```

mod http;
mod paths;
mod secure_store;

pub use http::ReqwestHttpClient;
pub use paths::{expand_path, find_in_search_path};
pub use secure_store::JsonFileSecureStore;
