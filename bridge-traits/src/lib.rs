//! # Host Bridge Traits
//!
//! Platform abstraction traits implemented by the host side of firebreak.
//!
//! ## Overview
//!
//! This crate defines the contract between the core crates (`core-auth`,
//! `provider-box`, `provider-wildfire`) and the concrete adapters that talk to
//! the network and the filesystem. Keeping these behind traits lets every core
//! operation be exercised in tests with `mockall` doubles instead of live
//! Box or WildFire endpoints.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - Single-shot async HTTP requests, with
//!   per-request control over redirect following
//! - [`SecureStore`](storage::SecureStore) - Keyed credential persistence
//!
//! ## Implementations
//!
//! | Trait | Implementation | Crate |
//! |-------|----------------|-------|
//! | `HttpClient` | `ReqwestHttpClient` | `bridge-desktop` |
//! | `SecureStore` | `JsonFileSecureStore` | `bridge-desktop` |
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Adapters
//! should convert library-specific errors to `BridgeError` and keep the
//! offending path or URL in the message.
//!
//! ## Example
//!
//! ```ignore
//! use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest};
//!
//! async fn fetch(client: &dyn HttpClient, token: &str) -> bridge_traits::error::Result<String> {
//!     let request = HttpRequest::new(HttpMethod::Get, "https://api.box.com/2.0/folders/0")
//!         .bearer_token(token);
//!     client.execute(request).await?.text()
//! }
//! ```

pub mod error;
pub mod http;
pub mod storage;

pub use error::BridgeError;

pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use storage::SecureStore;
