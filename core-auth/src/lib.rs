//! # Authentication Module
//!
//! Box OAuth 2.0 credentials for firebreak.
//!
//! ## Overview
//!
//! This module handles the authorization-code flow against the Box token
//! endpoint, the one-shot local callback listener that receives the code,
//! and the tag-keyed credential record the tools persist between runs.
//!
//! ## Features
//!
//! - Authorization URL construction with an anti-forgery state token
//! - Code → refresh token and refresh token → access token exchanges
//! - Single-request callback listener
//! - Tag-scoped credential storage over any `SecureStore`

pub mod authorization;
pub mod callback;
pub mod error;
pub mod oauth;
pub mod token_store;
pub mod types;

pub use authorization::{complete_authorization, refresh_stored_credentials};
pub use callback::{CallbackListener, CallbackOutcome};
pub use error::{AuthError, Result};
pub use oauth::{Exchange, OAuthEndpoints, OAuthFlowManager, RefreshedTokens};
pub use token_store::TokenStore;
pub use types::{CredentialField, CredentialRecord, StateToken, DEFAULT_TAG};
