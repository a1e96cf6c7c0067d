//! Firebreak workspace facade.
//!
//! Re-exports the library crates so a host can depend on one package. The
//! desktop bridge and the WildFire provider sit behind the `desktop-shims`
//! and `wildfire` features.

pub use bridge_traits;
pub use core_auth;
pub use core_runtime;
pub use provider_box;

#[cfg(feature = "desktop-shims")]
pub use bridge_desktop;

#[cfg(feature = "wildfire")]
pub use provider_wildfire;
