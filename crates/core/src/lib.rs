//! Domain primitives shared by every callroute crate.
//!
//! Zero internal dependencies: status machine, error type, routing draw,
//! shared-secret comparison and callback payload validation all live here so
//! the store, provider, pipeline and API layers agree on them.

pub mod error;
pub mod routing;
pub mod secret;
pub mod status;
pub mod types;
pub mod webhook;
