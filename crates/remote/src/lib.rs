//! `fretdesk-remote` — the submission adapter.
//!
//! Maps the in-memory document into the remote API's payload shape, sends it
//! with a bearer token, and turns structured validation failures into
//! per-field messages instead of one opaque toast. Also fetches the
//! session's tax catalog.

pub mod client;
pub mod error;
pub mod payload;

pub use client::ApiClient;
pub use error::RemoteError;
pub use payload::{to_payload, OrdrePayload};
