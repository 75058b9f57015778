//! Shared domain types for the CodeMate Studio core.
//!
//! This crate holds the vocabulary both subsystems speak:
//! - `envelope` — the provider/action/payload request envelope and the
//!   uniform success/failure response returned by the secret broker
//! - `collab` — collaborator roster records published by the
//!   collaboration-state service
//! - `session` — the session credential and the store seam the proxy
//!   reads it through

pub mod collab;
pub mod envelope;
pub mod session;

pub use collab::{Collaborator, CursorPos};
pub use envelope::{BrokerRequest, BrokerResponse, Provider, Usage};
pub use session::{Session, SessionStore};
