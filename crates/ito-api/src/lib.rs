//! ito-api: HTTP API layer for the ITO claim calculator
//!
//! Stateless endpoints a front end calls to drive the claim dialog. The
//! session state round-trips through the client; the server only holds
//! configuration.

pub mod dto;
pub mod routes;
pub mod server;
pub mod state;

pub use server::*;
pub use state::{AppState, StateError};
