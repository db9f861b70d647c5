//! Network layer - Axora API execution and token acquisition
//!
//! The Network actor receives API commands and sends back responses.

pub mod actor;
pub mod auth;
pub mod client;

pub use actor::NetworkActor;
