//! Betslip backend API.
//!
//! Provides a reqwest-based client for the generation and profile endpoints
//! and the collaborator traits the generation flow is written against.

mod client;
mod error;
pub mod types;

#[cfg(test)]
mod tests;

pub use client::{ApiClient, GenerationApi, ProfileApi};
pub use error::{ApiError, FailureKind, classify_message};
pub use types::{GenerateRequest, ProfileResponse, RemoteUser};
