//! Betslip CLI Library
//!
//! Client side of the betslip generator: talks to the generation and profile
//! endpoints, keeps the session snapshot, and stores saved betslips locally.

pub mod api;
pub mod auth_cmd;
pub mod fmt;
pub mod generate;
pub mod history_cmd;
pub mod session;
pub mod storage;
