//! Alert delivery
//!
//! Posts alert messages to a chat webhook (Discord-compatible).

mod webhook;

pub use webhook::*;
