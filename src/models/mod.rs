//! Data models for the volume monitor
//!
//! Volumes, usage samples, alert messages and the shared error type.

mod alert;
mod error;
mod volume;

pub use alert::*;
pub use error::*;
pub use volume::*;
