//! Resource monitoring module for the volume monitor
//!
//! Measures disk usage of every volume under the monitored root and
//! raises alerts for volumes above the usage threshold.

pub mod disk;
pub mod monitor;

pub use disk::*;
pub use monitor::*;
