//! Configuration management for hostsweep.
//!
//! Provides XDG-compliant settings storage that supplies defaults for the
//! command-line options.

mod settings;

pub use settings::{AppSettings, Paths};
