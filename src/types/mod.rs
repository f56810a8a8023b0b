//! Core type definitions using newtype patterns for type safety.
//!
//! These types keep invalid ranges and malformed hardware addresses out of
//! the pipeline at construction time.

mod range;
mod record;

pub use range::HostRange;
pub use record::{
    completion_time, DiscoveryMethod, HardwareAddress, HostRecord, PassiveEvidence,
    PassiveSnapshot,
};
