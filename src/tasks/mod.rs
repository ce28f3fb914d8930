//! Background Tasks Module
//!
//! Contains background tasks that run alongside cache traffic.
//!
//! # Tasks
//! - TTL Reaper: Removes expired cache entries at the store's reap interval

mod reaper;

pub use reaper::spawn_reaper;
