//! Cache module for memoizing lookup results
//!
//! This module provides an in-memory cache with a fixed TTL (time-to-live).
//! Expiry is checked lazily on read; nothing survives a restart.

mod manager;

pub use manager::TtlCache;
