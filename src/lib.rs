//! rclookup library
//!
//! Looks up vehicle registration details by scraping record pages, with an
//! in-memory TTL cache in front of the upstream site.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod extract;
pub mod normalize;
pub mod server;
