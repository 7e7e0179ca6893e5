//! Event source over directories of CloudTrail JSON exports.
//!
//! [`source`] turns a directory of `.json` / `.json.gz` files into an ordered
//! stream of timestamped records, [`extract`] answers field queries and
//! renders records, and [`plugin`] wraps both behind the host's
//! open/next/close lifecycle.

pub mod cli;
pub mod config;
pub mod extract;
pub mod plugin;
pub mod source;
