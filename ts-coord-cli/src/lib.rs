//! `ts-coord-cli`: a command-line harness for the timestamp coordinator.
//!
//! ## Getting started
//!
//! ```doc
//! ❯ ts-coord-cli demo
//! set-timestamp  oldest_timestamp=5,stable_timestamp=a,commit_timestamp=f -> ok
//! query-timestamp get=pinned -> 5
//! ```

pub mod config;
pub mod trace;
