#![forbid(unsafe_code)]

//! Domain model for the survey application.
//!
//! Everything in this crate is pure data plus invariant checks: surveys and
//! their questions, the per-visitor progress record, and a small clock
//! abstraction for deterministic time in tests. No I/O happens here.

pub mod error;
pub mod model;
pub mod time;

pub use error::Error;
pub use time::Clock;
