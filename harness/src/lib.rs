//! Starpath Harness: orchestration around the kernel and the search.
//!
//! The harness loads worlds, runs the search, replay-verifies every returned
//! path, and packages the result as a canonical, digest-stamped report. It
//! also hosts the pieces an interactive front end needs: a background
//! worker and a playback cursor.
//!
//! The harness does NOT implement search rules; it delegates to
//! `starpath-search`.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod playback;
pub mod report_dir;
pub mod runner;
pub mod worker;
pub mod worlds;
