#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Pipeline orchestration for the hotspot analysis toolchain.
//!
//! The whole system is a linear pipeline re-run top to bottom for each
//! report: load and clean the CSV, project onto the planar grid, cluster,
//! and freeze the result as an immutable snapshot. The binary in
//! `main.rs` wires the subcommands to this module.

pub mod pipeline;
