//! Merge sort and linear search benchmarking over CSV datasets.
//!
//! The library exposes the sorting/searching [`engine`], the CSV
//! [`dataset`] loader, the [`bench`] harness that times both, and a
//! [`report`] renderer for runtime charts. The `mergebench` binary in
//! [`cli`] wires them together.

pub mod bench;
pub mod cli;
pub mod dataset;
pub mod engine;
pub mod models;
pub mod report;
