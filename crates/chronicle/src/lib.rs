// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! chronicle library
//!
//! This module exports the core functionality of chronicle for use in
//! integration tests and as a library: read a repository's recent history,
//! analyze every commit, and render the results as a narrative.

pub mod config;
pub mod error;
pub mod generate;
pub mod report;

pub use error::ChronicleError;
pub use generate::{GenerateOptions, generate, generate_stream};
pub use report::{ColorChoice, Report, ReportFormat};
