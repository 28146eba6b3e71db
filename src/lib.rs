// Copyright 2026 tgvmax-fetch Contributors
// SPDX-License-Identifier: Apache-2.0

//! TGV Max seat-availability fetcher.
//!
//! One invocation retrieves availability for a single
//! origin/destination/date triple, preferring the TGV Max API behind a
//! stealth browser session and falling back to the SNCF Open Data
//! dataset, then emits one normalized JSON object.
//!
//! This library crate exposes the modules for integration testing.

pub mod browser;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod sources;
