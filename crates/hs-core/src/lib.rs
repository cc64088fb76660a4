//! Hall Scout Core Library
//!
//! Estimates the hidden payout setting (1–6) of slot machines from public
//! play counts, and summarises the estimates across a hall:
//! - Probability model built from the spec table
//! - Record normalization and source adapters
//! - Posterior estimation per observation
//! - Aggregation, island detection, and the hall report
//! - CSV export, logging, and exit codes
//!
//! The binary entry point is in `main.rs`.

pub mod aggregate;
pub mod config;
pub mod exit_codes;
pub mod export;
pub mod inference;
pub mod layout;
pub mod logging;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod source;
