//! # Engine Module
//!
//! The ring interaction detector and the plumbing around it.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Detection criteria, perception and batch settings with validating builders
//! - **Ring Contract** ([`rings`]) - The [`rings::RingView`] trait and ligand/receptor role partitioning
//! - **Detection** ([`detector`]) - The pair scan and its report
//! - **Progress Monitoring** ([`progress`]) - Progress reporting callbacks
//! - **Error Handling** ([`error`]) - Engine-specific error types

pub mod config;
pub mod detector;
pub mod error;
pub mod progress;
pub mod rings;
