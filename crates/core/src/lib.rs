//! Core business logic for Fintrack.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All posting arithmetic, balance verification, and category
//! path resolution live here.
//!
//! # Modules
//!
//! - `ledger` - Running-balance posting planner and verification

pub mod ledger;
