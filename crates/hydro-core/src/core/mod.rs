//! # Core Module
//!
//! The fundamental building blocks of the hydrodynamics pipeline: immutable data
//! models, the static composition tables, and structure-file I/O.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Per-atom records, the reduced
//!   side-chain model, composition tallies, and the final result record
//! - **Physicochemical Constants** ([`tables`]) - Residue-class tables (mass,
//!   volume, partial specific volume, side-chain sphere radius) and the
//!   electron-weight classification used for radius-of-gyration calculations
//! - **File I/O** ([`io`]) - Schema-driven fixed-column coordinate file parsing
//!   behind a format-polymorphic trait

pub mod io;
pub mod models;
pub mod tables;
