//! # Core Models Module
//!
//! Data structures flowing through the pipeline, from raw coordinate records to
//! the final coefficient set.
//!
//! ## Key Components
//!
//! - [`atom`] - Immutable per-atom coordinate records and element classification
//! - [`structure`] - The classified output of the structure loader
//! - [`reduced`] - The unified-side-chain reduced model and composition tallies
//! - [`result`] - The complete hydrodynamic result record

pub mod atom;
pub mod reduced;
pub mod result;
pub mod structure;
