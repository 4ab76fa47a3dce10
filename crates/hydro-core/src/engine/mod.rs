//! # Engine Module
//!
//! The geometric and numerical algorithms of the pipeline.
//!
//! - [`reduce`] - Reduced-model construction (unified side chains) and
//!   composition accounting
//! - [`mesh`] - Rolling-probe solvent-accessible surface mesh generation
//! - [`hull`] - Convex-hull computation behind an interchangeable backend
//! - [`hydro`] - Closed-form hydrodynamic coefficient calculation
//! - [`error`] - The per-structure error taxonomy

pub mod error;
pub mod hull;
pub mod hydro;
pub mod mesh;
pub mod reduce;
