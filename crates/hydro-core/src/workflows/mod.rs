//! # Workflows Module
//!
//! End-to-end pipelines assembled from the engine components.
//!
//! - [`compute`] - The load → reduce → mesh → hull → coefficients pipeline
//! - [`export`] - Reduced-model PDB export for visual inspection

pub mod compute;
pub mod export;
