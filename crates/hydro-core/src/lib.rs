//! # Hydro++ Core Library
//!
//! A library for computing hydrodynamic and hydration properties of biological
//! macromolecules from coordinate files, based on the convex-hull (HullRadSAS)
//! method: a reduced-atom model of the molecule is wrapped in a solvent-accessible
//! point mesh, the convex hull of that mesh yields the effective hydrodynamic
//! envelope, and closed-form relations derive the transport coefficients.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a clear
//! separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains stateless data models (`AtomRecord`,
//!   `ReducedModel`, `HydrodynamicResult`), the static physicochemical composition
//!   tables, and structure-file I/O behind a schema-driven parser.
//!
//! - **[`engine`]: The Logic Core.** The geometric and numerical algorithms:
//!   reduced-model construction, rolling-probe surface mesh generation, convex-hull
//!   computation (with interchangeable backends), and the hydrodynamics calculator.
//!
//! - **[`workflows`]: The Public API.** The highest-level, user-facing layer. It
//!   ties the `engine` and `core` together into a single per-structure pipeline:
//!   file → records → reduced model → mesh → hull → coefficient set.

pub mod core;
pub mod engine;
pub mod workflows;
