//! # File I/O Module
//!
//! Structure-file parsing behind a format-polymorphic trait.
//!
//! - [`traits`] - The `StructureSource` capability: produce a classified atom
//!   record set from a reader
//! - [`pdb`] - Fixed-column PDB text implementation with an explicit
//!   field-to-column schema

pub mod pdb;
pub mod traits;
