use crate::core::models::structure::ClassifiedStructure;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for producing a classified atom record set from a
/// coordinate source.
///
/// Implementors handle format-specific parsing; the rest of the pipeline only
/// sees [`ClassifiedStructure`]. A second implementation of this trait is the
/// extension point for additional coordinate formats (e.g. hierarchical
/// formats) without touching any downstream component.
pub trait StructureSource {
    /// The error type for parsing operations.
    type Error: Error + From<io::Error>;

    /// Reads and classifies a structure from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<ClassifiedStructure, Self::Error>;

    /// Reads and classifies a structure from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<ClassifiedStructure, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}
