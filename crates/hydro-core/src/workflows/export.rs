use crate::core::models::reduced::ReducedModel;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes the reduced model as a PDB file for display in a molecular viewer.
///
/// Entries are numbered from one in model order; occupancy and B-factor
/// columns are zeroed.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_model_pdb(model: &ReducedModel, path: impl AsRef<Path>) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_model(model, &mut writer)
}

/// Writes the reduced model in PDB format to any writer.
///
/// # Errors
///
/// Returns an error if a write fails.
pub fn write_model(model: &ReducedModel, writer: &mut impl Write) -> io::Result<()> {
    for entry in &model.entries {
        writeln!(
            writer,
            "ATOM  {:>5}  {:<3} {:>3}{:>2}{:>4}    {:>8.3}{:>8.3}{:>8.3}  0.00  0.00",
            entry.index + 1,
            entry.name,
            entry.residue_name,
            entry.chain_id,
            entry.residue_number,
            entry.position.x,
            entry.position.y,
            entry.position.z,
        )?;
    }
    writeln!(writer, "END")?;
    writer.flush()
}
