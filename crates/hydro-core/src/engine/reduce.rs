use crate::core::models::atom::AtomRecord;
use crate::core::models::reduced::{Composition, ReducedModel};
use crate::core::models::structure::ClassifiedStructure;
use crate::core::tables;
use crate::engine::error::StructuralIntegrityError;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Builds the unified-side-chain reduced model from a classified structure.
///
/// Protein backbone atoms are taken in file order; after the fourth backbone
/// atom of every non-glycine residue, the residue's CB record is inserted with
/// its position displaced to `CA + r·unit(CB − CA)`, where `r` is the radius
/// of a sphere with the residue's side-chain volume. Glycine contributes no
/// pseudo-atom. Nucleic-acid, saccharide and detergent records follow
/// unmodified, in that order.
///
/// # Errors
///
/// Returns [`StructuralIntegrityError`] when backbone atom counts are
/// inconsistent or a non-glycine residue lacks its CB atom. Both are
/// unrecoverable data-quality faults.
pub fn build(structure: &ClassifiedStructure) -> Result<ReducedModel, StructuralIntegrityError> {
    let n_count = structure
        .protein
        .iter()
        .filter(|r| r.name.starts_with('N'))
        .count();
    let ca_count = structure.protein.iter().filter(|r| r.name == "CA").count();
    let o_count = structure
        .protein
        .iter()
        .filter(|r| r.name.starts_with('O'))
        .count();
    if 2 * n_count != ca_count + o_count {
        return Err(StructuralIntegrityError::BackboneCountMismatch {
            n: n_count,
            ca: ca_count,
            o: o_count,
        });
    }

    // Index CB records by residue so pairing never depends on file position.
    let mut cb_by_residue: HashMap<(String, i32), &AtomRecord> = HashMap::new();
    for rec in &structure.protein {
        if rec.name == "CB" {
            cb_by_residue.entry(rec.residue_key()).or_insert(rec);
        }
    }

    let mut entries: Vec<AtomRecord> = Vec::with_capacity(
        structure.protein.len()
            + structure.nucleic.len()
            + structure.saccharide.len()
            + structure.detergent.len(),
    );
    let push = |entries: &mut Vec<AtomRecord>, rec: &AtomRecord| {
        let mut entry = rec.clone();
        entry.index = entries.len();
        entries.push(entry);
    };

    let mut backbone_seen = 0usize;
    let mut last_ca: Option<&AtomRecord> = None;
    for rec in &structure.protein {
        if rec.name == "CB" {
            continue;
        }
        if rec.name == "CA" {
            last_ca = Some(rec);
        }
        push(&mut entries, rec);
        backbone_seen += 1;

        if backbone_seen % 4 == 0 && rec.residue_name != "GLY" {
            let ca = last_ca.ok_or_else(|| StructuralIntegrityError::MissingAlphaCarbon {
                residue_name: rec.residue_name.clone(),
                chain_id: rec.chain_id.clone(),
                residue_number: rec.residue_number,
            })?;
            let cb = cb_by_residue.get(&rec.residue_key()).copied().ok_or_else(|| {
                StructuralIntegrityError::MissingSidechain {
                    residue_name: rec.residue_name.clone(),
                    chain_id: rec.chain_id.clone(),
                    residue_number: rec.residue_number,
                }
            })?;
            let radius = tables::amino_acid(&rec.residue_name)
                .map_or(0.0, |data| data.sidechain_radius);
            let offset = cb.position - ca.position;
            let dist = offset.norm();
            let mut pseudo = cb.clone();
            if dist > f64::EPSILON {
                pseudo.position = ca.position + offset * (radius / dist);
            }
            push(&mut entries, &pseudo);
        }
    }

    for rec in &structure.nucleic {
        push(&mut entries, rec);
    }
    for rec in &structure.saccharide {
        push(&mut entries, rec);
    }
    for rec in &structure.detergent {
        push(&mut entries, rec);
    }

    let composition = tally_composition(structure, &entries);
    debug!(
        entries = entries.len(),
        amino_acids = composition.amino_acids,
        nucleotides = composition.nucleotides,
        "reduced model built"
    );

    Ok(ReducedModel {
        entries,
        composition,
    })
}

/// Accumulates residue tallies, molecular mass and the Cohn-Edsall numerator
/// in a single indexed pass over the reduced model.
fn tally_composition(structure: &ClassifiedStructure, entries: &[AtomRecord]) -> Composition {
    let mut comp = Composition {
        ions: structure.ions,
        ..Composition::default()
    };

    for entry in entries {
        if entry.name == "CA" {
            if let Some(data) = tables::amino_acid(&entry.residue_name) {
                comp.mass += data.mass;
                comp.vbar_numerator += data.mass * data.vbar;
                comp.amino_acids += 1;
            }
        }
    }

    let count_class =
        |records: &[AtomRecord],
         lookup: fn(&str) -> Option<&'static tables::ResidueData>,
         counter: &mut usize,
         mass: &mut f64,
         numerator: &mut f64,
         with_phosphate: bool| {
            let mut seen: HashSet<(String, i32)> = HashSet::new();
            for rec in records {
                if !seen.insert(rec.residue_key()) {
                    continue;
                }
                if let Some(data) = lookup(&rec.residue_name) {
                    *mass += data.mass;
                    *numerator += data.mass * data.vbar;
                    *counter += 1;
                    // A residue whose leading kept atom is the phosphorus
                    // carries a 5' phosphate on top of the nucleoside mass.
                    if with_phosphate && rec.name == "P" {
                        *mass += tables::PHOSPHATE.mass;
                        *numerator += tables::PHOSPHATE.mass * tables::PHOSPHATE.vbar;
                    }
                }
            }
        };

    count_class(
        &structure.nucleic,
        tables::nucleic_acid,
        &mut comp.nucleotides,
        &mut comp.mass,
        &mut comp.vbar_numerator,
        true,
    );
    count_class(
        &structure.saccharide,
        tables::saccharide,
        &mut comp.saccharides,
        &mut comp.mass,
        &mut comp.vbar_numerator,
        false,
    );
    count_class(
        &structure.detergent,
        tables::detergent,
        &mut comp.detergents,
        &mut comp.mass,
        &mut comp.vbar_numerator,
        false,
    );

    // One water of hydrolysis for the protein termini.
    if comp.amino_acids > 0 {
        comp.mass += tables::WATER_MASS;
    }
    // Ion contributions apply to nucleic-acid-containing structures.
    if comp.nucleotides > 0 {
        comp.vbar_numerator += comp.ions.potassium as f64 * tables::K_VOLUME_TERM;
        comp.mass += comp.ions.magnesium as f64 * tables::MG_MASS
            + comp.ions.manganese as f64 * tables::MN_MASS
            + comp.ions.potassium as f64 * tables::K_MASS
            + comp.ions.sodium as f64 * tables::NA_MASS;
    }

    comp
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn record(name: &str, res: &str, num: i32, x: f64, y: f64, z: f64) -> AtomRecord {
        AtomRecord::new(0, name, res, "A", num, Point3::new(x, y, z))
    }

    fn residue(res: &str, num: i32, origin: f64, with_cb: bool) -> Vec<AtomRecord> {
        let mut atoms = vec![
            record("N", res, num, origin, 0.0, 0.0),
            record("CA", res, num, origin + 1.5, 0.0, 0.0),
            record("C", res, num, origin + 2.5, 1.0, 0.0),
            record("O", res, num, origin + 3.5, 1.0, 0.0),
        ];
        if with_cb {
            atoms.push(record("CB", res, num, origin + 1.5, 1.5, 0.0));
        }
        atoms
    }

    fn structure_of(residues: Vec<Vec<AtomRecord>>) -> ClassifiedStructure {
        let protein: Vec<AtomRecord> = residues.into_iter().flatten().collect();
        ClassifiedStructure {
            records: protein.clone(),
            protein,
            ..ClassifiedStructure::default()
        }
    }

    #[test]
    fn non_glycine_residues_yield_five_entries_each() {
        let s = structure_of(vec![
            residue("ALA", 1, 0.0, true),
            residue("SER", 2, 10.0, true),
        ]);
        let model = build(&s).unwrap();
        assert_eq!(model.len(), 10);
        assert_eq!(model.entries[4].name, "CB");
        assert_eq!(model.entries[9].name, "CB");
    }

    #[test]
    fn glycine_contributes_no_pseudo_atom() {
        let s = structure_of(vec![
            residue("GLY", 1, 0.0, false),
            residue("GLY", 2, 10.0, false),
        ]);
        let model = build(&s).unwrap();
        assert_eq!(model.len(), 8);
        assert!(model.entries.iter().all(|e| e.name != "CB"));
    }

    #[test]
    fn pseudo_atom_sits_at_sidechain_radius_from_ca() {
        let s = structure_of(vec![residue("ALA", 1, 0.0, true)]);
        let model = build(&s).unwrap();
        let ca = &model.entries[1];
        let cb = &model.entries[4];
        let dist = (cb.position - ca.position).norm();
        assert!((dist - 1.852).abs() < 1e-9);
    }

    #[test]
    fn missing_backbone_atom_fails_with_count_mismatch() {
        let mut residues = residue("ALA", 1, 0.0, true);
        residues.remove(1); // drop CA
        let s = structure_of(vec![residues]);
        let err = build(&s).unwrap_err();
        assert!(matches!(
            err,
            StructuralIntegrityError::BackboneCountMismatch { n: 1, ca: 0, o: 1 }
        ));
    }

    #[test]
    fn missing_cb_on_non_glycine_fails_with_residue_context() {
        let s = structure_of(vec![residue("ALA", 7, 0.0, false)]);
        let err = build(&s).unwrap_err();
        match err {
            StructuralIntegrityError::MissingSidechain {
                residue_name,
                residue_number,
                ..
            } => {
                assert_eq!(residue_name, "ALA");
                assert_eq!(residue_number, 7);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn molecular_mass_is_residue_sum_plus_one_water() {
        let s = structure_of(vec![
            residue("ALA", 1, 0.0, true),
            residue("GLY", 2, 10.0, false),
        ]);
        let model = build(&s).unwrap();
        let expected = 71.0779 + 57.0513 + 18.0;
        assert!((model.composition.mass - expected).abs() < 1e-9);
        assert_eq!(model.composition.amino_acids, 2);
    }

    #[test]
    fn nucleotide_with_leading_phosphorus_gains_phosphate_mass() {
        let nucleic = vec![
            record("P", "DA", 1, 0.0, 0.0, 0.0),
            record("O5'", "DA", 1, 1.0, 0.0, 0.0),
            record("N1", "DA", 1, 2.0, 0.0, 0.0),
        ];
        let s = ClassifiedStructure {
            records: nucleic.clone(),
            nucleic,
            ..ClassifiedStructure::default()
        };
        let model = build(&s).unwrap();
        assert_eq!(model.composition.nucleotides, 1);
        let expected = 251.25 + 62.97;
        assert!((model.composition.mass - expected).abs() < 1e-9);
    }

    #[test]
    fn ion_masses_count_only_with_nucleotides_present() {
        let mut s = structure_of(vec![residue("ALA", 1, 0.0, true)]);
        s.ions.potassium = 2;
        let model = build(&s).unwrap();
        let expected = 71.0779 + 18.0;
        assert!((model.composition.mass - expected).abs() < 1e-9);
    }

    #[test]
    fn entries_are_renumbered_sequentially() {
        let s = structure_of(vec![
            residue("ALA", 1, 0.0, true),
            residue("GLY", 2, 10.0, false),
        ]);
        let model = build(&s).unwrap();
        for (i, entry) in model.entries.iter().enumerate() {
            assert_eq!(entry.index, i);
        }
    }
}
