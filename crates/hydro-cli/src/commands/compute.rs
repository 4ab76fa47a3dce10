use crate::cli::ComputeArgs;
use crate::error::{CliError, Result};
use hydropp::engine::error::EngineError;
use hydropp::engine::mesh::MeshConfig;
use hydropp::workflows::compute::{ComputeConfig, ComputeOutput, HullEngine};
use hydropp::workflows::{compute, export};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub fn run(args: ComputeArgs) -> Result<()> {
    if !(args.probe_radius > 0.0) {
        return Err(CliError::Argument(
            "probe radius must be positive".to_string(),
        ));
    }
    if args.mesh_points < 3 {
        return Err(CliError::Argument(
            "at least 3 mesh points per sphere are required".to_string(),
        ));
    }

    let files = expand_inputs(&args.inputs)?;
    if files.is_empty() {
        return Err(CliError::Argument(
            "no PDB files found among the given inputs".to_string(),
        ));
    }
    info!("Processing {} structure file(s).", files.len());

    let config = ComputeConfig {
        mesh: MeshConfig {
            probe_radius: args.probe_radius,
            n_points: args.mesh_points,
        },
        hull: match &args.qconvex {
            Some(path) => HullEngine::Qconvex {
                executable: path.clone(),
            },
            None => HullEngine::QuickHull,
        },
    };

    let progress = ProgressBar::new(files.len() as u64).with_style(
        ProgressStyle::with_template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    progress.set_draw_target(indicatif::ProgressDrawTarget::stderr());

    let outcomes: Vec<(PathBuf, std::result::Result<ComputeOutput, EngineError>)> = files
        .par_iter()
        .map(|path| {
            let outcome = compute::run_path(path, &config);
            if let (Ok(output), true) = (&outcome, args.dump_model) {
                let model_path = path.with_extension("model.pdb");
                if let Err(e) = export::write_model_pdb(&output.model, &model_path) {
                    warn!(path = %model_path.display(), "failed to write reduced model: {e}");
                }
            }
            progress.inc(1);
            (path.clone(), outcome)
        })
        .collect();
    progress.finish_and_clear();

    // A single failing input is an error in its own right; in a batch,
    // failures are logged and skipped so one bad file cannot sink the rest.
    let single_input = outcomes.len() == 1;

    let mut report: BTreeMap<String, serde_json::Value> = BTreeMap::new();
    let mut failures = 0usize;
    for (path, outcome) in outcomes {
        match outcome {
            Ok(output) => {
                let value = if args.rht_only {
                    serde_json::json!({
                        "translational_radius": output.result.translational_radius,
                    })
                } else {
                    serde_json::to_value(&output.result)
                        .map_err(|e| CliError::Other(e.into()))?
                };
                report.insert(key_for(&path, &report), value);
            }
            Err(source) => {
                if single_input {
                    return Err(CliError::Structure { path, source });
                }
                failures += 1;
                warn!(path = %path.display(), "structure skipped: {source}");
            }
        }
    }

    if report.is_empty() {
        return Err(CliError::Argument(format!(
            "all {failures} structure(s) failed; nothing to report"
        )));
    }
    if failures > 0 {
        warn!("{failures} structure(s) failed and were skipped.");
    }

    let rendered =
        serde_json::to_string_pretty(&report).map_err(|e| CliError::Other(e.into()))?;
    match &args.output {
        Some(path) => {
            fs::write(path, rendered)?;
            info!("Results written to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{rendered}")?;
        }
    }

    Ok(())
}

/// Expands file and directory arguments into a sorted, deduplicated list of
/// PDB files. Directories are scanned one level deep for `.pdb` and `.ent`
/// entries.
fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in fs::read_dir(input)? {
                let path = entry?.path();
                if path.is_file() && has_structure_extension(&path) {
                    files.push(path);
                }
            }
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            return Err(CliError::Argument(format!(
                "input path does not exist: {}",
                input.display()
            )));
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn has_structure_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdb") || e.eq_ignore_ascii_case("ent"))
}

/// File stem as the report key; falls back to the full path on collision.
fn key_for(path: &Path, report: &BTreeMap<String, serde_json::Value>) -> String {
    let stem = path
        .file_stem()
        .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned());
    if report.contains_key(&stem) {
        path.display().to_string()
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn directories_expand_to_structure_files_only() {
        let dir = tempdir().unwrap();
        for name in ["a.pdb", "b.ent", "c.PDB", "notes.txt"] {
            File::create(dir.path().join(name)).unwrap();
        }
        let files = expand_inputs(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.pdb", "b.ent", "c.PDB"]);
    }

    #[test]
    fn missing_inputs_are_an_argument_error() {
        let err = expand_inputs(&[PathBuf::from("/no/such/file.pdb")]).unwrap_err();
        assert!(matches!(err, CliError::Argument(_)));
    }

    #[test]
    fn duplicate_explicit_files_are_deduplicated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x.pdb");
        File::create(&path).unwrap();
        let files = expand_inputs(&[path.clone(), path]).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn report_keys_fall_back_to_full_paths_on_stem_collision() {
        let mut report = BTreeMap::new();
        let first = PathBuf::from("/a/protein.pdb");
        let second = PathBuf::from("/b/protein.pdb");
        let k1 = key_for(&first, &report);
        report.insert(k1.clone(), serde_json::Value::Null);
        let k2 = key_for(&second, &report);
        assert_eq!(k1, "protein");
        assert_eq!(k2, "/b/protein.pdb");
    }
}
