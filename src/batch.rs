// batch.rs - Batch driver
//
// Pipeline per input file:
//   1. Load image into a pixel array
//   2. Threshold into an elevation surface
//   3. Write the surface grid (.dat)
//   4. Write the OpenSCAD wrapper (.scad)
//   5. Compile to a mesh (.stl)
//
// Files are independent: each gets its own outcome and a failure does not
// stop the batch unless fail_fast is set. An existing mesh is a skip.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info, warn};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::compiler::MeshCompiler;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::pixels::load_pixels;
use crate::scad::{save_scad, ScadParams};
use crate::surface::{generate_surface, save_surface};

pub const SURFACE_EXT: &str = "dat";
pub const SCAD_EXT: &str = "scad";
pub const MESH_EXT: &str = "stl";

// ============================================================================
// Paths
// ============================================================================

/// Absolute output directories, created on demand
#[derive(Clone, Debug)]
pub struct OutputDirs {
    pub surface: PathBuf,
    pub scad: PathBuf,
    pub model: PathBuf,
}

/// Every artifact path for one input image
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobPaths {
    pub input: PathBuf,
    pub name: String,
    pub surface: PathBuf,
    pub scad: PathBuf,
    pub mesh: PathBuf,
}

impl JobPaths {
    /// `<dir>/<stem>.<ext>` for each artifact
    pub fn for_input(input: &Path, dirs: &OutputDirs) -> Self {
        let name = input.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        Self {
            input: input.to_path_buf(),
            surface: dirs.surface.join(format!("{name}.{SURFACE_EXT}")),
            scad: dirs.scad.join(format!("{name}.{SCAD_EXT}")),
            mesh: dirs.model.join(format!("{name}.{MESH_EXT}")),
            name,
        }
    }
}

/// Create the output directories and resolve them to absolute paths.
///
/// Scripts reference the surface file by this absolute path, so OpenSCAD
/// finds it no matter where the script lives.
pub fn prepare_dirs(cfg: &Config) -> Result<OutputDirs> {
    let make = |dir: &Path| -> Result<PathBuf> {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        fs::canonicalize(dir).map_err(|e| Error::io(dir, e))
    };
    Ok(OutputDirs {
        surface: make(&cfg.surface_dir)?,
        scad: make(&cfg.scad_dir)?,
        model: make(&cfg.output_dir)?,
    })
}

/// One entry of the input directory
#[derive(Debug)]
pub enum InputEntry {
    File(PathBuf),
    /// Listed but unreadable, e.g. a dangling symlink
    Broken(PathBuf, Error),
}

impl InputEntry {
    pub fn path(&self) -> &Path {
        match self {
            InputEntry::File(path) => path,
            InputEntry::Broken(path, _) => path,
        }
    }
}

/// Regular, non-hidden entries directly inside `dir`, sorted by name.
///
/// Only a failure to read `dir` itself is an error; an entry that cannot be
/// resolved is returned as `Broken` so it fails on its own.
pub fn collect_inputs(dir: &Path) -> Result<Vec<InputEntry>> {
    let mut inputs = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(Error::io(dir, e.into())),
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
                if !is_hidden(&path) {
                    inputs.push(InputEntry::Broken(path.clone(), Error::io(path, e.into())));
                }
                continue;
            }
        };
        if !entry.file_type().is_file() { continue; }
        if is_hidden(entry.path()) { continue; }
        inputs.push(InputEntry::File(entry.into_path()));
    }
    inputs.sort_by(|a, b| a.path().file_name().cmp(&b.path().file_name()));
    Ok(inputs)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name().is_some_and(|n| n.to_string_lossy().starts_with('.'))
}

// ============================================================================
// Outcomes
// ============================================================================

/// Pipeline step a file was in when it failed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Plan,
    Load,
    Surface,
    Write,
    Script,
    Build,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Plan => "plan",
            Stage::Load => "load",
            Stage::Surface => "surface",
            Stage::Write => "write",
            Stage::Script => "script",
            Stage::Build => "build",
        };
        f.write_str(s)
    }
}

#[derive(Debug)]
pub enum FileOutcome {
    Built { input: PathBuf, mesh: PathBuf },
    Skipped { input: PathBuf, mesh: PathBuf },
    Failed { input: PathBuf, stage: Stage, error: Error },
}

impl FileOutcome {
    pub fn input(&self) -> &Path {
        match self {
            FileOutcome::Built { input, .. } => input,
            FileOutcome::Skipped { input, .. } => input,
            FileOutcome::Failed { input, .. } => input,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FileOutcome::Failed { .. })
    }
}

/// Per-file results of one batch run, in input order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
    /// Files left untouched because fail_fast stopped the run
    pub not_run: usize,
}

impl BatchReport {
    pub fn built(&self) -> usize {
        self.outcomes.iter().filter(|o| matches!(o, FileOutcome::Built { .. })).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.iter().filter(|o| matches!(o, FileOutcome::Skipped { .. })).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.not_run == 0
    }

    pub fn log_summary(&self) {
        for o in &self.outcomes {
            if let FileOutcome::Failed { input, stage, error } = o {
                error!("{} failed at {}: {}", input.display(), stage, error);
            }
        }
        if self.not_run > 0 {
            warn!("Stopped early, {} file(s) not processed", self.not_run);
        }
        info!("{} built, {} skipped, {} failed", self.built(), self.skipped(), self.failed());
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Run the full pipeline for one file
pub fn process_file(job: &JobPaths, cfg: &Config, compiler: &dyn MeshCompiler) -> FileOutcome {
    let input = job.input.clone();

    if !cfg.force && job.mesh.exists() {
        info!("\"{}.{MESH_EXT}\" exists... Skip", job.name);
        return FileOutcome::Skipped { input, mesh: job.mesh.clone() };
    }

    info!("Processing \"{}\"...", file_name(&job.input));
    match build(job, cfg, compiler) {
        Ok(mesh) => {
            info!("Complete building .stl file. (\"{}\")", file_name(&mesh));
            FileOutcome::Built { input, mesh }
        }
        Err((stage, error)) => {
            warn!("{} failed at {}: {}", file_name(&job.input), stage, error);
            FileOutcome::Failed { input, stage, error }
        }
    }
}

fn build(
    job: &JobPaths,
    cfg: &Config,
    compiler: &dyn MeshCompiler,
) -> std::result::Result<PathBuf, (Stage, Error)> {
    let pixels = load_pixels(&job.input).map_err(|e| (Stage::Load, e))?;
    let surface = generate_surface(&pixels, cfg.threshold).map_err(|e| (Stage::Surface, e))?;
    save_surface(&job.surface, &surface).map_err(|e| (Stage::Write, e))?;

    let params = ScadParams::new(cfg.dpi, cfg.height, surface.dim());
    save_scad(&job.scad, &job.surface, &params).map_err(|e| (Stage::Script, e))?;

    compiler.compile(&job.scad, &job.mesh).map_err(|e| (Stage::Build, e.into()))
}

/// A file ready to run, or one that already failed while planning
enum Planned {
    Run(JobPaths),
    Done(FileOutcome),
}

impl Planned {
    fn run(self, cfg: &Config, compiler: &dyn MeshCompiler) -> FileOutcome {
        match self {
            Planned::Run(job) => process_file(&job, cfg, compiler),
            Planned::Done(outcome) => outcome,
        }
    }
}

fn plan(inputs: Vec<InputEntry>, dirs: &OutputDirs) -> Vec<Planned> {
    // Two inputs sharing a stem would write the same artifacts
    let mut seen: HashMap<String, PathBuf> = HashMap::new();
    let mut planned = Vec::with_capacity(inputs.len());

    for entry in inputs {
        let input = match entry {
            InputEntry::File(input) => input,
            InputEntry::Broken(input, error) => {
                warn!("{} failed at {}: {}", input.display(), Stage::Load, error);
                let failed = FileOutcome::Failed { input, stage: Stage::Load, error };
                planned.push(Planned::Done(failed));
                continue;
            }
        };

        let job = JobPaths::for_input(&input, dirs);
        if let Some(first) = seen.get(&job.name) {
            let error = Error::invalid_parameter(format!(
                "output name `{}` already used by {}",
                job.name,
                first.display()
            ));
            planned.push(Planned::Done(FileOutcome::Failed { input, stage: Stage::Plan, error }));
            continue;
        }
        seen.insert(job.name.clone(), input);
        planned.push(Planned::Run(job));
    }
    planned
}

/// Process every image in the input directory
pub fn run_batch(cfg: &Config, compiler: &dyn MeshCompiler) -> Result<BatchReport> {
    cfg.validate()?;
    let inputs = collect_inputs(&cfg.input_dir)?;
    let dirs = prepare_dirs(cfg)?;
    info!("Found {} input file(s) in {}", inputs.len(), cfg.input_dir.display());

    let planned = plan(inputs, &dirs);
    let mut report = BatchReport::default();

    if cfg.jobs > 1 && !cfg.fail_fast {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(cfg.jobs)
            .build()
            .map_err(|e| Error::config(format!("cannot start worker pool: {e}")))?;
        report.outcomes = pool.install(|| {
            planned.into_par_iter().map(|p| p.run(cfg, compiler)).collect()
        });
    } else {
        let total = planned.len();
        for (i, p) in planned.into_iter().enumerate() {
            let outcome = p.run(cfg, compiler);
            let stop = cfg.fail_fast && outcome.is_failed();
            report.outcomes.push(outcome);
            if stop {
                report.not_run = total - i - 1;
                break;
            }
        }
    }

    Ok(report)
}

fn file_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}
