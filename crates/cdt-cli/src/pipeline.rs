//! Input resolution and worklist assembly: flags or CMake → files → worklist.
//!
//! Translation units are scanned before headers, each file in the order it
//! was given, so the worklist reads `[tu nodes.., header nodes..]`.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use cdt_cmake::{CmakeApi, CmakeError, pair_sources};
use cdt_core::Worklist;
use cdt_parser::{filter_tests_with_marker, merge};
use cdt_runner::Session;
use cdt_runner::artifact::module_name;

use crate::cli::InputArgs;

/// Files and search locations for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedInputs {
    pub sources: Vec<PathBuf>,
    pub headers: Vec<PathBuf>,
    pub artifact: Option<PathBuf>,
    pub include_dirs: Vec<PathBuf>,
    /// Directory doc node paths are made relative to: the CMake source dir,
    /// else the working directory.
    pub root: Option<PathBuf>,
}

impl ResolvedInputs {
    /// Directories the artifact and the companion header are looked up in:
    /// include dirs, then the artifact's directory, then header directories,
    /// then the working directory.
    pub fn search_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = Vec::new();
        let artifact_dir = self.artifact.as_deref().and_then(Path::parent);
        let header_dirs = self.headers.iter().filter_map(|h| h.parent());
        let candidates = self
            .include_dirs
            .iter()
            .map(PathBuf::as_path)
            .chain(artifact_dir)
            .chain(header_dirs)
            .chain(std::iter::once(Path::new(".")));
        for dir in candidates {
            let dir = if dir.as_os_str().is_empty() {
                PathBuf::from(".")
            } else {
                dir.to_path_buf()
            };
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }
        dirs
    }

    /// Name a file is addressed by in test paths: relative to `root` when it
    /// lies below it, else as given.
    pub fn display_name(&self, path: &Path) -> String {
        self.root
            .as_deref()
            .and_then(|root| path.strip_prefix(root).ok())
            .filter(|relative| !relative.as_os_str().is_empty())
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned()
    }

    /// Stem of the header every case includes: the first explicit header,
    /// else the artifact's module name.
    pub fn module_name(&self) -> Option<String> {
        if let Some(stem) = self.headers.first().and_then(|h| h.file_stem()) {
            return Some(stem.to_string_lossy().into_owned());
        }
        self.artifact.as_deref().map(module_name)
    }
}

/// Combine explicit flags with whatever the CMake target contributes.
pub fn resolve_inputs(args: &InputArgs, header_ext: &str) -> anyhow::Result<ResolvedInputs> {
    let mut inputs = ResolvedInputs {
        sources: args.sources.clone(),
        headers: args.headers.clone(),
        artifact: args.lib.clone(),
        include_dirs: args.include_dirs.clone(),
        root: std::env::current_dir().ok(),
    };

    if let (Some(build_dir), Some(target_name)) = (&args.cmake_build_path, &args.cmake_target) {
        add_cmake_target(&mut inputs, build_dir, target_name, header_ext)?;
    }

    if inputs.sources.is_empty() && inputs.headers.is_empty() {
        bail!("no input files: pass --source/--header or --cmake-build-path with --cmake-target");
    }
    Ok(inputs)
}

fn add_cmake_target(
    inputs: &mut ResolvedInputs,
    build_dir: &Path,
    target_name: &str,
    header_ext: &str,
) -> anyhow::Result<()> {
    let api = match CmakeApi::load(build_dir) {
        Ok(api) => api,
        Err(CmakeError::ReplyNotFound(reply)) => {
            let query = cdt_cmake::write_query(build_dir)?;
            bail!(
                "no CMake file API reply under {}; wrote {}, re-run cmake on {} and try again",
                reply.display(),
                query.display(),
                build_dir.display()
            );
        }
        Err(error) => return Err(error).context("failed to read CMake file API reply"),
    };
    inputs.root = Some(api.source_dir().to_path_buf());
    let target = api.target(target_name)?;
    tracing::info!(
        target = %target.name,
        kind = ?target.kind,
        sources = target.sources.len(),
        "using cmake target"
    );

    for dir in &target.include_dirs {
        if !inputs.include_dirs.contains(dir) {
            inputs.include_dirs.push(dir.clone());
        }
    }
    for pair in pair_sources(&target.sources, &target.include_dirs, header_ext) {
        if !inputs.sources.contains(&pair.source) {
            inputs.sources.push(pair.source);
        }
        if let Some(header) = pair.header
            && !inputs.headers.contains(&header)
        {
            inputs.headers.push(header);
        }
    }
    if inputs.artifact.is_none() {
        inputs.artifact = target.loadable_artifact().map(Path::to_path_buf);
        if inputs.artifact.is_none() {
            tracing::warn!(target = %target.name, "cmake target has no loadable shared library");
        }
    }
    Ok(())
}

/// Attach and extract every input file, translation units first.
pub fn build_worklist(session: &mut Session, inputs: &ResolvedInputs, marker: &str) -> anyhow::Result<Worklist> {
    let mut worklist = Worklist::new();
    for path in inputs.sources.iter().chain(&inputs.headers) {
        let docs = session
            .parser()
            .attach_file_as(path, &inputs.display_name(path))
            .with_context(|| format!("failed to scan {}", path.display()))?;
        let nodes = filter_tests_with_marker(docs, marker);
        tracing::debug!(file = %path.display(), tests = nodes.len(), "scanned file");
        worklist = merge(worklist, nodes);
    }
    tracing::info!(tests = worklist.len(), "worklist assembled");
    Ok(worklist)
}
