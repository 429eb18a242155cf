//! Code-model access: configurations, targets and their artifacts.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CmakeError;
use crate::query::reply_dir;
use crate::reply::{self, Codemodel, CodemodelPaths, Target};

/// CMake target type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Executable,
    StaticLibrary,
    SharedLibrary,
    ModuleLibrary,
    ObjectLibrary,
    InterfaceLibrary,
    Utility,
}

impl TargetKind {
    /// Map the file-API `type` string. Unknown types are treated as
    /// [`Utility`](Self::Utility), which never provides a loadable artifact.
    #[must_use]
    pub fn from_cmake(kind: &str) -> Self {
        match kind {
            "EXECUTABLE" => Self::Executable,
            "STATIC_LIBRARY" => Self::StaticLibrary,
            "SHARED_LIBRARY" => Self::SharedLibrary,
            "MODULE_LIBRARY" => Self::ModuleLibrary,
            "OBJECT_LIBRARY" => Self::ObjectLibrary,
            "INTERFACE_LIBRARY" => Self::InterfaceLibrary,
            _ => Self::Utility,
        }
    }

    /// Whether the target's own artifact can be loaded into an interpreter.
    #[must_use]
    pub const fn is_loadable(self) -> bool {
        matches!(self, Self::SharedLibrary | Self::ModuleLibrary)
    }
}

/// A shared library a target depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedLibrary {
    pub name: String,
    pub artifact: PathBuf,
}

/// Everything a doctest run needs to know about one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetInfo {
    pub name: String,
    pub kind: TargetKind,
    /// Absolute path of the target's primary artifact, if it has one.
    pub artifact: Option<PathBuf>,
    /// Absolute include directories, de-duplicated in first-seen order.
    pub include_dirs: Vec<PathBuf>,
    /// Absolute source file paths.
    pub sources: Vec<PathBuf>,
    pub shared_libs: Vec<LinkedLibrary>,
}

impl TargetInfo {
    /// The library an interpreter should load for this target: its own
    /// artifact for shared and module libraries, otherwise the first shared
    /// library it links.
    #[must_use]
    pub fn loadable_artifact(&self) -> Option<&Path> {
        if self.kind.is_loadable() {
            return self.artifact.as_deref();
        }
        self.shared_libs.first().map(|lib| lib.artifact.as_path())
    }
}

/// Loaded code model of one build directory.
#[derive(Debug, Clone)]
pub struct CmakeApi {
    paths: CodemodelPaths,
    configurations: Vec<LoadedConfiguration>,
    current: usize,
}

#[derive(Debug, Clone)]
struct LoadedConfiguration {
    name: String,
    targets: Vec<TargetInfo>,
}

impl CmakeApi {
    /// Read the newest reply under `build_dir`. The first configuration is
    /// selected.
    ///
    /// # Errors
    ///
    /// [`CmakeError::ReplyNotFound`] when cmake has not answered a query yet,
    /// [`CmakeError::Json`] / [`CmakeError::Io`] for unreadable reply files.
    pub fn load(build_dir: &Path) -> Result<Self, CmakeError> {
        let reply_dir = reply_dir(build_dir);
        let index_path = reply::latest_index(&reply_dir)?;
        let index: reply::Index = reply::read_json(&index_path)?;
        let codemodel_ref = index
            .reply
            .codemodel
            .ok_or_else(|| CmakeError::ReplyNotFound(reply_dir.clone()))?;
        let codemodel: Codemodel = reply::read_json(&reply_dir.join(codemodel_ref.json_file))?;

        let mut configurations = Vec::with_capacity(codemodel.configurations.len());
        for config in codemodel.configurations {
            let mut raw = Vec::with_capacity(config.targets.len());
            for target_ref in &config.targets {
                let target: Target = reply::read_json(&reply_dir.join(&target_ref.json_file))?;
                raw.push((target_ref.id.clone(), target));
            }
            configurations.push(LoadedConfiguration {
                name: config.name,
                targets: resolve_targets(&codemodel.paths, &raw),
            });
        }

        tracing::debug!(
            build = %codemodel.paths.build.display(),
            configurations = configurations.len(),
            "loaded cmake code model"
        );
        Ok(Self {
            paths: codemodel.paths,
            configurations,
            current: 0,
        })
    }

    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.paths.source
    }

    #[must_use]
    pub fn build_dir(&self) -> &Path {
        &self.paths.build
    }

    /// Names of all configurations, e.g. `Debug`, `Release`.
    #[must_use]
    pub fn configurations(&self) -> Vec<&str> {
        self.configurations.iter().map(|c| c.name.as_str()).collect()
    }

    /// Name of the selected configuration (empty for single-config
    /// generators without `CMAKE_BUILD_TYPE`).
    #[must_use]
    pub fn configuration(&self) -> &str {
        self.configurations
            .get(self.current)
            .map_or("", |c| c.name.as_str())
    }

    /// # Errors
    ///
    /// [`CmakeError::ConfigurationNotFound`] for an unknown name.
    pub fn select_configuration(&mut self, name: &str) -> Result<(), CmakeError> {
        let index = self
            .configurations
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| CmakeError::ConfigurationNotFound(name.to_string()))?;
        self.current = index;
        Ok(())
    }

    /// Targets of the selected configuration.
    #[must_use]
    pub fn targets(&self) -> &[TargetInfo] {
        self.configurations
            .get(self.current)
            .map(|c| c.targets.as_slice())
            .unwrap_or_default()
    }

    /// # Errors
    ///
    /// [`CmakeError::TargetNotFound`] when no target has that name.
    pub fn target(&self, name: &str) -> Result<&TargetInfo, CmakeError> {
        self.targets()
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| CmakeError::TargetNotFound(name.to_string()))
    }

    /// The first target compiling a source whose path ends with `source`.
    #[must_use]
    pub fn target_for_source(&self, source: &Path) -> Option<&TargetInfo> {
        self.targets()
            .iter()
            .find(|t| t.sources.iter().any(|s| s.ends_with(source)))
    }
}

fn resolve_targets(paths: &CodemodelPaths, raw: &[(String, Target)]) -> Vec<TargetInfo> {
    let shared_by_id: HashMap<&str, LinkedLibrary> = raw
        .iter()
        .filter(|(_, t)| TargetKind::from_cmake(&t.kind) == TargetKind::SharedLibrary)
        .filter_map(|(id, t)| {
            let artifact = t.artifacts.first()?;
            Some((
                id.as_str(),
                LinkedLibrary {
                    name: t.name.clone(),
                    artifact: paths.build.join(&artifact.path),
                },
            ))
        })
        .collect();

    raw.iter()
        .map(|(_, target)| {
            let mut include_dirs: Vec<PathBuf> = Vec::new();
            for include in target.compile_groups.iter().flat_map(|g| &g.includes) {
                let dir = paths.source.join(&include.path);
                if !include_dirs.contains(&dir) {
                    include_dirs.push(dir);
                }
            }
            TargetInfo {
                name: target.name.clone(),
                kind: TargetKind::from_cmake(&target.kind),
                artifact: target.artifacts.first().map(|a| paths.build.join(&a.path)),
                include_dirs,
                sources: target
                    .sources
                    .iter()
                    .map(|s| paths.source.join(&s.path))
                    .collect(),
                shared_libs: target
                    .dependencies
                    .iter()
                    .filter_map(|d| shared_by_id.get(d.id.as_str()).cloned())
                    .collect(),
            }
        })
        .collect()
}
