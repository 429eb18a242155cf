//! Serde model of the parts of the file-API reply that are read.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::CmakeError;

#[derive(Debug, Deserialize)]
pub(crate) struct Index {
    pub reply: IndexReply,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IndexReply {
    #[serde(rename = "codemodel-v2")]
    pub codemodel: Option<ReplyRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReplyRef {
    pub json_file: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Codemodel {
    pub paths: CodemodelPaths,
    pub configurations: Vec<Configuration>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CodemodelPaths {
    pub source: PathBuf,
    pub build: PathBuf,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Configuration {
    pub name: String,
    #[serde(default)]
    pub targets: Vec<TargetRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TargetRef {
    pub name: String,
    pub id: String,
    pub json_file: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Target {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub artifacts: Vec<PathEntry>,
    #[serde(default)]
    pub sources: Vec<PathEntry>,
    #[serde(default)]
    pub compile_groups: Vec<CompileGroup>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PathEntry {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompileGroup {
    #[serde(default)]
    pub includes: Vec<PathEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Dependency {
    pub id: String,
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CmakeError> {
    let text = std::fs::read_to_string(path).map_err(|source| CmakeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CmakeError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// The newest `index-*.json` in `reply_dir`. CMake stamps index names so
/// that the lexicographically greatest is the latest.
pub(crate) fn latest_index(reply_dir: &Path) -> Result<PathBuf, CmakeError> {
    let entries = std::fs::read_dir(reply_dir)
        .map_err(|_| CmakeError::ReplyNotFound(reply_dir.to_path_buf()))?;
    entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("index-") && n.ends_with(".json"))
        })
        .max()
        .ok_or_else(|| CmakeError::ReplyNotFound(reply_dir.to_path_buf()))
}
