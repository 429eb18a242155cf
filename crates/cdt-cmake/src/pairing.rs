//! Pairing translation units with their headers.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A source file and the header its doctests are merged with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePair {
    pub source: PathBuf,
    pub header: Option<PathBuf>,
}

/// For each source, the first `<stem>.<header_ext>` found next to it or in
/// one of `include_dirs`, in that order.
#[must_use]
pub fn pair_sources(sources: &[PathBuf], include_dirs: &[PathBuf], header_ext: &str) -> Vec<SourcePair> {
    sources
        .iter()
        .map(|source| SourcePair {
            source: source.clone(),
            header: find_header(source, include_dirs, header_ext),
        })
        .collect()
}

fn find_header(source: &Path, include_dirs: &[PathBuf], header_ext: &str) -> Option<PathBuf> {
    let stem = source.file_stem()?;
    let mut file_name = stem.to_os_string();
    file_name.push(".");
    file_name.push(header_ext);

    let sibling = source.with_file_name(&file_name);
    if sibling != source && sibling.is_file() {
        return Some(sibling);
    }
    include_dirs
        .iter()
        .map(|dir| dir.join(&file_name))
        .find(|candidate| candidate.is_file())
}
