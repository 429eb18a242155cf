//! File-API query and reply locations.

use std::path::{Path, PathBuf};

use crate::error::CmakeError;

const API_DIR: &str = ".cmake/api/v1";

/// `<build>/.cmake/api/v1/query/codemodel-v2`.
#[must_use]
pub fn query_path(build_dir: &Path) -> PathBuf {
    build_dir.join(API_DIR).join("query").join("codemodel-v2")
}

/// `<build>/.cmake/api/v1/reply`.
#[must_use]
pub fn reply_dir(build_dir: &Path) -> PathBuf {
    build_dir.join(API_DIR).join("reply")
}

/// Ask CMake to write a code model on its next configure run.
///
/// The query is an empty marker file; writing it twice is harmless.
///
/// # Errors
///
/// [`CmakeError::Io`] when the query directory cannot be created.
pub fn write_query(build_dir: &Path) -> Result<PathBuf, CmakeError> {
    let path = query_path(build_dir);
    let io_err = |source| CmakeError::Io {
        path: path.clone(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(&path, b"").map_err(io_err)?;
    tracing::debug!(query = %path.display(), "wrote cmake file-api query");
    Ok(path)
}
