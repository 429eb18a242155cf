//! Locating the shared library under test and its companion header.

use std::path::{Path, PathBuf};

use crate::error::RunnerError;

/// Resolve the library a case context loads.
///
/// An absolute path must exist as given. Anything else is looked up in each
/// search directory in order; a bare name without an extension also tries
/// the platform spellings `libX.so`, `X.so`, `libX.dylib`, `X.dll` and
/// `libX.dll`.
///
/// # Errors
///
/// [`RunnerError::ArtifactNotFound`] when no candidate exists.
pub fn resolve_artifact(artifact: &Path, search_dirs: &[PathBuf]) -> Result<PathBuf, RunnerError> {
    if artifact.is_absolute() {
        if artifact.is_file() {
            return Ok(artifact.to_path_buf());
        }
        return Err(not_found(artifact, &[]));
    }

    let candidates = candidate_names(artifact);
    for dir in search_dirs {
        for candidate in &candidates {
            let path = dir.join(candidate);
            if path.is_file() {
                tracing::debug!(artifact = %path.display(), "resolved artifact");
                return Ok(absolute(path));
            }
        }
    }
    Err(not_found(artifact, search_dirs))
}

/// Find `<module_name>.<header_ext>` in the search directories.
#[must_use]
pub fn resolve_header(module_name: &str, header_ext: &str, search_dirs: &[PathBuf]) -> Option<PathBuf> {
    let file_name = format!("{module_name}.{header_ext}");
    search_dirs
        .iter()
        .map(|dir| dir.join(&file_name))
        .find(|path| path.is_file())
        .map(absolute)
}

/// Module name of an artifact: its file stem without a `lib` prefix.
#[must_use]
pub fn module_name(artifact: &Path) -> String {
    let stem = artifact
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match stem.strip_prefix("lib") {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => stem,
    }
}

fn candidate_names(artifact: &Path) -> Vec<PathBuf> {
    let mut names = vec![artifact.to_path_buf()];
    if artifact.extension().is_some() {
        return names;
    }
    let Some(stem) = artifact.file_name().map(|n| n.to_string_lossy().into_owned()) else {
        return names;
    };
    for spelled in [
        format!("lib{stem}.so"),
        format!("{stem}.so"),
        format!("lib{stem}.dylib"),
        format!("{stem}.dll"),
        format!("lib{stem}.dll"),
    ] {
        names.push(artifact.with_file_name(spelled));
    }
    names
}

fn absolute(path: PathBuf) -> PathBuf {
    std::path::absolute(&path).unwrap_or(path)
}

fn not_found(artifact: &Path, searched: &[PathBuf]) -> RunnerError {
    RunnerError::ArtifactNotFound {
        artifact: artifact.display().to_string(),
        searched: searched
            .iter()
            .map(|d| d.display().to_string())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"").unwrap();
        path
    }

    #[rstest]
    #[case("libfac.so")]
    #[case("fac.so")]
    #[case("libfac.dylib")]
    #[case("fac.dll")]
    #[case("libfac.dll")]
    fn bare_name_finds_platform_spellings(#[case] file: &str) {
        let dir = tempfile::tempdir().unwrap();
        let expected = touch(dir.path(), file);
        let resolved = resolve_artifact(Path::new("fac"), &[dir.path().to_path_buf()]).unwrap();
        assert_eq!(resolved, expected);
    }

    #[test]
    fn first_search_dir_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let expected = touch(first.path(), "libfac.so");
        touch(second.path(), "libfac.so");
        let dirs = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        assert_eq!(resolve_artifact(Path::new("libfac.so"), &dirs).unwrap(), expected);
    }

    #[test]
    fn absolute_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let lib = touch(dir.path(), "libfac.so");
        assert_eq!(resolve_artifact(&lib, &[]).unwrap(), lib);

        let err = resolve_artifact(&dir.path().join("libmissing.so"), &[]).unwrap_err();
        assert!(matches!(err, RunnerError::ArtifactNotFound { .. }));
    }

    #[test]
    fn missing_artifact_lists_searched_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_artifact(Path::new("nothing"), &[dir.path().to_path_buf()]).unwrap_err();
        assert!(err.to_string().contains(&dir.path().display().to_string()));
    }

    #[test]
    fn header_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let header = touch(dir.path(), "fac.h");
        let dirs = vec![dir.path().to_path_buf()];
        assert_eq!(resolve_header("fac", "h", &dirs), Some(header));
        assert_eq!(resolve_header("fac", "hpp", &dirs), None);
    }

    #[rstest]
    #[case("build/libfac.so", "fac")]
    #[case("fac.dll", "fac")]
    #[case("lib.so", "lib")]
    #[case("sample", "sample")]
    fn module_names(#[case] artifact: &str, #[case] expected: &str) {
        assert_eq!(module_name(Path::new(artifact)), expected);
    }
}
