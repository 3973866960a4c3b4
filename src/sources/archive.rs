//! Archive extraction and source file lookup.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;
use zip::ZipArchive;

use crate::error::{EngineError, EngineResult};

/// Returns true when `path` names a `.zip` archive.
pub fn is_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

/// A zip archive extracted to a temporary directory.
///
/// The directory is removed when this value is dropped; sources are read
/// fully into memory before that happens.
#[derive(Debug)]
pub struct ExtractedArchive {
    dir: TempDir,
}

impl ExtractedArchive {
    /// Extracts `path` into a fresh temporary directory.
    pub fn extract(path: &Path) -> EngineResult<Self> {
        let path_str = path.display().to_string();

        if !path.is_file() {
            return Err(EngineError::SourceNotFound { path: path_str });
        }

        let malformed = |message: String| EngineError::SourceMalformed {
            path: path_str.clone(),
            message,
        };

        let file = File::open(path).map_err(|e| malformed(e.to_string()))?;
        let mut archive = ZipArchive::new(file).map_err(|e| malformed(e.to_string()))?;

        let dir = tempfile::Builder::new()
            .prefix("vr_bases_")
            .tempdir()
            .map_err(|e| malformed(format!("failed to create extraction directory: {}", e)))?;

        archive
            .extract(dir.path())
            .map_err(|e| malformed(format!("failed to extract: {}", e)))?;

        debug!(archive = %path_str, dir = %dir.path().display(), entries = archive.len(), "Archive extracted");
        Ok(Self { dir })
    }

    /// The directory holding the extracted entries.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }
}

/// Finds `file_name` under `root`.
///
/// Tries the exact path first, then any entry whose name matches once
/// accents, punctuation and case are ignored (archives built on other
/// platforms often mangle `Ã`/`É` in entry names). The same lookup is
/// repeated one directory level down for archives that wrap their files in a
/// folder.
pub fn locate_source_file(root: &Path, file_name: &str) -> Option<PathBuf> {
    find_in_dir(root, file_name).or_else(|| {
        let entries = fs::read_dir(root).ok()?;
        let mut subdirs: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect();
        subdirs.sort();
        subdirs.iter().find_map(|dir| find_in_dir(dir, file_name))
    })
}

fn find_in_dir(dir: &Path, file_name: &str) -> Option<PathBuf> {
    let exact = dir.join(file_name);
    if exact.is_file() {
        return Some(exact);
    }

    let wanted = ascii_key(file_name);
    let mut candidates: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.file_name()
                .map(|n| ascii_key(&n.to_string_lossy()) == wanted)
                .unwrap_or(false)
        })
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}

/// Uppercased ASCII alphanumerics of `name`.
fn ascii_key(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}
