//! Recursive glob discovery

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// A file matched under a discovery root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// Root joined with the relative path; use this for I/O
    pub path: PathBuf,
    /// Path relative to the root with `/` separators
    pub relative: String,
}

/// Find all files under `root` whose relative path matches `pattern`.
///
/// Hidden entries (leading `.`) are skipped and siblings are visited in file
/// name order. Symlinked files are included; symlinked directories are not
/// descended into. A missing root yields no files; any other walk failure,
/// including an unreadable root, is an error.
pub fn discover(root: &Path, pattern: &str) -> Result<Vec<DiscoveredFile>> {
    let mut files = Vec::new();

    let walker = walkdir::WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 && is_not_found(&err) => {
                tracing::debug!("Discovery root {} does not exist", root.display());
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(Error::Discovery {
                    root: root.to_path_buf(),
                    source,
                })
            }
        };

        let file_type = entry.file_type();
        let is_file = file_type.is_file() || (file_type.is_symlink() && entry.path().is_file());
        if !is_file {
            continue;
        }

        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        let relative = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if matches_pattern(pattern, &relative) {
            files.push(DiscoveredFile {
                path: entry.path().to_path_buf(),
                relative,
            });
        }
    }

    tracing::debug!(
        "Discovered {} files matching {} under {}",
        files.len(),
        pattern,
        root.display()
    );

    Ok(files)
}

fn is_not_found(err: &walkdir::Error) -> bool {
    err.io_error()
        .is_some_and(|e| e.kind() == std::io::ErrorKind::NotFound)
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|s| s.starts_with('.'))
}

/// `**/` also matches zero directories, so root-level files are included.
fn matches_pattern(pattern: &str, relative: &str) -> bool {
    glob_match::glob_match(pattern, relative)
        || pattern
            .strip_prefix("**/")
            .is_some_and(|rest| glob_match::glob_match(rest, relative))
}
