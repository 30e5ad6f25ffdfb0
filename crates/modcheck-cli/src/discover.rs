//! Batch input discovery.

use std::io;
use std::path::{Path, PathBuf};

use modcheck_core::HarnessError;
use walkdir::WalkDir;

/// One batch input found in a directory.
#[derive(Debug)]
pub struct Discovered {
    pub path: PathBuf,
    /// Why the entry could not be inspected; such entries still take part
    /// in the batch so the failure is reported.
    pub error: Option<HarnessError>,
}

/// List the regular files directly inside `dir` that satisfy `accept`.
///
/// Subdirectories are not descended into. Entries that cannot be inspected
/// (a dangling symlink, a permission error) are returned with their error
/// instead of being skipped. The result is sorted by path so batch output is
/// stable across runs.
pub fn files_in<F>(dir: &Path, accept: F) -> Result<Vec<Discovered>, HarnessError>
where
    F: Fn(&Path) -> bool,
{
    if !dir.is_dir() {
        return Err(HarnessError::Config(format!(
            "input path is not a directory: {}",
            dir.display()
        )));
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && accept(entry.path()) {
                    entries.push(Discovered {
                        path: entry.into_path(),
                        error: None,
                    });
                }
            }
            Err(e) => {
                let path = e.path().map(Path::to_path_buf);
                if path.as_deref().map(|p| accept(p)).unwrap_or(true) {
                    let path = path.unwrap_or_else(|| dir.to_path_buf());
                    let source = io::Error::from(e);
                    entries.push(Discovered {
                        error: Some(HarnessError::io(&path, source)),
                        path,
                    });
                }
            }
        }
    }

    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
}
