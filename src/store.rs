//! Document store — where visual documents come from and go back to.

use crate::error::{Error, Result};
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name of a visual document inside a report's pages folder.
pub const VISUAL_FILE: &str = "visual.json";

/// Trait for enumerating, reading and persisting visual documents.
pub trait DocumentStore {
    /// All documents under `root`, sorted.
    fn enumerate(&self, root: &Path) -> Result<Vec<PathBuf>>;
    fn read(&self, path: &Path) -> Result<Value>;
    /// Replace the whole document at `path`.
    fn write(&self, path: &Path, doc: &Value) -> Result<()>;
}

/// Serialize a document the way report files are stored:
/// 2-space indentation, non-ASCII kept as-is, trailing newline.
pub fn to_pretty_json(doc: &Value) -> String {
    let mut out = serde_json::to_string_pretty(doc).unwrap_or_else(|_| doc.to_string());
    out.push('\n');
    out
}

/// Filesystem store: `**/visual.json` discovery, atomic rewrite-by-rename.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsStore;

impl DocumentStore for FsStore {
    fn enumerate(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let root = glob::Pattern::escape(&root.to_string_lossy());
        let pattern = format!("{root}/**/{VISUAL_FILE}");
        let mut files: Vec<PathBuf> = glob::glob(&pattern)
            .map_err(|e| Error::InvalidArgument(format!("invalid pages path {root}: {e}")))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        files.sort();
        Ok(files)
    }

    fn read(&self, path: &Path) -> Result<Value> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        serde_json::from_str(&text).map_err(|e| Error::json(path, e))
    }

    fn write(&self, path: &Path, doc: &Value) -> Result<()> {
        let dir = path
            .parent()
            .filter(|d| !d.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| Error::io(path, e))?;
        // Keep the original file mode; temp files are created 0600
        if let Ok(meta) = fs::metadata(path) {
            tmp.as_file()
                .set_permissions(meta.permissions())
                .map_err(|e| Error::io(path, e))?;
        }
        tmp.write_all(to_pretty_json(doc).as_bytes())
            .map_err(|e| Error::io(path, e))?;
        tmp.persist(path).map_err(|e| Error::io(path, e.error))?;
        Ok(())
    }
}
