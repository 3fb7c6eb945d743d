//! Post-order traversal: a directory is removed only after everything in it.

use super::FlushResult;
use crate::Error;
use crate::internal;
use std::fs;
use std::path::Path;

/// Symlinks are unlinked, never followed, so a link to a directory outside the
/// tree cannot pull that directory into the flush.
pub(super) fn remove_tree(dir: &Path, result: &mut FlushResult) -> Result<(), Error> {
    for entry in fs::read_dir(dir).map_err(|e| Error::filesystem(dir, e))? {
        let entry = entry.map_err(|e| Error::filesystem(dir, e))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|e| Error::filesystem(&path, e))?;

        if file_type.is_dir() {
            remove_tree(&path, result)?;
        } else {
            let size = entry.metadata().map_or(0, |m| m.len());
            fs::remove_file(&path).map_err(|e| Error::filesystem(&path, e))?;
            internal::debug("CLEANUP", &format!("Deleted: {}", path.display()));
            result.files += 1;
            result.bytes += size;
        }
    }

    fs::remove_dir(dir).map_err(|e| Error::filesystem(dir, e))?;
    result.dirs += 1;
    Ok(())
}
