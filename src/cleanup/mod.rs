//! Removal of whole channel folders, with a guard against folders that must
//! never be deleted (the working directory and its ancestors, the home
//! directory, filesystem roots).

mod result;
mod size;
mod tree;

pub use result::FlushResult;
pub use size::format_size;

use crate::Error;
use crate::internal;
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tree::remove_tree;

/// Spellings of the working directory and its parent that are refused outright.
const RESERVED: &[&str] = &["", ".", "./", ".\\", "..", "../", "..\\"];

/// True when flushing `folder` would remove the working directory, one of its
/// ancestors, the home directory or a filesystem root. A folder whose last
/// component is `..` is refused as well: it names the parent of a log folder,
/// never the log folder itself.
#[must_use]
pub fn is_protected(folder: &Path) -> bool {
    if RESERVED.contains(&&*folder.to_string_lossy()) || ends_in_parent(folder) {
        return true;
    }

    let normalized = normalize(folder);
    if normalized.as_os_str().is_empty() || is_root(&normalized) {
        return true;
    }

    let Ok(cwd) = env::current_dir() else {
        return false;
    };
    if covers(&normalize(&cwd.join(&normalized)), &cwd) {
        return true;
    }

    // Symlinks may still point at something sensitive.
    match (fs::canonicalize(folder), fs::canonicalize(&cwd)) {
        (Ok(real), Ok(real_cwd)) => covers(&real, &real_cwd),
        _ => false,
    }
}

fn ends_in_parent(folder: &Path) -> bool {
    folder
        .components()
        .filter(|c| *c != Component::CurDir)
        .next_back()
        == Some(Component::ParentDir)
}

fn is_root(path: &Path) -> bool {
    path.has_root() && path.parent().is_none()
}

/// Whether removing `target` would take `cwd` or the home directory with it.
fn covers(target: &Path, cwd: &Path) -> bool {
    if is_root(target) || cwd.starts_with(target) {
        return true;
    }
    directories::BaseDirs::new().is_some_and(|dirs| dirs.home_dir() == target)
}

/// Lexical clean-up: drops `.` and folds `..` into the preceding component.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Deletes `folder` and everything below it, children before parents.
///
/// A folder that does not exist (or is not a directory) counts as already
/// flushed, so calling this twice in a row succeeds both times.
///
/// # Errors
/// `Error::ProtectedPath` before touching anything when `folder` is reserved;
/// `Error::Filesystem` when a directory cannot be listed or an entry cannot be
/// removed. Entries removed before the failure stay removed.
pub fn flush(folder: &Path) -> Result<FlushResult, Error> {
    if is_protected(folder) {
        internal::warn(
            "CLEANUP",
            &format!("Refusing to flush protected folder {}", folder.display()),
        );
        return Err(Error::ProtectedPath(folder.to_path_buf()));
    }

    let mut result = FlushResult::default();

    let meta = match fs::symlink_metadata(folder) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            internal::debug(
                "CLEANUP",
                &format!("{} does not exist, nothing to flush", folder.display()),
            );
            return Ok(result);
        }
        Err(e) => return Err(Error::filesystem(folder, e)),
    };
    if !meta.is_dir() {
        internal::debug(
            "CLEANUP",
            &format!("{} is not a directory, nothing to flush", folder.display()),
        );
        return Ok(result);
    }

    remove_tree(folder, &mut result)?;
    internal::info(
        "CLEANUP",
        &format!(
            "Flushed {}: {} files, {} directories, {}",
            folder.display(),
            result.files,
            result.dirs,
            format_size(result.bytes)
        ),
    );
    Ok(result)
}
