//! Conflict-safe copy of rendered files into the working directory.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{TemplateError, TemplateResult};

/// Copy every file under `source_dir` into `target_dir`, preserving
/// relative paths, and return the relative paths of the created files in
/// walk order.
///
/// All conflicting target paths are collected up front and reported
/// together before anything is written. The copy itself creates files
/// exclusively; a file that appears between the check and the copy rolls
/// back every file already copied in this batch.
pub fn copy_dir_contents(source_dir: &Path, target_dir: &Path) -> TemplateResult<Vec<PathBuf>> {
    let mut pending: Vec<PathBuf> = Vec::new();
    let mut conflicts: Vec<PathBuf> = Vec::new();

    for entry in WalkDir::new(source_dir)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(source_dir).unwrap().to_path_buf();
        debug!("Verify {:?} does not exist", relative);
        if target_dir.join(&relative).exists() {
            conflicts.push(relative.clone());
        }
        pending.push(relative);
    }

    if !conflicts.is_empty() {
        return Err(TemplateError::FilesAlreadyExist(conflicts));
    }

    let mut copied: Vec<PathBuf> = Vec::new();
    for relative in pending {
        match copy_exclusive(&source_dir.join(&relative), &target_dir.join(&relative)) {
            Ok(()) => copied.push(relative),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                rollback(target_dir, &copied);
                return Err(TemplateError::FilesAlreadyExist(vec![relative]));
            }
            Err(err) => return Err(err.into()),
        }
    }

    debug!("Copied {} file(s) into {:?}", copied.len(), target_dir);
    Ok(copied)
}

fn copy_exclusive(source: &Path, target: &Path) -> io::Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut reader = fs::File::open(source)?;
    let mut writer = OpenOptions::new().write(true).create_new(true).open(target)?;
    io::copy(&mut reader, &mut writer)?;
    Ok(())
}

fn rollback(target_dir: &Path, copied: &[PathBuf]) {
    for relative in copied {
        let _ = fs::remove_file(target_dir.join(relative));
    }
}
