//! Moving a file into the gallery.

use crate::error::PlaceError;
use std::fs;
use std::path::Path;

/// Move `from` to `to`, falling back to copy and delete across filesystems.
///
/// On failure the source is left where it was and no partial copy remains.
pub fn move_file(from: &Path, to: &Path) -> Result<(), PlaceError> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            // rename fails across filesystems; a missing source can't be copied either
            if !from.exists() {
                return Err(move_failed(from, to, rename_err));
            }
            copy_then_delete(from, to)
        }
    }
}

fn copy_then_delete(from: &Path, to: &Path) -> Result<(), PlaceError> {
    let source_size = fs::metadata(from)
        .map_err(|e| move_failed(from, to, e))?
        .len();

    if let Err(e) = fs::copy(from, to) {
        let _ = fs::remove_file(to);
        return Err(move_failed(from, to, e));
    }

    let dest_size = fs::metadata(to).map(|m| m.len()).unwrap_or(0);
    if dest_size != source_size {
        let _ = fs::remove_file(to);
        return Err(PlaceError::VerificationFailed {
            to: to.to_path_buf(),
            expected: source_size,
            actual: dest_size,
        });
    }

    fs::remove_file(from).map_err(|e| {
        // Keep exactly one copy: the source is still there, so drop the new one
        let _ = fs::remove_file(to);
        move_failed(from, to, e)
    })
}

fn move_failed(from: &Path, to: &Path, source: std::io::Error) -> PlaceError {
    PlaceError::MoveFailed {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    }
}
